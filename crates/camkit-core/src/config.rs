//! # Configuration
//!
//! TOML configuration for the identifier and evidence tables.
//!
//! ```toml
//! include_defaults = true
//!
//! [prefixes]
//! GO = "http://purl.obolibrary.org/obo/GO_"
//!
//! [[prefix_sources]]
//! path = "contexts/go_context.jsonld"
//! format = "jsonld"
//!
//! [evidence]
//! mapping = "gaf-eco-mapping.tsv"
//!
//! [logging]
//! format = "json"
//! filter = "camkit=debug"
//! ```
//!
//! Prefix sources are merged in order: bundled defaults, inline
//! `[prefixes]`, then each `[[prefix_sources]]` entry. A short prefix mapped
//! to two different namespaces is a configuration error. Relative paths are
//! resolved against the directory of the configuration file.

use crate::evidence::{ShortCodeTable, default_code_table};
use crate::identifier::{PrefixTable, PrefixTableBuilder, default_prefix_table};
use crate::CamError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Format of an external prefix source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// A JSON-LD context document.
    Jsonld,
    /// A TOML document with a `[prefixes]` table.
    Toml,
}

impl SourceFormat {
    /// Guess the format from a file extension. Anything but `.jsonld` or
    /// `.json` is read as TOML.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("jsonld" | "json") => Self::Jsonld,
            _ => Self::Toml,
        }
    }
}

/// An external prefix mapping file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrefixSource {
    /// File path, relative to the configuration file.
    pub path: PathBuf,
    /// File format; guessed from the extension when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<SourceFormat>,
}

/// `[evidence]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvidenceConfig {
    /// Evidence code mapping file; the bundled table is used when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapping: Option<PathBuf>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// `[logging]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// `EnvFilter` directives used when `RUST_LOG` is not set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

/// Complete core configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    /// Start from the bundled prefix table.
    pub include_defaults: bool,
    /// Inline prefix mappings.
    pub prefixes: BTreeMap<String, String>,
    /// External prefix mapping files, merged in order.
    pub prefix_sources: Vec<PrefixSource>,
    /// Evidence code settings.
    pub evidence: EvidenceConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Directory relative paths are resolved against.
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            include_defaults: true,
            prefixes: BTreeMap::new(),
            prefix_sources: Vec::new(),
            evidence: EvidenceConfig::default(),
            logging: LoggingConfig::default(),
            base_dir: None,
        }
    }
}

impl CoreConfig {
    /// Parse a configuration document. Relative paths resolve against the
    /// current directory.
    pub fn from_toml_str(text: &str) -> Result<Self, CamError> {
        toml::from_str(text).map_err(|e| CamError::ConfigError(e.to_string()))
    }

    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self, CamError> {
        let text = read_source(path)?;
        let mut config = Self::from_toml_str(&text)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Resolve a configured path against the configuration directory.
    #[must_use]
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Build the frozen prefix table from every configured source.
    pub fn prefix_table(&self) -> Result<PrefixTable, CamError> {
        let mut builder = PrefixTableBuilder::new();
        if self.include_defaults {
            builder = builder.with_table(default_prefix_table()?)?;
        }
        if !self.prefixes.is_empty() {
            builder = builder.with_pairs(&self.prefixes)?;
        }

        for source in &self.prefix_sources {
            let path = self.resolve_path(&source.path);
            let text = read_source(&path)?;
            let format = source
                .format
                .unwrap_or_else(|| SourceFormat::from_path(&path));
            tracing::debug!(path = %path.display(), ?format, "merging prefix source");
            builder = match format {
                SourceFormat::Jsonld => builder.with_jsonld_str(&text)?,
                SourceFormat::Toml => builder.with_toml_str(&text)?,
            };
        }

        Ok(builder.build())
    }

    /// Build the evidence code table: the configured mapping file, or the
    /// bundled table.
    pub fn code_table(&self) -> Result<ShortCodeTable, CamError> {
        match &self.evidence.mapping {
            Some(path) => ShortCodeTable::load(&self.resolve_path(path)),
            None => default_code_table().cloned(),
        }
    }
}

fn read_source(path: &Path) -> Result<String, CamError> {
    std::fs::read_to_string(path).map_err(|e| CamError::IoError(format!("{}: {e}", path.display())))
}

// =============================================================================
// TESTS
// =============================================================================
