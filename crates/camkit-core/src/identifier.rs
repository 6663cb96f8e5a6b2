//! # Identifier Codec
//!
//! Translation between full identifiers (`http://purl.obolibrary.org/obo/GO_0003674`)
//! and compact identifiers (`GO:0003674`).
//!
//! A `PrefixTable` is a bijection between short prefixes and long prefixes.
//! It is assembled once by a `PrefixTableBuilder` from ordered sources and
//! is immutable afterwards, so it can be shared by reference across threads.
//!
//! ## Matching Rules
//!
//! - Compaction picks the **longest** registered long prefix that is a strict
//!   prefix of the identifier. Because the table is a bijection, at most one
//!   long prefix of a given length can match, so the winner is unique.
//! - An identifier equal to a long prefix is never compacted (no empty suffix).
//! - Expansion splits on the first `:`; unknown prefixes are accepted only for
//!   the allowed schemes (`http`, `https`, `urn`, `mailto`).

use crate::CamError;
use crate::primitives::{ALLOWED_SCHEMES, PREFIX_SEPARATOR};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Bundled prefix mappings used by `default_prefix_table`.
const DEFAULT_PREFIXES: &str = include_str!("../data/default-prefixes.toml");

// =============================================================================
// IDENTIFIERCODEC TRAIT
// =============================================================================

/// Bidirectional identifier translation.
///
/// Implementations must be pure: the same input always yields the same output.
pub trait IdentifierCodec {
    /// Shorten a full identifier. Returns the input unchanged when no
    /// registered long prefix applies.
    fn to_compact(&self, full: &str) -> String;

    /// Expand a compact identifier into a full identifier.
    fn to_full(&self, compact: &str) -> Result<String, CamError>;
}

/// Check whether an identifier starts with one of the allowed schemes.
#[must_use]
pub fn has_allowed_scheme(identifier: &str) -> bool {
    ALLOWED_SCHEMES
        .iter()
        .any(|scheme| identifier.starts_with(scheme))
}

// =============================================================================
// PREFIX TABLE
// =============================================================================

/// Immutable bijection between short prefixes and long prefixes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixTable {
    /// short prefix -> long prefix
    short_to_long: BTreeMap<String, String>,
    /// long prefix -> short prefix
    long_to_short: BTreeMap<String, String>,
    /// Byte length of the longest registered long prefix.
    max_long_len: usize,
}

impl PrefixTable {
    /// Create an empty table. Use `PrefixTableBuilder` to populate one.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building a table.
    #[must_use]
    pub fn builder() -> PrefixTableBuilder {
        PrefixTableBuilder::new()
    }

    /// Long prefix registered for a short prefix.
    #[must_use]
    pub fn long_for(&self, short: &str) -> Option<&str> {
        self.short_to_long.get(short).map(String::as_str)
    }

    /// Short prefix registered for a long prefix.
    #[must_use]
    pub fn short_for(&self, long: &str) -> Option<&str> {
        self.long_to_short.get(long).map(String::as_str)
    }

    /// Number of registered mappings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.short_to_long.len()
    }

    /// Check if the table has no mappings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.short_to_long.is_empty()
    }

    /// All (short, long) pairs, ordered by short prefix.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.short_to_long
            .iter()
            .map(|(short, long)| (short.as_str(), long.as_str()))
    }

    /// Check if `to_compact` would shorten this identifier.
    #[must_use]
    pub fn is_compactable(&self, full: &str) -> bool {
        self.longest_match(full).is_some()
    }

    /// Find the longest long prefix that is a strict prefix of `full`.
    ///
    /// Candidates are tried from the longest possible length downwards, so
    /// the first hit is the answer. The remainder borrows from `full`.
    fn longest_match<'a>(&'a self, full: &'a str) -> Option<(&'a str, &'a str)> {
        if full.is_empty() {
            return None;
        }
        let upper = self.max_long_len.min(full.len().saturating_sub(1));
        (1..=upper)
            .rev()
            .filter(|&end| full.is_char_boundary(end))
            .find_map(|end| {
                let candidate = &full[..end];
                self.long_to_short
                    .get(candidate)
                    .map(|short| (short.as_str(), &full[end..]))
            })
    }
}

impl IdentifierCodec for PrefixTable {
    /// The remainder after the matched namespace is kept verbatim, so
    /// `http://x/ab/1` under `AB -> http://x/ab` compacts to `AB:/1`.
    fn to_compact(&self, full: &str) -> String {
        match self.longest_match(full) {
            Some((short, remainder)) => format!("{short}{PREFIX_SEPARATOR}{remainder}"),
            None => full.to_string(),
        }
    }

    fn to_full(&self, compact: &str) -> Result<String, CamError> {
        let Some((prefix, suffix)) = compact.split_once(PREFIX_SEPARATOR) else {
            return Err(CamError::MalformedIdentifier(compact.to_string()));
        };

        if let Some(long) = self.short_to_long.get(prefix) {
            return Ok(format!("{long}{suffix}"));
        }

        if has_allowed_scheme(compact) {
            return Ok(compact.to_string());
        }

        Err(CamError::UnknownPrefix {
            prefix: prefix.to_string(),
            identifier: compact.to_string(),
        })
    }
}

// =============================================================================
// BUILDER
// =============================================================================

/// Merges ordered prefix sources into a `PrefixTable`.
///
/// Later sources may add prefixes. Re-registering an identical pair is a
/// no-op; binding an existing short prefix (or long prefix) to something
/// different is a `PrefixConflict`.
#[derive(Debug, Default)]
pub struct PrefixTableBuilder {
    table: PrefixTable,
    sources: usize,
}

impl PrefixTableBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a single mapping.
    pub fn insert(&mut self, short: &str, long: &str) -> Result<(), CamError> {
        if short.is_empty() || long.is_empty() {
            return Err(CamError::InvalidPrefixMapping(format!(
                "'{short}' -> '{long}'"
            )));
        }
        if short.contains(PREFIX_SEPARATOR) || short.chars().any(char::is_whitespace) {
            return Err(CamError::InvalidPrefixMapping(format!(
                "prefix '{short}' contains a separator or whitespace"
            )));
        }

        if let Some(existing) = self.table.short_to_long.get(short) {
            if existing == long {
                return Ok(());
            }
            return Err(CamError::PrefixConflict {
                key: short.to_string(),
                existing: existing.clone(),
                incoming: long.to_string(),
            });
        }
        if let Some(existing) = self.table.long_to_short.get(long) {
            return Err(CamError::PrefixConflict {
                key: long.to_string(),
                existing: existing.clone(),
                incoming: short.to_string(),
            });
        }

        self.table
            .short_to_long
            .insert(short.to_string(), long.to_string());
        self.table
            .long_to_short
            .insert(long.to_string(), short.to_string());
        self.table.max_long_len = self.table.max_long_len.max(long.len());
        Ok(())
    }

    /// Merge an association list of (short, long) pairs.
    pub fn with_pairs<I, S, L>(mut self, pairs: I) -> Result<Self, CamError>
    where
        I: IntoIterator<Item = (S, L)>,
        S: AsRef<str>,
        L: AsRef<str>,
    {
        for (short, long) in pairs {
            self.insert(short.as_ref(), long.as_ref())?;
        }
        self.sources = self.sources.saturating_add(1);
        Ok(self)
    }

    /// Merge every mapping of an existing table.
    pub fn with_table(self, table: &PrefixTable) -> Result<Self, CamError> {
        self.with_pairs(table.iter())
    }

    /// Merge a TOML source.
    ///
    /// Mappings are read from a `[prefixes]` table when present, otherwise
    /// from the top-level string entries of the document.
    pub fn with_toml_str(self, text: &str) -> Result<Self, CamError> {
        let doc: toml::Table =
            toml::from_str(text).map_err(|e| CamError::ConfigError(e.to_string()))?;

        let entries = match doc.get("prefixes") {
            Some(toml::Value::Table(prefixes)) => prefixes,
            Some(_) => {
                return Err(CamError::ConfigError(
                    "'prefixes' must be a table".to_string(),
                ));
            }
            None => &doc,
        };

        let mut pairs = Vec::with_capacity(entries.len());
        for (short, value) in entries {
            let long = value.as_str().ok_or_else(|| {
                CamError::InvalidPrefixMapping(format!("value for '{short}' is not a string"))
            })?;
            pairs.push((short.clone(), long.to_string()));
        }
        self.with_pairs(pairs)
    }

    /// Merge a JSON-LD context document.
    ///
    /// Accepts `{"@context": {...}}` or a bare context object. Values may be
    /// strings or term definitions with an `@id`. Keywords (`@vocab`,
    /// `@base`, ...) and definitions without an `@id` are skipped.
    pub fn with_jsonld_str(self, text: &str) -> Result<Self, CamError> {
        let doc: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| CamError::DeserializationError(e.to_string()))?;

        let context = doc.get("@context").unwrap_or(&doc);
        let serde_json::Value::Object(entries) = context else {
            return Err(CamError::ConfigError(
                "JSON-LD context must be an object".to_string(),
            ));
        };

        let pairs: Vec<(String, String)> = entries
            .iter()
            .filter(|(key, _)| !key.starts_with('@'))
            .filter_map(|(key, value)| {
                let long = match value {
                    serde_json::Value::String(s) => Some(s.as_str()),
                    serde_json::Value::Object(def) => {
                        def.get("@id").and_then(serde_json::Value::as_str)
                    }
                    _ => None,
                }?;
                Some((key.clone(), long.to_string()))
            })
            .collect();

        self.with_pairs(pairs)
    }

    /// Freeze the merged mappings.
    #[must_use]
    pub fn build(self) -> PrefixTable {
        tracing::debug!(
            prefixes = self.table.len(),
            sources = self.sources,
            "prefix table built"
        );
        self.table
    }
}

// =============================================================================
// DEFAULT TABLE
// =============================================================================

/// The bundled prefix table, built on first use and frozen afterwards.
pub fn default_prefix_table() -> Result<&'static PrefixTable, CamError> {
    static DEFAULT: OnceLock<Result<PrefixTable, CamError>> = OnceLock::new();
    DEFAULT
        .get_or_init(|| {
            PrefixTableBuilder::new()
                .with_toml_str(DEFAULT_PREFIXES)
                .map(PrefixTableBuilder::build)
        })
        .as_ref()
        .map_err(Clone::clone)
}

// =============================================================================
// TESTS
// =============================================================================
