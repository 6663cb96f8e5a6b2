//! Legacy evidence code table.
//!
//! Maps evidence ontology terms to the short codes used by legacy export
//! formats. The mapping file is tab-separated, one `term code reference`
//! triple per line. A reference of `Default` (or none) marks the default
//! mapping of a term; any other reference scopes the mapping to annotations
//! citing that reference.

use crate::CamError;
use crate::primitives::{DEFAULT_REFERENCE, MAPPING_COMMENT};
use std::collections::BTreeMap;
use std::path::Path;

/// Human-readable labels of the known short codes.
const CODE_LABELS: [(&str, &str); 26] = [
    ("EXP", "Inferred from Experiment"),
    ("IDA", "Inferred from Direct Assay"),
    ("IPI", "Inferred from Physical Interaction"),
    ("IMP", "Inferred from Mutant Phenotype"),
    ("IGI", "Inferred from Genetic Interaction"),
    ("IEP", "Inferred from Expression Pattern"),
    ("HTP", "Inferred from High Throughput Experiment"),
    ("HDA", "Inferred from High Throughput Direct Assay"),
    ("HMP", "Inferred from High Throughput Mutant Phenotype"),
    ("HGI", "Inferred from High Throughput Genetic Interaction"),
    ("HEP", "Inferred from High Throughput Expression Pattern"),
    ("ISS", "Inferred from Sequence or structural Similarity"),
    ("ISO", "Inferred from Sequence Orthology"),
    ("ISA", "Inferred from Sequence Alignment"),
    ("ISM", "Inferred from Sequence Model"),
    ("IGC", "Inferred from Genomic Context"),
    ("IBA", "Inferred from Biological aspect of Ancestor"),
    ("IBD", "Inferred from Biological aspect of Descendant"),
    ("IKR", "Inferred from Key Residues"),
    ("IRD", "Inferred from Rapid Divergence"),
    ("RCA", "Inferred from Reviewed Computational Analysis"),
    ("TAS", "Traceable Author Statement"),
    ("NAS", "Non-traceable Author Statement"),
    ("IC", "Inferred by Curator"),
    ("ND", "No biological Data available"),
    ("IEA", "Inferred from Electronic Annotation"),
];

/// Label of a known short code.
#[must_use]
pub fn code_label(code: &str) -> Option<&'static str> {
    CODE_LABELS
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, label)| *label)
}

/// A resolved legacy evidence code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShortCode {
    /// The short code, e.g. `IDA`.
    pub code: String,
    /// Human-readable kind, e.g. "Inferred from Direct Assay".
    pub label: String,
    /// The reference the mapping is scoped to, `None` for default mappings.
    pub reference: Option<String>,
}

impl ShortCode {
    /// Create a short code, taking the label from the built-in label table.
    #[must_use]
    pub fn new(code: impl Into<String>, reference: Option<String>) -> Self {
        let code = code.into();
        let label = code_label(&code).map_or_else(|| code.clone(), str::to_string);
        Self {
            code,
            label,
            reference,
        }
    }
}

/// One direction-indexed set of term/code pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Mapping {
    by_term: BTreeMap<String, String>,
    /// First term seen for each code
    by_code: BTreeMap<String, String>,
}

impl Mapping {
    fn insert(&mut self, term: &str, code: &str, line: usize) -> Result<(), CamError> {
        if let Some(existing) = self.by_term.get(term) {
            if existing != code {
                return Err(CamError::InvalidCodeMapping {
                    line,
                    message: format!("'{term}' already mapped to '{existing}', not '{code}'"),
                });
            }
            return Ok(());
        }
        self.by_term.insert(term.to_string(), code.to_string());
        self.by_code
            .entry(code.to_string())
            .or_insert_with(|| term.to_string());
        Ok(())
    }
}

/// Frozen evidence term to short code table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortCodeTable {
    defaults: Mapping,
    /// reference -> reference-specific mapping
    scoped: BTreeMap<String, Mapping>,
}

impl ShortCodeTable {
    /// Parse a tab-separated mapping.
    ///
    /// Blank lines and lines starting with `#` are ignored.
    pub fn parse(text: &str) -> Result<Self, CamError> {
        let mut table = Self::default();

        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with(MAPPING_COMMENT) {
                continue;
            }

            let columns: Vec<&str> = trimmed.split('\t').map(str::trim).collect();
            let (term, code, reference) = match columns.as_slice() {
                [term, code] => (*term, *code, None),
                [term, code, reference] => (*term, *code, Some(*reference)),
                _ => {
                    return Err(CamError::InvalidCodeMapping {
                        line,
                        message: format!("expected 2 or 3 columns, found {}", columns.len()),
                    });
                }
            };
            if term.is_empty() || code.is_empty() {
                return Err(CamError::InvalidCodeMapping {
                    line,
                    message: "empty term or code".to_string(),
                });
            }

            match reference.filter(|r| !r.is_empty() && *r != DEFAULT_REFERENCE) {
                Some(reference) => table
                    .scoped
                    .entry(reference.to_string())
                    .or_default()
                    .insert(term, code, line)?,
                None => table.defaults.insert(term, code, line)?,
            }
        }

        tracing::debug!(
            defaults = table.defaults.by_term.len(),
            references = table.scoped.len(),
            "evidence code table built"
        );
        Ok(table)
    }

    /// Read and parse a mapping file.
    pub fn load(path: &Path) -> Result<Self, CamError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CamError::IoError(format!("{}: {e}", path.display())))?;
        Self::parse(&text)
    }

    /// Number of default mappings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.defaults.by_term.len()
    }

    /// Check if the table has no mappings at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.defaults.by_term.is_empty() && self.scoped.is_empty()
    }

    /// Default short code of a term.
    #[must_use]
    pub fn code_of(&self, term: &str) -> Option<ShortCode> {
        self.defaults
            .by_term
            .get(term)
            .map(|code| ShortCode::new(code.as_str(), None))
    }

    /// Short code of a term cited with `reference`.
    ///
    /// A reference-specific mapping wins over the default one.
    #[must_use]
    pub fn code_for(&self, term: &str, reference: Option<&str>) -> Option<ShortCode> {
        reference
            .and_then(|r| {
                self.scoped
                    .get(r)
                    .and_then(|m| m.by_term.get(term))
                    .map(|code| ShortCode::new(code.as_str(), Some(r.to_string())))
            })
            .or_else(|| self.code_of(term))
    }

    /// Term that a short code stands for, reference-specific first.
    #[must_use]
    pub fn term_for_code(&self, code: &str, reference: Option<&str>) -> Option<&str> {
        reference
            .and_then(|r| self.scoped.get(r))
            .and_then(|m| m.by_code.get(code))
            .or_else(|| self.defaults.by_code.get(code))
            .map(String::as_str)
    }

    /// A lookup view bound to one reference.
    #[must_use]
    pub fn scoped<'a>(&'a self, reference: Option<&'a str>) -> ScopedCodes<'a> {
        ScopedCodes {
            table: self,
            reference,
        }
    }
}

/// `ShortCodeTable` lookups for annotations citing one reference.
#[derive(Debug, Clone, Copy)]
pub struct ScopedCodes<'a> {
    table: &'a ShortCodeTable,
    reference: Option<&'a str>,
}

impl ScopedCodes<'_> {
    /// See [`ShortCodeTable::code_for`].
    #[must_use]
    pub fn code_of(&self, term: &str) -> Option<ShortCode> {
        self.table.code_for(term, self.reference)
    }
}

// =============================================================================
// TESTS
// =============================================================================
