//! # Evidence Module
//!
//! Legacy short evidence codes.
//!
//! - `table`: the evidence term to short code mapping and its labels
//! - `resolver`: BFS over direct superclasses to the nearest mapped ancestor

mod resolver;
mod table;

pub use resolver::{
    CodeLookup, EvidenceMapper, ShortCodeMatch, SuperclassOracle, resolve_short_code,
    resolve_short_code_match,
};
pub use table::{ScopedCodes, ShortCode, ShortCodeTable, code_label};

use crate::CamError;
use std::sync::OnceLock;

/// Bundled GO evidence code to ECO mapping.
const DEFAULT_CODES: &str = include_str!("../../data/evidence-codes.tsv");

/// The bundled evidence code table, parsed once per process.
pub fn default_code_table() -> Result<&'static ShortCodeTable, CamError> {
    static DEFAULT: OnceLock<Result<ShortCodeTable, CamError>> = OnceLock::new();
    DEFAULT
        .get_or_init(|| ShortCodeTable::parse(DEFAULT_CODES))
        .as_ref()
        .map_err(Clone::clone)
}
