//! # Formats Module
//!
//! JSON wire formats.
//!
//! - `expression`: tagged class expression trees
//! - `model`: individuals, facts and whole models

pub mod expression;
pub mod model;

pub use expression::{
    ExpressionJson, compact_identifiers, decode, decode_expanded, decode_str, encode,
    encode_compact, encode_labeled, validate_identifier,
};
pub use model::{
    FactJson, IndividualJson, ModelJson, ModelRenderer, parse_fact, parse_individual, parse_model,
    parse_model_str,
};
