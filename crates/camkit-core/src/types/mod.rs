//! # Core Type Definitions
//!
//! Types shared by every camkit-core module:
//! - Annotation records attached to individuals, facts and models (`Annotation`)
//! - The crate-wide error type (`CamError`)
//!
//! ## Determinism Guarantees
//!
//! `Annotation` implements `Ord` so annotations can live in
//! `BTreeMap`/`BTreeSet` collections with a stable iteration order.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// ANNOTATION
// =============================================================================

/// A key/value annotation with an optional value datatype.
///
/// Annotations carry provenance (contributor, date, evidence, comment) on
/// individuals, facts and whole models. The wire form uses the field names
/// `key`, `value` and `value-type`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Annotation {
    /// The annotation property, usually a compact identifier or a short key.
    pub key: String,
    /// The annotation value.
    pub value: String,
    /// Optional datatype of the value (e.g. `xsd:string`, `IRI`).
    #[serde(
        rename = "value-type",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub value_type: Option<String>,
}

impl Annotation {
    /// Create an untyped annotation.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            value_type: None,
        }
    }

    /// Create an annotation with an explicit value datatype.
    #[must_use]
    pub fn typed(
        key: impl Into<String>,
        value: impl Into<String>,
        value_type: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            value_type: Some(value_type.into()),
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in camkit-core.
///
/// - No silent failures
/// - Use `Result<T, CamError>` for fallible operations
/// - Nothing in the core is fatal; the caller decides how to recover
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CamError {
    /// A compact identifier has no `:` separator.
    #[error("Malformed identifier (no prefix separator): {0}")]
    MalformedIdentifier(String),

    /// The prefix is not registered and the identifier is not an allowed scheme.
    #[error("Unknown prefix '{prefix}' in identifier: {identifier}")]
    UnknownPrefix { prefix: String, identifier: String },

    /// An expression node has no `type` tag.
    #[error("Missing expression type")]
    MissingExpressionType,

    /// An existential restriction has no filler.
    #[error("Missing filler for restriction")]
    MissingFiller,

    /// An existential restriction has no property.
    #[error("Missing property for restriction")]
    MissingProperty,

    /// A union or intersection has an empty operand list.
    #[error("Missing operands for {0} expression")]
    MissingOperands(String),

    /// A class or property node has no `id`.
    #[error("Missing identifier for {0} node")]
    MissingIdentifier(String),

    /// The `type` tag is not one of the recognised expression kinds.
    #[error("Unknown expression type: {0}")]
    UnknownExpressionType(String),

    /// An identifier embedded in an expression contains whitespace.
    #[error("Invalid identifier syntax: {0:?}")]
    InvalidIdentifierSyntax(String),

    /// A fact refers to an individual that is not part of the model.
    #[error("Unknown individual: {0}")]
    UnknownIndividual(String),

    /// An externally supplied ancestor/superclass oracle failed.
    #[error("Oracle failure for '{term}': {message}")]
    OracleFailure { term: String, message: String },

    /// Two prefix sources bind the same prefix (or namespace) differently.
    #[error("Prefix conflict for '{key}': '{existing}' vs '{incoming}'")]
    PrefixConflict {
        key: String,
        existing: String,
        incoming: String,
    },

    /// A prefix mapping entry is unusable (empty prefix or namespace).
    #[error("Invalid prefix mapping: {0}")]
    InvalidPrefixMapping(String),

    /// A line of an evidence code mapping could not be parsed.
    #[error("Invalid code mapping at line {line}: {message}")]
    InvalidCodeMapping { line: usize, message: String },

    /// The configuration is invalid.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A wire document could not be deserialized.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// An I/O error occurred while reading a configuration source.
    #[error("I/O error: {0}")]
    IoError(String),
}

impl CamError {
    /// Build an oracle failure for the given term.
    #[must_use]
    pub fn oracle(term: impl Into<String>, message: impl Into<String>) -> Self {
        Self::OracleFailure {
            term: term.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
