//! # camkit-core
//!
//! Core data layer for causal activity models: compact identifiers, class
//! expressions, model graphs and the ontology-backed reductions applied to
//! them before export.
//!
//! ## Components
//!
//! - `identifier`: longest-prefix identifier compaction and expansion
//! - `expression` / `formats`: class expression trees and their JSON wire form
//! - `model` / `projection`: individuals, facts and induced sub-graphs
//! - `dedup`: removal of candidate classes implied by a more specific one
//! - `evidence`: nearest-ancestor lookup of legacy evidence codes
//!
//! ## Constraints
//!
//! - Pure and synchronous: no I/O outside `config`, no async, no network
//! - Reasoners and ontology stores stay outside, behind oracle traits
//! - Deterministic: `BTreeMap`/`BTreeSet` wherever order is observable
//! - Shared tables are built once and never mutated

// =============================================================================
// MODULES
// =============================================================================

pub mod config;
pub mod dedup;
pub mod evidence;
pub mod expression;
pub mod formats;
pub mod identifier;
pub mod logging;
pub mod model;
pub mod primitives;
pub mod projection;
pub mod taxonomy;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{Annotation, CamError};

// =============================================================================
// RE-EXPORTS: Identifiers & Expressions
// =============================================================================

pub use expression::Expression;
pub use identifier::{
    IdentifierCodec, PrefixTable, PrefixTableBuilder, default_prefix_table, has_allowed_scheme,
};

// =============================================================================
// RE-EXPORTS: Models
// =============================================================================

pub use model::{ActivityModel, Fact, Individual};
pub use projection::{Projection, project};

// =============================================================================
// RE-EXPORTS: Ontology Reductions
// =============================================================================

pub use dedup::{
    AncestorOracle, CandidateGroup, RedundancyReport, filter_redundant,
    filter_redundant_by_subject, filter_redundant_with_report,
};
pub use evidence::{
    CodeLookup, EvidenceMapper, ShortCode, ShortCodeMatch, ShortCodeTable, SuperclassOracle,
    default_code_table, resolve_short_code, resolve_short_code_match,
};
pub use taxonomy::SubclassIndex;

// =============================================================================
// RE-EXPORTS: Configuration
// =============================================================================

pub use config::{CoreConfig, LogFormat, LoggingConfig};
