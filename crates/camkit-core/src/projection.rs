//! # Graph Projection
//!
//! Induced sub-graph of a model over a selected set of individuals.
//!
//! The projection is a pure filter:
//! - individuals are kept iff their id is selected (input order preserved)
//! - facts are kept iff subject AND object are selected (direction preserved)
//!
//! It is not a closure. Individuals reachable only through unselected
//! intermediaries are not pulled in, and no fact is ever fabricated.

use crate::model::{Fact, Individual};
use std::borrow::Borrow;
use std::collections::BTreeSet;

/// The result of a projection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Projection {
    /// Selected individuals, in input order.
    pub individuals: Vec<Individual>,
    /// Facts between selected individuals, in input order.
    pub facts: Vec<Fact>,
}

impl Projection {
    /// Check if the projection has neither individuals nor facts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty() && self.facts.is_empty()
    }
}

/// Project individuals and facts onto `selected`.
///
/// An empty selection yields an empty projection.
#[must_use]
pub fn project<S>(individuals: &[Individual], facts: &[Fact], selected: &BTreeSet<S>) -> Projection
where
    S: Borrow<str> + Ord,
{
    if selected.is_empty() {
        return Projection::default();
    }

    let individuals: Vec<Individual> = individuals
        .iter()
        .filter(|ind| selected.contains(ind.id.as_str()))
        .cloned()
        .collect();

    let facts: Vec<Fact> = facts
        .iter()
        .filter(|fact| {
            selected.contains(fact.subject.as_str()) && selected.contains(fact.object.as_str())
        })
        .cloned()
        .collect();

    tracing::trace!(
        selected = selected.len(),
        individuals = individuals.len(),
        facts = facts.len(),
        "projection computed"
    );

    Projection { individuals, facts }
}

// =============================================================================
// TESTS
// =============================================================================
