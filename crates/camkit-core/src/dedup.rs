//! # Ancestor Redundancy Filter
//!
//! Collapses several candidate classifications of one subject into the
//! maximally specific ones.
//!
//! A candidate `c` is redundant when another candidate `c'` of the same group
//! has `c` among its named ancestors: `c'` already implies `c`. Retained
//! candidates keep their own supporting annotations; annotations are never
//! merged across candidates.
//!
//! The ancestor closure comes from the caller through `AncestorOracle`,
//! usually backed by a reasoner. Oracle failures are returned, never skipped.

use crate::CamError;
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// ORACLE
// =============================================================================

/// Supplies the named-ancestor closure of a class.
pub trait AncestorOracle {
    /// Every named ancestor of `class`, including ancestors reached through
    /// existential-restriction fillers if the backing reasoner reports them.
    fn ancestors_of(&self, class: &str) -> Result<BTreeSet<String>, CamError>;
}

impl<F> AncestorOracle for F
where
    F: Fn(&str) -> Result<BTreeSet<String>, CamError>,
{
    fn ancestors_of(&self, class: &str) -> Result<BTreeSet<String>, CamError> {
        self(class)
    }
}

// =============================================================================
// CANDIDATE GROUP
// =============================================================================

/// Candidate classes for one subject, each with its supporting annotations.
///
/// Candidates are kept in a `BTreeMap`, so iteration is ordered by class id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateGroup<A> {
    candidates: BTreeMap<String, Vec<A>>,
}

impl<A> Default for CandidateGroup<A> {
    fn default() -> Self {
        Self {
            candidates: BTreeMap::new(),
        }
    }
}

impl<A> CandidateGroup<A> {
    /// Create an empty group.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one supporting annotation for `class`.
    pub fn add(&mut self, class: impl Into<String>, support: A) {
        self.candidates.entry(class.into()).or_default().push(support);
    }

    /// Number of candidate classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Check if the group has no candidates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Supporting annotations of a candidate.
    #[must_use]
    pub fn support(&self, class: &str) -> Option<&[A]> {
        self.candidates.get(class).map(Vec::as_slice)
    }

    /// Candidate class ids in order.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.candidates.keys().map(String::as_str)
    }

    /// (class, support) pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[A])> {
        self.candidates
            .iter()
            .map(|(class, support)| (class.as_str(), support.as_slice()))
    }

    /// Consume the group into its underlying map.
    #[must_use]
    pub fn into_inner(self) -> BTreeMap<String, Vec<A>> {
        self.candidates
    }
}

impl<A, K: Into<String>> FromIterator<(K, A)> for CandidateGroup<A> {
    fn from_iter<I: IntoIterator<Item = (K, A)>>(iter: I) -> Self {
        let mut group = Self::new();
        for (class, support) in iter {
            group.add(class, support);
        }
        group
    }
}

// =============================================================================
// FILTER
// =============================================================================

/// Which candidates were removed, and by which more specific candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedundancyReport {
    /// removed class -> retained-or-removed candidates that imply it
    pub removed: BTreeMap<String, BTreeSet<String>>,
}

impl RedundancyReport {
    /// Check if nothing was removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty()
    }
}

/// Remove candidates that are named ancestors of another candidate.
pub fn filter_redundant<A, O>(
    group: CandidateGroup<A>,
    oracle: &O,
) -> Result<CandidateGroup<A>, CamError>
where
    O: AncestorOracle + ?Sized,
{
    filter_redundant_with_report(group, oracle).map(|(kept, _)| kept)
}

/// Remove redundant candidates and report what was removed.
///
/// Each candidate's closure is requested exactly once. Candidates that are
/// each other's ancestor (equivalent classes) are both removed.
pub fn filter_redundant_with_report<A, O>(
    group: CandidateGroup<A>,
    oracle: &O,
) -> Result<(CandidateGroup<A>, RedundancyReport), CamError>
where
    O: AncestorOracle + ?Sized,
{
    let closures: BTreeMap<&str, BTreeSet<String>> = group
        .classes()
        .map(|class| oracle.ancestors_of(class).map(|anc| (class, anc)))
        .collect::<Result<_, _>>()?;

    let mut report = RedundancyReport::default();
    for &class in closures.keys() {
        let subsumers: BTreeSet<String> = closures
            .iter()
            .filter(|(other, other_ancestors)| {
                **other != class && other_ancestors.contains(class)
            })
            .map(|(other, _)| (*other).to_string())
            .collect();
        if !subsumers.is_empty() {
            report.removed.insert(class.to_string(), subsumers);
        }
    }

    let mut candidates = group.into_inner();
    for class in report.removed.keys() {
        candidates.remove(class);
        tracing::debug!(class = %class, "redundant candidate removed");
    }

    Ok((CandidateGroup { candidates }, report))
}

/// Apply `filter_redundant` to the candidate group of every subject.
///
/// Stops at the first oracle failure.
pub fn filter_redundant_by_subject<A, O>(
    groups: BTreeMap<String, CandidateGroup<A>>,
    oracle: &O,
) -> Result<BTreeMap<String, CandidateGroup<A>>, CamError>
where
    O: AncestorOracle + ?Sized,
{
    groups
        .into_iter()
        .map(|(subject, group)| filter_redundant(group, oracle).map(|kept| (subject, kept)))
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================
