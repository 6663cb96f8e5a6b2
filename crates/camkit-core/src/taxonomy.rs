//! # Subclass Index
//!
//! A small in-memory graph of named classes and their direct superclasses.
//!
//! It answers the two oracle questions the core asks of an ontology store:
//! direct superclasses (for evidence code resolution) and the transitive
//! ancestor closure (for redundancy filtering). Real deployments back these
//! oracles with a reasoner; the index serves fixtures, tests and small
//! curated vocabularies.
//!
//! Uses `BTreeMap`/`BTreeSet` for deterministic ordering. Closure computation
//! is an iterative BFS with a visited set, so cyclic input terminates.

use crate::CamError;
use crate::dedup::AncestorOracle;
use crate::evidence::SuperclassOracle;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// Named classes with their direct superclass edges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubclassIndex {
    /// class -> direct superclasses
    parents: BTreeMap<String, BTreeSet<String>>,
}

impl SubclassIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from (child, parent) edges.
    pub fn from_edges<I, C, P>(edges: I) -> Self
    where
        I: IntoIterator<Item = (C, P)>,
        C: Into<String>,
        P: Into<String>,
    {
        let mut index = Self::new();
        for (child, parent) in edges {
            index.add_subclass_of(child, parent);
        }
        index
    }

    /// Register a class with no superclasses. No-op if already known.
    pub fn add_class(&mut self, class: impl Into<String>) {
        self.parents.entry(class.into()).or_default();
    }

    /// Register `child SubClassOf parent`. Both classes become known.
    pub fn add_subclass_of(&mut self, child: impl Into<String>, parent: impl Into<String>) {
        let parent = parent.into();
        self.parents.entry(parent.clone()).or_default();
        self.parents.entry(child.into()).or_default().insert(parent);
    }

    /// Check if a class is known.
    #[must_use]
    pub fn contains(&self, class: &str) -> bool {
        self.parents.contains_key(class)
    }

    /// Number of known classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    /// Check if the index has no classes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Direct superclasses of a known class.
    #[must_use]
    pub fn direct_superclasses(&self, class: &str) -> Option<&BTreeSet<String>> {
        self.parents.get(class)
    }

    /// Every named ancestor of a known class, excluding the class itself
    /// unless it sits on a cycle.
    #[must_use]
    pub fn ancestors(&self, class: &str) -> Option<BTreeSet<String>> {
        let direct = self.parents.get(class)?;

        let mut ancestors = BTreeSet::new();
        let mut queue: VecDeque<&String> = direct.iter().collect();

        while let Some(current) = queue.pop_front() {
            if !ancestors.insert(current.clone()) {
                continue;
            }
            if let Some(next) = self.parents.get(current) {
                queue.extend(next.iter().filter(|p| !ancestors.contains(*p)));
            }
        }

        Some(ancestors)
    }

    fn unknown(class: &str) -> CamError {
        CamError::oracle(class, "class not present in subclass index")
    }
}

impl AncestorOracle for SubclassIndex {
    fn ancestors_of(&self, class: &str) -> Result<BTreeSet<String>, CamError> {
        self.ancestors(class).ok_or_else(|| Self::unknown(class))
    }
}

impl SuperclassOracle for SubclassIndex {
    fn superclasses_of(&self, class: &str) -> Result<BTreeSet<String>, CamError> {
        self.direct_superclasses(class)
            .cloned()
            .ok_or_else(|| Self::unknown(class))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn ancestors_are_transitive() {
        let index = SubclassIndex::from_edges([("C", "B"), ("B", "A")]);
        assert_eq!(index.ancestors("C"), Some(set(&["A", "B"])));
        assert_eq!(index.ancestors("A"), Some(BTreeSet::new()));
        assert_eq!(index.ancestors("Z"), None);
    }

    #[test]
    fn diamond_ancestors_are_deduplicated() {
        let index = SubclassIndex::from_edges([("D", "B"), ("D", "C"), ("B", "A"), ("C", "A")]);
        assert_eq!(index.ancestors("D"), Some(set(&["A", "B", "C"])));
    }

    #[test]
    fn cycles_terminate() {
        let index = SubclassIndex::from_edges([("P", "Q"), ("Q", "P")]);
        assert_eq!(index.ancestors("P"), Some(set(&["P", "Q"])));
    }

    #[test]
    fn oracles_fail_for_unknown_classes() {
        let index = SubclassIndex::from_edges([("B", "A")]);
        assert!(matches!(
            index.ancestors_of("Z"),
            Err(CamError::OracleFailure { ref term, .. }) if term == "Z"
        ));
        assert!(index.superclasses_of("Z").is_err());
        assert_eq!(index.superclasses_of("B"), Ok(set(&["A"])));
    }

    #[test]
    fn add_class_registers_isolated_class() {
        let mut index = SubclassIndex::new();
        assert!(index.is_empty());
        index.add_class("GO:0008150");
        assert!(index.contains("GO:0008150"));
        assert_eq!(index.len(), 1);
        assert_eq!(index.direct_superclasses("GO:0008150"), Some(&BTreeSet::new()));
    }
}
