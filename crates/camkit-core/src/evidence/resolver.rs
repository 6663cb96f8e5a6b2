//! Nearest mapped ancestor search.
//!
//! Legacy formats only know a small set of short codes, while curated
//! evidence uses any term of the evidence ontology. The resolver walks the
//! direct superclasses of a term breadth-first and returns the code of the
//! nearest ancestor that has one.

use super::table::{ScopedCodes, ShortCode, ShortCodeTable};
use crate::CamError;
use std::collections::{BTreeSet, VecDeque};

/// Supplies the direct named superclasses of a term.
pub trait SuperclassOracle {
    /// Direct named superclasses of `term`, excluding anonymous ancestors.
    fn superclasses_of(&self, term: &str) -> Result<BTreeSet<String>, CamError>;
}

impl<F> SuperclassOracle for F
where
    F: Fn(&str) -> Result<BTreeSet<String>, CamError>,
{
    fn superclasses_of(&self, term: &str) -> Result<BTreeSet<String>, CamError> {
        self(term)
    }
}

/// Direct term to short code lookup.
pub trait CodeLookup {
    /// Short code mapped directly to `term`, if any.
    fn code_of(&self, term: &str) -> Option<ShortCode>;
}

impl<F> CodeLookup for F
where
    F: Fn(&str) -> Option<ShortCode>,
{
    fn code_of(&self, term: &str) -> Option<ShortCode> {
        self(term)
    }
}

impl CodeLookup for ShortCodeTable {
    fn code_of(&self, term: &str) -> Option<ShortCode> {
        ShortCodeTable::code_of(self, term)
    }
}

impl CodeLookup for ScopedCodes<'_> {
    fn code_of(&self, term: &str) -> Option<ShortCode> {
        ScopedCodes::code_of(self, term)
    }
}

/// A resolved code together with the term it was found on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortCodeMatch {
    /// The resolved code.
    pub code: ShortCode,
    /// The term carrying the mapping: the start term or one of its ancestors.
    pub term: String,
    /// Number of superclass steps from the start term.
    pub distance: usize,
}

/// Short code of `start` or of its nearest mapped ancestor.
///
/// Returns `Ok(None)` when neither the term nor any ancestor is mapped.
pub fn resolve_short_code<C, S>(
    start: &str,
    codes: &C,
    superclasses: &S,
) -> Result<Option<ShortCode>, CamError>
where
    C: CodeLookup + ?Sized,
    S: SuperclassOracle + ?Sized,
{
    resolve_short_code_match(start, codes, superclasses).map(|m| m.map(|m| m.code))
}

/// Like [`resolve_short_code`], also reporting where the code was found.
///
/// Superclasses are visited in BFS order; siblings at equal distance are
/// visited in id order, so the lexicographically first nearest mapped
/// ancestor wins. Each term is expanded at most once, so cyclic graphs
/// terminate.
pub fn resolve_short_code_match<C, S>(
    start: &str,
    codes: &C,
    superclasses: &S,
) -> Result<Option<ShortCodeMatch>, CamError>
where
    C: CodeLookup + ?Sized,
    S: SuperclassOracle + ?Sized,
{
    if let Some(code) = codes.code_of(start) {
        return Ok(Some(ShortCodeMatch {
            code,
            term: start.to_string(),
            distance: 0,
        }));
    }

    let mut visited: BTreeSet<String> = BTreeSet::new();
    visited.insert(start.to_string());

    let mut queue: VecDeque<(String, usize)> = superclasses
        .superclasses_of(start)?
        .into_iter()
        .map(|term| (term, 1))
        .collect();

    while let Some((term, distance)) = queue.pop_front() {
        if visited.contains(&term) {
            continue;
        }
        if let Some(code) = codes.code_of(&term) {
            tracing::trace!(start, ancestor = %term, distance, code = %code.code, "short code resolved");
            return Ok(Some(ShortCodeMatch {
                code,
                term,
                distance,
            }));
        }
        queue.extend(
            superclasses
                .superclasses_of(&term)?
                .into_iter()
                .map(|parent| (parent, distance + 1)),
        );
        visited.insert(term);
    }

    Ok(None)
}

/// Resolves legacy codes for evidence annotations against one code table
/// and one superclass oracle.
#[derive(Debug)]
pub struct EvidenceMapper<'a, S: ?Sized> {
    table: &'a ShortCodeTable,
    superclasses: &'a S,
}

impl<'a, S> EvidenceMapper<'a, S>
where
    S: SuperclassOracle + ?Sized,
{
    /// Create a mapper.
    #[must_use]
    pub fn new(table: &'a ShortCodeTable, superclasses: &'a S) -> Self {
        Self {
            table,
            superclasses,
        }
    }

    /// Short code for `term` as cited with `reference`.
    pub fn short_code(
        &self,
        term: &str,
        reference: Option<&str>,
    ) -> Result<Option<ShortCode>, CamError> {
        resolve_short_code(term, &self.table.scoped(reference), self.superclasses)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::SubclassIndex;
    use std::cell::Cell;

    fn table() -> ShortCodeTable {
        ShortCodeTable::parse(
            "ECO:0000314\tIDA\tDefault\n\
             ECO:0000315\tIMP\tDefault\n\
             ECO:0000501\tIEA\tDefault\n\
             ECO:0000256\tIEA\tGO_REF:0000002\n",
        )
        .expect("table")
    }

    #[test]
    fn direct_hit_skips_oracle() {
        let calls = Cell::new(0);
        let oracle = |_: &str| -> Result<BTreeSet<String>, CamError> {
            calls.set(calls.get() + 1);
            Ok(BTreeSet::new())
        };
        let code = resolve_short_code("ECO:0000314", &table(), &oracle).expect("resolve");
        assert_eq!(code.map(|c| c.code), Some("IDA".to_string()));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn nearest_ancestor_wins() {
        // X -> Y -> ECO:0000315 (IMP), X -> Z -> W -> ECO:0000314 (IDA)
        let index = SubclassIndex::from_edges([
            ("X", "Y"),
            ("Y", "ECO:0000315"),
            ("X", "Z"),
            ("Z", "W"),
            ("W", "ECO:0000314"),
        ]);
        let found = resolve_short_code_match("X", &table(), &index)
            .expect("resolve")
            .expect("match");
        assert_eq!(found.code.code, "IMP");
        assert_eq!(found.term, "ECO:0000315");
        assert_eq!(found.distance, 2);
    }

    #[test]
    fn diamond_resolves_to_first_sibling() {
        let index = SubclassIndex::from_edges([("X", "ECO:0000315"), ("X", "ECO:0000314")]);
        let code = resolve_short_code("X", &table(), &index).expect("resolve");
        assert_eq!(code.map(|c| c.code), Some("IDA".to_string()));
    }

    #[test]
    fn cycle_without_mapping_terminates() {
        let index = SubclassIndex::from_edges([("P", "Q"), ("Q", "P")]);
        assert_eq!(resolve_short_code("P", &table(), &index), Ok(None));
    }

    #[test]
    fn shared_ancestors_are_expanded_once() {
        let expanded = std::cell::RefCell::new(Vec::new());
        let index = SubclassIndex::from_edges([("X", "A"), ("X", "B"), ("A", "C"), ("B", "C")]);
        let oracle = |term: &str| {
            expanded.borrow_mut().push(term.to_string());
            index.superclasses_of(term)
        };
        assert_eq!(resolve_short_code("X", &table(), &oracle), Ok(None));
        assert_eq!(expanded.borrow().as_slice(), ["X", "A", "B", "C"]);
    }

    #[test]
    fn oracle_failure_propagates() {
        let index = SubclassIndex::from_edges([("X", "Y")]);
        let result = resolve_short_code("UNKNOWN", &table(), &index);
        assert!(matches!(result, Err(CamError::OracleFailure { .. })));
    }

    #[test]
    fn mapper_uses_reference_scoped_codes() {
        let codes = table();
        let index = SubclassIndex::from_edges([("ECO:0000256", "ECO:0000501")]);
        let mapper = EvidenceMapper::new(&codes, &index);

        let scoped = mapper
            .short_code("ECO:0000256", Some("GO_REF:0000002"))
            .expect("resolve")
            .expect("code");
        assert_eq!(scoped.reference.as_deref(), Some("GO_REF:0000002"));

        // without the reference, the default IEA of the parent is found
        let inherited = mapper
            .short_code("ECO:0000256", None)
            .expect("resolve")
            .expect("code");
        assert_eq!(inherited.code, "IEA");
        assert_eq!(inherited.reference, None);
    }

    #[test]
    fn closure_code_lookup() {
        let lookup = |term: &str| (term == "T").then(|| ShortCode::new("EXP", None));
        let index = SubclassIndex::from_edges([("S", "T")]);
        let code = resolve_short_code("S", &lookup, &index).expect("resolve");
        assert_eq!(code.map(|c| c.label), Some("Inferred from Experiment".to_string()));
    }
}
