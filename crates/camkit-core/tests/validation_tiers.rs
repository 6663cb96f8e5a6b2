//! # Validation Tier Tests (T0-T4)
//!
//! If ANY tier fails, the export pipeline cannot be trusted.
//!
//! ## Tiers
//! - T0: Identifier Integrity
//! - T1: Expression Wire Codec
//! - T2: Graph Projection
//! - T3: Redundancy Filtering
//! - T4: Evidence Code Resolution

use camkit_core::{
    CamError, Expression, IdentifierCodec, PrefixTable, PrefixTableBuilder, SubclassIndex,
};
use std::collections::BTreeSet;

fn table(pairs: &[(&str, &str)]) -> PrefixTable {
    PrefixTableBuilder::new()
        .with_pairs(pairs.iter().copied())
        .expect("pairs")
        .build()
}

// =============================================================================
// TIER T0: IDENTIFIER INTEGRITY
// =============================================================================

mod t0_identifier_integrity {
    use super::*;

    /// T0.1: The longest registered namespace wins.
    #[test]
    fn longest_prefix_wins() {
        let t = table(&[("A", "http://x/a"), ("AB", "http://x/ab/")]);
        assert_eq!(t.to_compact("http://x/ab/1"), "AB:1");
        assert_ne!(t.to_compact("http://x/ab/1"), "A:b/1");
    }

    /// T0.2: A namespace alone is never compacted to an empty suffix.
    #[test]
    fn no_degenerate_compaction() {
        let t = table(&[("A", "http://x/a")]);
        assert_eq!(t.to_compact("http://x/a"), "http://x/a");
    }

    /// T0.3: Unregistered prefixes fail.
    #[test]
    fn unknown_prefix_fails() {
        let t = table(&[("GO", "http://purl.obolibrary.org/obo/GO_")]);
        assert!(matches!(
            t.to_full("ZZ:123"),
            Err(CamError::UnknownPrefix { ref prefix, .. }) if prefix == "ZZ"
        ));
    }

    /// T0.4: Allowed schemes pass through expansion untouched.
    #[test]
    fn allowed_scheme_passes_through() {
        let t = table(&[]);
        assert_eq!(
            t.to_full("http://example.org/thing").as_deref(),
            Ok("http://example.org/thing")
        );
    }

    /// T0.5: Identifiers without a separator are malformed.
    #[test]
    fn missing_separator_is_malformed() {
        let t = table(&[]);
        assert!(matches!(
            t.to_full("GO0008150"),
            Err(CamError::MalformedIdentifier(_))
        ));
    }

    /// T0.6: Compaction then expansion restores the identifier.
    #[test]
    fn compact_then_expand_restores() {
        let t = camkit_core::default_prefix_table().expect("defaults");
        for full in [
            "http://purl.obolibrary.org/obo/GO_0003674",
            "http://purl.obolibrary.org/obo/RO_0002333",
            "http://model.geneontology.org/5fa76ad400000000",
        ] {
            let compact = t.to_compact(full);
            assert_ne!(compact, full);
            assert_eq!(t.to_full(&compact).as_deref(), Ok(full));
        }
    }
}

// =============================================================================
// TIER T1: EXPRESSION WIRE CODEC
// =============================================================================

mod t1_expression_codec {
    use super::*;
    use camkit_core::formats::{decode, decode_str, encode, encode_compact};

    fn nested() -> Expression {
        Expression::IntersectionOf(vec![
            Expression::atom("GO:0003674"),
            Expression::some(
                "BFO:0000066",
                Expression::UnionOf(vec![
                    Expression::atom("CL:0000000"),
                    Expression::some("RO:0002233", Expression::atom("CHEBI:15377")),
                ]),
            ),
        ])
    }

    /// T1.1: Encoding then decoding restores the tree.
    #[test]
    fn round_trip() {
        let expr = nested();
        assert_eq!(decode(&encode(&expr)), Ok(expr));
    }

    /// T1.2: A single-operand union decodes to its operand.
    #[test]
    fn single_operand_collapses() {
        let decoded =
            decode_str(r#"{"type": "union", "expressions": [{"type": "class", "id": "GO:1"}]}"#);
        assert_eq!(decoded, Ok(Expression::atom("GO:1")));
    }

    /// T1.3: Missing type tag fails.
    #[test]
    fn missing_type_fails() {
        assert_eq!(
            decode_str(r#"{"id": "GO:1"}"#),
            Err(CamError::MissingExpressionType)
        );
    }

    /// T1.4: Restriction without filler fails.
    #[test]
    fn missing_filler_fails() {
        let text = r#"{"type": "svf", "property": {"type": "property", "id": "RO:1"}}"#;
        assert_eq!(decode_str(text), Err(CamError::MissingFiller));
    }

    /// T1.5: Empty operand lists fail.
    #[test]
    fn empty_operands_fail() {
        assert!(matches!(
            decode_str(r#"{"type": "intersection", "expressions": []}"#),
            Err(CamError::MissingOperands(_))
        ));
    }

    /// T1.6: Unknown tags fail.
    #[test]
    fn unknown_type_fails() {
        assert_eq!(
            decode_str(r#"{"type": "complement", "id": "GO:1"}"#),
            Err(CamError::UnknownExpressionType("complement".to_string()))
        );
    }

    /// T1.7: Identifiers with whitespace fail.
    #[test]
    fn invalid_identifier_fails() {
        assert!(matches!(
            decode_str(r#"{"type": "class", "id": "GO: 1"}"#),
            Err(CamError::InvalidIdentifierSyntax(_))
        ));
    }

    /// T1.8: Compact encoding shortens every identifier.
    #[test]
    fn compact_encoding() {
        let t = table(&[
            ("GO", "http://purl.obolibrary.org/obo/GO_"),
            ("BFO", "http://purl.obolibrary.org/obo/BFO_"),
        ]);
        let expr = Expression::some(
            "http://purl.obolibrary.org/obo/BFO_0000050",
            Expression::atom("http://purl.obolibrary.org/obo/GO_0005634"),
        );
        let value = serde_json::to_value(encode_compact(&expr, &t)).expect("json");
        assert_eq!(value["property"]["id"], "BFO:0000050");
        assert_eq!(value["filler"]["id"], "GO:0005634");
        assert_eq!(value["type"], "svf");
    }
}

// =============================================================================
// TIER T2: GRAPH PROJECTION
// =============================================================================

mod t2_graph_projection {
    use camkit_core::{ActivityModel, Fact, Individual};
    use std::collections::BTreeSet;

    fn chain() -> ActivityModel {
        let mut model = ActivityModel::new("gomodel:1");
        for id in ["A", "B", "C"] {
            model.insert_individual(Individual::new(id));
        }
        model.add_fact(Fact::new("A", "RO:0002413", "B")).expect("A->B");
        model.add_fact(Fact::new("B", "RO:0002413", "C")).expect("B->C");
        model
    }

    /// T2.1: Only facts between selected individuals survive.
    #[test]
    fn induced_subgraph() {
        let selected: BTreeSet<&str> = ["A", "B"].into_iter().collect();
        let view = chain().project(&selected);
        assert_eq!(view.individuals.len(), 2);
        assert_eq!(view.facts, vec![Fact::new("A", "RO:0002413", "B")]);
    }

    /// T2.2: Empty selection projects to nothing.
    #[test]
    fn empty_selection() {
        let view = chain().project(&BTreeSet::<String>::new());
        assert!(view.individuals.is_empty());
        assert!(view.facts.is_empty());
    }

    /// T2.3: Every projected fact has both endpoints selected.
    #[test]
    fn closure_invariant() {
        let selected: BTreeSet<&str> = ["B", "C"].into_iter().collect();
        let view = chain().project(&selected);
        assert!(
            view.facts
                .iter()
                .all(|f| selected.contains(f.subject.as_str())
                    && selected.contains(f.object.as_str()))
        );
    }
}

// =============================================================================
// TIER T3: REDUNDANCY FILTERING
// =============================================================================

mod t3_redundancy_filtering {
    use super::*;
    use camkit_core::{CandidateGroup, filter_redundant};

    /// T3.1: An ancestor of another candidate is dropped.
    #[test]
    fn subsumed_candidate_dropped() {
        let index = SubclassIndex::from_edges([("Y", "X")]);
        let group: CandidateGroup<&str> = [("X", "ann-x"), ("Y", "ann-y")].into_iter().collect();
        let kept = filter_redundant(group, &index).expect("filter");
        assert_eq!(kept.classes().collect::<Vec<_>>(), vec!["Y"]);
        assert_eq!(kept.support("Y"), Some(&["ann-y"][..]));
    }

    /// T3.2: Unrelated candidates are both kept.
    #[test]
    fn unrelated_candidates_kept() {
        let index = SubclassIndex::from_edges([("X", "R"), ("Y", "R")]);
        let group: CandidateGroup<&str> = [("X", "a"), ("Y", "b")].into_iter().collect();
        assert_eq!(filter_redundant(group, &index).expect("filter").len(), 2);
    }

    /// T3.3: Mutually subsuming candidates are both dropped.
    #[test]
    fn mutual_ancestors_dropped() {
        let index = SubclassIndex::from_edges([("P", "Q"), ("Q", "P")]);
        let group: CandidateGroup<&str> = [("P", "a"), ("Q", "b")].into_iter().collect();
        let kept = filter_redundant(group, &index).expect("filter");
        assert!(kept.classes().next().is_none());
    }

    /// T3.4: Oracle failures surface to the caller.
    #[test]
    fn oracle_failure_surfaces() {
        let oracle = |class: &str| -> Result<BTreeSet<String>, CamError> {
            Err(CamError::oracle(class, "reasoner unavailable"))
        };
        let group: CandidateGroup<&str> = [("X", "a")].into_iter().collect();
        assert!(matches!(
            filter_redundant(group, &oracle),
            Err(CamError::OracleFailure { .. })
        ));
    }
}

// =============================================================================
// TIER T4: EVIDENCE CODE RESOLUTION
// =============================================================================

mod t4_evidence_resolution {
    use super::*;
    use camkit_core::{default_code_table, resolve_short_code};

    /// T4.1: A mapped term resolves directly.
    #[test]
    fn direct_mapping() {
        let codes = default_code_table().expect("codes");
        let index = SubclassIndex::new();
        let code = resolve_short_code("ECO:0000314", codes, &index).expect("resolve");
        assert_eq!(code.map(|c| c.code), Some("IDA".to_string()));
    }

    /// T4.2: An unmapped term inherits its nearest ancestor's code.
    #[test]
    fn inherited_mapping() {
        let codes = default_code_table().expect("codes");
        // fluorescence microscopy evidence -> direct assay evidence
        let index = SubclassIndex::from_edges([
            ("ECO:0000324", "ECO:0000314"),
            ("ECO:0000314", "ECO:0000269"),
        ]);
        let code = resolve_short_code("ECO:0000324", codes, &index).expect("resolve");
        assert_eq!(code.map(|c| c.code), Some("IDA".to_string()));
    }

    /// T4.3: A cycle without mappings terminates with no code.
    #[test]
    fn cycle_terminates() {
        let codes = default_code_table().expect("codes");
        let index = SubclassIndex::from_edges([("P", "Q"), ("Q", "P")]);
        assert_eq!(resolve_short_code("P", codes, &index), Ok(None));
    }
}
