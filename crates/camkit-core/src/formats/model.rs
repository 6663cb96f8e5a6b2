//! # Model Wire Format
//!
//! JSON documents for individuals, facts and whole models.
//!
//! ```text
//! individual: {"id", "type": [expr], "inferred-type": [expr], "root-type": [expr], "annotations"}
//! fact:       {"subject", "property", "property-label"?, "object", "annotations"}
//! model:      {"id", "individuals": [...], "facts": [...], "annotations"}
//! ```
//!
//! Identifiers are held in full form inside the core; rendering compacts
//! them with an `IdentifierCodec` and parsing expands them again.

use crate::formats::expression::{
    ExpressionJson, compact_identifiers, decode_expanded, encode_labeled,
};
use crate::identifier::IdentifierCodec;
use crate::model::{ActivityModel, Fact, Individual};
use crate::projection::Projection;
use crate::{Annotation, CamError, Expression};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// WIRE TYPES
// =============================================================================

/// Wire form of an individual.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IndividualJson {
    pub id: String,

    #[serde(rename = "type", default)]
    pub types: Vec<ExpressionJson>,

    #[serde(rename = "inferred-type", default, skip_serializing_if = "Vec::is_empty")]
    pub inferred_types: Vec<ExpressionJson>,

    #[serde(rename = "root-type", default, skip_serializing_if = "Vec::is_empty")]
    pub root_types: Vec<ExpressionJson>,

    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

/// Wire form of a fact.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FactJson {
    pub subject: String,

    pub property: String,

    #[serde(rename = "property-label", default, skip_serializing_if = "Option::is_none")]
    pub property_label: Option<String>,

    pub object: String,

    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

/// Wire form of a model or of a projected part of one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModelJson {
    pub id: String,

    #[serde(default)]
    pub individuals: Vec<IndividualJson>,

    #[serde(default)]
    pub facts: Vec<FactJson>,

    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

// =============================================================================
// RENDERER
// =============================================================================

/// Renders core model structures to their wire form.
pub struct ModelRenderer<'a, C: ?Sized> {
    codec: &'a C,
    /// Full identifier -> display label
    labels: BTreeMap<String, String>,
}

impl<'a, C> ModelRenderer<'a, C>
where
    C: IdentifierCodec + ?Sized,
{
    /// Create a renderer that compacts identifiers with `codec`.
    #[must_use]
    pub fn new(codec: &'a C) -> Self {
        Self {
            codec,
            labels: BTreeMap::new(),
        }
    }

    /// Attach display labels, keyed by full identifier.
    #[must_use]
    pub fn with_labels(mut self, labels: BTreeMap<String, String>) -> Self {
        self.labels = labels;
        self
    }

    fn label(&self, id: &str) -> Option<String> {
        self.labels.get(id).cloned()
    }

    fn render_expression(&self, expr: &Expression) -> ExpressionJson {
        let mut json = encode_labeled(expr, &|id: &str| self.label(id));
        compact_identifiers(&mut json, self.codec);
        json
    }

    fn render_expressions(&self, exprs: &[Expression]) -> Vec<ExpressionJson> {
        exprs.iter().map(|e| self.render_expression(e)).collect()
    }

    /// Render one individual.
    #[must_use]
    pub fn render_individual(&self, individual: &Individual) -> IndividualJson {
        IndividualJson {
            id: self.codec.to_compact(&individual.id),
            types: self.render_expressions(&individual.types),
            inferred_types: self.render_expressions(&individual.inferred_types),
            root_types: self.render_expressions(&individual.root_types),
            annotations: individual.annotations.clone(),
        }
    }

    /// Render one fact.
    #[must_use]
    pub fn render_fact(&self, fact: &Fact) -> FactJson {
        FactJson {
            subject: self.codec.to_compact(&fact.subject),
            property: self.codec.to_compact(&fact.property),
            property_label: self.label(&fact.property),
            object: self.codec.to_compact(&fact.object),
            annotations: fact.annotations.clone(),
        }
    }

    /// Render a projection as a partial model document.
    #[must_use]
    pub fn render_projection(&self, model_id: &str, projection: &Projection) -> ModelJson {
        ModelJson {
            id: self.codec.to_compact(model_id),
            individuals: projection
                .individuals
                .iter()
                .map(|ind| self.render_individual(ind))
                .collect(),
            facts: projection
                .facts
                .iter()
                .map(|fact| self.render_fact(fact))
                .collect(),
            annotations: Vec::new(),
        }
    }

    /// Render a whole model.
    #[must_use]
    pub fn render_model(&self, model: &ActivityModel) -> ModelJson {
        ModelJson {
            id: self.codec.to_compact(model.id()),
            individuals: model
                .individuals()
                .iter()
                .map(|ind| self.render_individual(ind))
                .collect(),
            facts: model
                .facts()
                .iter()
                .map(|fact| self.render_fact(fact))
                .collect(),
            annotations: model.annotations().to_vec(),
        }
    }
}

// =============================================================================
// PARSER
// =============================================================================

fn parse_expressions<C>(exprs: &[ExpressionJson], codec: &C) -> Result<Vec<Expression>, CamError>
where
    C: IdentifierCodec + ?Sized,
{
    exprs.iter().map(|e| decode_expanded(e, codec)).collect()
}

/// Parse an individual, expanding identifiers with `codec`.
pub fn parse_individual<C>(json: &IndividualJson, codec: &C) -> Result<Individual, CamError>
where
    C: IdentifierCodec + ?Sized,
{
    Ok(Individual {
        id: codec.to_full(&json.id)?,
        types: parse_expressions(&json.types, codec)?,
        inferred_types: parse_expressions(&json.inferred_types, codec)?,
        root_types: parse_expressions(&json.root_types, codec)?,
        annotations: json.annotations.clone(),
    })
}

/// Parse a fact, expanding identifiers with `codec`.
pub fn parse_fact<C>(json: &FactJson, codec: &C) -> Result<Fact, CamError>
where
    C: IdentifierCodec + ?Sized,
{
    Ok(Fact {
        subject: codec.to_full(&json.subject)?,
        property: codec.to_full(&json.property)?,
        object: codec.to_full(&json.object)?,
        annotations: json.annotations.clone(),
    })
}

/// Parse a model document.
///
/// Facts must refer to individuals present in the same document.
pub fn parse_model<C>(json: &ModelJson, codec: &C) -> Result<ActivityModel, CamError>
where
    C: IdentifierCodec + ?Sized,
{
    let mut model = ActivityModel::new(codec.to_full(&json.id)?);
    for annotation in &json.annotations {
        model.add_annotation(annotation.clone());
    }
    for individual in &json.individuals {
        model.insert_individual(parse_individual(individual, codec)?);
    }
    for fact in &json.facts {
        model.add_fact(parse_fact(fact, codec)?)?;
    }
    Ok(model)
}

/// Parse a model from JSON text.
pub fn parse_model_str<C>(text: &str, codec: &C) -> Result<ActivityModel, CamError>
where
    C: IdentifierCodec + ?Sized,
{
    let json: ModelJson =
        serde_json::from_str(text).map_err(|e| CamError::DeserializationError(e.to_string()))?;
    parse_model(&json, codec)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::{PrefixTable, PrefixTableBuilder};
    use serde_json::json;
    use std::collections::BTreeSet;

    const GO: &str = "http://purl.obolibrary.org/obo/GO_";
    const RO: &str = "http://purl.obolibrary.org/obo/RO_";
    const M: &str = "http://model.geneontology.org/";

    fn table() -> PrefixTable {
        PrefixTableBuilder::new()
            .with_pairs([("GO", GO), ("RO", RO), ("gomodel", M)])
            .expect("pairs")
            .build()
    }

    fn sample_model() -> ActivityModel {
        let mut model = ActivityModel::new(format!("{M}m1"));
        model.add_annotation(Annotation::new("title", "kinase activity model"));
        model.insert_individual(
            Individual::new(format!("{M}i1"))
                .with_type(Expression::atom(format!("{GO}0004672")))
                .with_root_type(Expression::atom(format!("{GO}0003674"))),
        );
        model.insert_individual(
            Individual::new(format!("{M}i2")).with_type(Expression::atom(format!("{GO}0006468"))),
        );
        model
            .add_fact(
                Fact::new(format!("{M}i1"), format!("{RO}0002211"), format!("{M}i2"))
                    .with_annotation(Annotation::typed("evidence", "gomodel:e1", "IRI")),
            )
            .expect("fact");
        model
    }

    #[test]
    fn render_uses_wire_field_names() {
        let t = table();
        let mut labels = BTreeMap::new();
        labels.insert(format!("{RO}0002211"), "regulates".to_string());
        let renderer = ModelRenderer::new(&t).with_labels(labels);

        let value = serde_json::to_value(renderer.render_model(&sample_model())).expect("json");
        assert_eq!(value["id"], json!("gomodel:m1"));
        assert_eq!(value["individuals"][0]["type"][0]["id"], json!("GO:0004672"));
        assert_eq!(value["individuals"][0]["root-type"][0]["id"], json!("GO:0003674"));
        assert!(value["individuals"][1].get("inferred-type").is_none());
        assert_eq!(value["facts"][0]["property"], json!("RO:0002211"));
        assert_eq!(value["facts"][0]["property-label"], json!("regulates"));
        assert_eq!(value["facts"][0]["annotations"][0]["value-type"], json!("IRI"));
    }

    #[test]
    fn render_then_parse_restores_model() {
        let t = table();
        let original = sample_model();
        let wire = ModelRenderer::new(&t).render_model(&original);
        let text = serde_json::to_string(&wire).expect("json");

        let parsed = parse_model_str(&text, &t).expect("parse");
        assert_eq!(parsed.id(), original.id());
        assert_eq!(parsed.individuals(), original.individuals());
        assert_eq!(parsed.facts(), original.facts());
        assert_eq!(parsed.annotations(), original.annotations());
    }

    #[test]
    fn render_projection_keeps_selected_part() {
        let t = table();
        let model = sample_model();
        let selected: BTreeSet<String> = [format!("{M}i1")].into_iter().collect();
        let wire = ModelRenderer::new(&t).render_projection(model.id(), &model.project(&selected));
        assert_eq!(wire.individuals.len(), 1);
        assert_eq!(wire.individuals[0].id, "gomodel:i1");
        assert!(wire.facts.is_empty());
    }

    #[test]
    fn labels_appear_on_expression_nodes() {
        let t = table();
        let mut labels = BTreeMap::new();
        labels.insert(format!("{GO}0004672"), "protein kinase activity".to_string());
        let renderer = ModelRenderer::new(&t).with_labels(labels);
        let ind = renderer.render_individual(&sample_model().individuals()[0].clone());
        assert_eq!(ind.types[0].label.as_deref(), Some("protein kinase activity"));
        assert_eq!(ind.types[0].id.as_deref(), Some("GO:0004672"));
    }

    #[test]
    fn parse_rejects_fact_to_missing_individual() {
        let doc = json!({
            "id": "gomodel:m1",
            "individuals": [{"id": "gomodel:i1", "type": []}],
            "facts": [{"subject": "gomodel:i1", "property": "RO:1", "object": "gomodel:i9"}]
        });
        let json: ModelJson = serde_json::from_value(doc).expect("shape");
        assert_eq!(
            parse_model(&json, &table()).map(|m| m.facts().len()),
            Err(CamError::UnknownIndividual(format!("{M}i9")))
        );
    }

    #[test]
    fn parse_propagates_expression_errors() {
        let doc = json!({
            "id": "gomodel:i1",
            "type": [{"type": "svf", "property": {"type": "property", "id": "RO:1"}}]
        });
        let json: IndividualJson = serde_json::from_value(doc).expect("shape");
        assert_eq!(parse_individual(&json, &table()), Err(CamError::MissingFiller));
    }

    #[test]
    fn parse_propagates_unknown_prefix() {
        let json = FactJson {
            subject: "gomodel:i1".to_string(),
            property: "XX:1".to_string(),
            object: "gomodel:i2".to_string(),
            ..FactJson::default()
        };
        assert!(matches!(
            parse_fact(&json, &table()),
            Err(CamError::UnknownPrefix { .. })
        ));
    }
}
