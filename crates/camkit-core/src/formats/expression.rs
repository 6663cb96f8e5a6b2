//! # Expression Wire Format
//!
//! Tagged JSON tree form of class expressions:
//!
//! ```text
//! {"type": "class", "id": "GO:0003674"}
//! {"type": "svf", "property": {"type": "property", "id": "BFO:0000050"}, "filler": {...}}
//! {"type": "union" | "intersection", "expressions": [{...}, ...]}
//! ```
//!
//! `ExpressionJson` is deliberately loose (every field optional) so that
//! `decode` can report exactly which part of a node is missing instead of a
//! generic deserialization failure.

use crate::expression::Expression;
use crate::identifier::IdentifierCodec;
use crate::primitives::{
    TAG_CLASS, TAG_INTERSECTION, TAG_PROPERTY, TAG_SOME_VALUES_FROM, TAG_UNION,
};
use crate::CamError;
use serde::{Deserialize, Serialize};

/// One node of the expression wire tree.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExpressionJson {
    /// Node tag: `class`, `svf`, `property`, `union` or `intersection`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Identifier of a class or property node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Display label of a class or property node. Ignored by `decode`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Property node of a restriction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<Box<ExpressionJson>>,

    /// Filler of a restriction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filler: Option<Box<ExpressionJson>>,

    /// Operands of a union or intersection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expressions: Option<Vec<ExpressionJson>>,
}

impl ExpressionJson {
    fn named(kind: &str, id: &str, label: Option<String>) -> Self {
        Self {
            kind: Some(kind.to_string()),
            id: Some(id.to_string()),
            label,
            ..Self::default()
        }
    }

    fn nary(kind: &str, expressions: Vec<ExpressionJson>) -> Self {
        Self {
            kind: Some(kind.to_string()),
            expressions: Some(expressions),
            ..Self::default()
        }
    }
}

// =============================================================================
// ENCODE
// =============================================================================

/// Encode an expression into its wire tree.
#[must_use]
pub fn encode(expr: &Expression) -> ExpressionJson {
    encode_labeled(expr, &|_: &str| None)
}

/// Encode an expression, attaching labels to class and property nodes.
///
/// `labeler` returns the display label for an identifier, if one is known.
#[must_use]
pub fn encode_labeled<L>(expr: &Expression, labeler: &L) -> ExpressionJson
where
    L: Fn(&str) -> Option<String> + ?Sized,
{
    match expr {
        Expression::Atom(id) => ExpressionJson::named(TAG_CLASS, id, labeler(id.as_str())),
        Expression::Restriction { property, filler } => ExpressionJson {
            kind: Some(TAG_SOME_VALUES_FROM.to_string()),
            property: Some(Box::new(ExpressionJson::named(
                TAG_PROPERTY,
                property,
                labeler(property.as_str()),
            ))),
            filler: Some(Box::new(encode_labeled(filler, labeler))),
            ..ExpressionJson::default()
        },
        Expression::UnionOf(ops) => ExpressionJson::nary(
            TAG_UNION,
            ops.iter().map(|op| encode_labeled(op, labeler)).collect(),
        ),
        Expression::IntersectionOf(ops) => ExpressionJson::nary(
            TAG_INTERSECTION,
            ops.iter().map(|op| encode_labeled(op, labeler)).collect(),
        ),
    }
}

/// Encode an expression with every identifier compacted by `codec`.
#[must_use]
pub fn encode_compact<C>(expr: &Expression, codec: &C) -> ExpressionJson
where
    C: IdentifierCodec + ?Sized,
{
    let mut json = encode(expr);
    compact_identifiers(&mut json, codec);
    json
}

/// Compact every `id` in an encoded tree in place. Labels are untouched.
pub fn compact_identifiers<C>(json: &mut ExpressionJson, codec: &C)
where
    C: IdentifierCodec + ?Sized,
{
    let mut stack = vec![json];
    while let Some(node) = stack.pop() {
        if let Some(id) = node.id.as_mut() {
            *id = codec.to_compact(id);
        }
        if let Some(property) = node.property.as_deref_mut() {
            stack.push(property);
        }
        if let Some(filler) = node.filler.as_deref_mut() {
            stack.push(filler);
        }
        if let Some(ops) = node.expressions.as_mut() {
            stack.extend(ops.iter_mut());
        }
    }
}

// =============================================================================
// DECODE
// =============================================================================

/// Decode a wire tree into an expression.
///
/// Single-operand unions and intersections collapse to their operand.
pub fn decode(json: &ExpressionJson) -> Result<Expression, CamError> {
    let Some(kind) = json.kind.as_deref() else {
        return Err(CamError::MissingExpressionType);
    };

    match kind {
        TAG_CLASS => Ok(Expression::Atom(node_identifier(json, TAG_CLASS)?)),
        TAG_SOME_VALUES_FROM => {
            let property = json.property.as_deref().ok_or(CamError::MissingProperty)?;
            if let Some(tag) = property.kind.as_deref().filter(|tag| *tag != TAG_PROPERTY) {
                return Err(CamError::UnknownExpressionType(tag.to_string()));
            }
            let property = node_identifier(property, TAG_PROPERTY)?;
            let filler = json.filler.as_deref().ok_or(CamError::MissingFiller)?;
            Ok(Expression::some(property, decode(filler)?))
        }
        TAG_UNION => Expression::union(decode_operands(json, TAG_UNION)?),
        TAG_INTERSECTION => Expression::intersection(decode_operands(json, TAG_INTERSECTION)?),
        other => Err(CamError::UnknownExpressionType(other.to_string())),
    }
}

/// Decode a wire tree and expand every identifier with `codec`.
pub fn decode_expanded<C>(json: &ExpressionJson, codec: &C) -> Result<Expression, CamError>
where
    C: IdentifierCodec + ?Sized,
{
    decode(json)?.map_identifiers(&mut |id: &str| codec.to_full(id))
}

/// Parse JSON text and decode it.
pub fn decode_str(text: &str) -> Result<Expression, CamError> {
    let json: ExpressionJson =
        serde_json::from_str(text).map_err(|e| CamError::DeserializationError(e.to_string()))?;
    decode(&json)
}

fn decode_operands(json: &ExpressionJson, kind: &str) -> Result<Vec<Expression>, CamError> {
    match json.expressions.as_deref() {
        None | Some([]) => Err(CamError::MissingOperands(kind.to_string())),
        Some(ops) => ops.iter().map(decode).collect(),
    }
}

fn node_identifier(json: &ExpressionJson, kind: &str) -> Result<String, CamError> {
    let id = json
        .id
        .as_deref()
        .ok_or_else(|| CamError::MissingIdentifier(kind.to_string()))?;
    validate_identifier(id)?;
    Ok(id.to_string())
}

/// Reject identifiers that are empty or contain whitespace.
pub fn validate_identifier(id: &str) -> Result<(), CamError> {
    if id.is_empty() || id.chars().any(char::is_whitespace) {
        return Err(CamError::InvalidIdentifierSyntax(id.to_string()));
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
