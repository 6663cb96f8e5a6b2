//! # Primitives
//!
//! Fixed constants for camkit-core.
//!
//! These are compiled into the binary and are immutable at runtime. They
//! define the stable parts of the wire contract and the identifier rules.

/// Separator between prefix and suffix in a compact identifier.
pub const PREFIX_SEPARATOR: char = ':';

/// Schemes accepted verbatim by `to_full` when no prefix mapping exists.
///
/// Each entry includes the trailing separator so that `httpx:` or
/// `urnish:` are not mistaken for allowed schemes.
pub const ALLOWED_SCHEMES: [&str; 4] = ["http:", "https:", "urn:", "mailto:"];

// =============================================================================
// EXPRESSION WIRE TAGS
// =============================================================================

/// `type` tag of an atomic class node.
pub const TAG_CLASS: &str = "class";

/// `type` tag of an existential restriction node.
pub const TAG_SOME_VALUES_FROM: &str = "svf";

/// `type` tag of the property node inside a restriction.
pub const TAG_PROPERTY: &str = "property";

/// `type` tag of a union node.
pub const TAG_UNION: &str = "union";

/// `type` tag of an intersection node.
pub const TAG_INTERSECTION: &str = "intersection";

// =============================================================================
// EVIDENCE CODE MAPPING
// =============================================================================

/// Reference column value marking the default mapping of a term.
pub const DEFAULT_REFERENCE: &str = "Default";

/// Comment marker in evidence code mapping files.
pub const MAPPING_COMMENT: char = '#';

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowed_schemes_carry_separator() {
        assert!(
            ALLOWED_SCHEMES
                .iter()
                .all(|scheme| scheme.ends_with(PREFIX_SEPARATOR))
        );
    }
}
