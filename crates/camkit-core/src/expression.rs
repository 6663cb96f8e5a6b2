//! # Class Expressions
//!
//! The recursive class-expression tree used for individual types:
//! - `Atom`: a named class
//! - `Restriction`: an existential restriction (`property some filler`)
//! - `UnionOf` / `IntersectionOf`: n-ary boolean combinations
//!
//! Each node owns its children; trees never share nodes and never cycle.
//! Union and intersection are compared as sets: `normalized()` flattens,
//! sorts and deduplicates operands so that `is_equivalent` is plain equality
//! of normal forms.

use crate::CamError;
use std::collections::BTreeSet;
use std::fmt;

/// A class expression.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Expression {
    /// A named class.
    Atom(String),
    /// `property some filler`.
    Restriction {
        /// The relation identifier.
        property: String,
        /// The class the related individual must belong to.
        filler: Box<Expression>,
    },
    /// Disjunction of the operands.
    UnionOf(Vec<Expression>),
    /// Conjunction of the operands.
    IntersectionOf(Vec<Expression>),
}

impl Expression {
    /// A named class.
    #[must_use]
    pub fn atom(id: impl Into<String>) -> Self {
        Self::Atom(id.into())
    }

    /// An existential restriction.
    #[must_use]
    pub fn some(property: impl Into<String>, filler: Expression) -> Self {
        Self::Restriction {
            property: property.into(),
            filler: Box::new(filler),
        }
    }

    /// A union; a single operand collapses to itself.
    pub fn union(mut operands: Vec<Expression>) -> Result<Self, CamError> {
        match operands.len() {
            0 => Err(CamError::MissingOperands("union".to_string())),
            1 => Ok(operands.remove(0)),
            _ => Ok(Self::UnionOf(operands)),
        }
    }

    /// An intersection; a single operand collapses to itself.
    pub fn intersection(mut operands: Vec<Expression>) -> Result<Self, CamError> {
        match operands.len() {
            0 => Err(CamError::MissingOperands("intersection".to_string())),
            1 => Ok(operands.remove(0)),
            _ => Ok(Self::IntersectionOf(operands)),
        }
    }

    /// The class identifier if this is an atom.
    #[must_use]
    pub fn as_atom(&self) -> Option<&str> {
        match self {
            Self::Atom(id) => Some(id),
            _ => None,
        }
    }

    /// Check if this is a named class.
    #[must_use]
    pub fn is_atom(&self) -> bool {
        matches!(self, Self::Atom(_))
    }

    /// Height of the tree; an atom has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Atom(_) => 1,
            Self::Restriction { filler, .. } => filler.depth().saturating_add(1),
            Self::UnionOf(ops) | Self::IntersectionOf(ops) => ops
                .iter()
                .map(Expression::depth)
                .max()
                .unwrap_or(0)
                .saturating_add(1),
        }
    }

    /// Every class and property identifier mentioned in the tree.
    #[must_use]
    pub fn signature(&self) -> BTreeSet<&str> {
        let mut ids = BTreeSet::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                Self::Atom(id) => {
                    ids.insert(id.as_str());
                }
                Self::Restriction { property, filler } => {
                    ids.insert(property.as_str());
                    stack.push(filler);
                }
                Self::UnionOf(ops) | Self::IntersectionOf(ops) => stack.extend(ops.iter()),
            }
        }
        ids
    }

    /// Rebuild the tree with every identifier passed through `f`.
    ///
    /// Stops at the first error.
    pub fn map_identifiers<F, E>(&self, f: &mut F) -> Result<Expression, E>
    where
        F: FnMut(&str) -> Result<String, E>,
    {
        Ok(match self {
            Self::Atom(id) => Self::Atom(f(id.as_str())?),
            Self::Restriction { property, filler } => Self::Restriction {
                property: f(property.as_str())?,
                filler: Box::new(filler.map_identifiers(f)?),
            },
            Self::UnionOf(ops) => Self::UnionOf(
                ops.iter()
                    .map(|op| op.map_identifiers(f))
                    .collect::<Result<_, _>>()?,
            ),
            Self::IntersectionOf(ops) => Self::IntersectionOf(
                ops.iter()
                    .map(|op| op.map_identifiers(f))
                    .collect::<Result<_, _>>()?,
            ),
        })
    }

    /// Canonical form under set semantics.
    ///
    /// Nested operators of the same kind are flattened, operands are sorted
    /// and deduplicated, and single-operand results collapse.
    #[must_use]
    pub fn normalized(&self) -> Expression {
        match self {
            Self::Atom(_) => self.clone(),
            Self::Restriction { property, filler } => Self::Restriction {
                property: property.clone(),
                filler: Box::new(filler.normalized()),
            },
            Self::UnionOf(ops) => {
                Self::normalize_nary(ops, Self::UnionOf, |e| match e {
                    Self::UnionOf(inner) => Ok(inner),
                    other => Err(other),
                })
            }
            Self::IntersectionOf(ops) => {
                Self::normalize_nary(ops, Self::IntersectionOf, |e| match e {
                    Self::IntersectionOf(inner) => Ok(inner),
                    other => Err(other),
                })
            }
        }
    }

    fn normalize_nary(
        ops: &[Expression],
        wrap: fn(Vec<Expression>) -> Expression,
        same_kind: fn(Expression) -> Result<Vec<Expression>, Expression>,
    ) -> Expression {
        let mut set = BTreeSet::new();
        for op in ops {
            // normal forms of the same kind are already flat
            match same_kind(op.normalized()) {
                Ok(inner) => set.extend(inner),
                Err(other) => {
                    set.insert(other);
                }
            }
        }
        let mut flat: Vec<Expression> = set.into_iter().collect();
        if flat.len() == 1 {
            flat.remove(0)
        } else {
            wrap(flat)
        }
    }

    /// Logical equivalence under set semantics for union and intersection.
    #[must_use]
    pub fn is_equivalent(&self, other: &Expression) -> bool {
        self.normalized() == other.normalized()
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atom(id) => write!(f, "{id}"),
            Self::Restriction { property, filler } => write!(f, "({property} some {filler})"),
            Self::UnionOf(ops) | Self::IntersectionOf(ops) => {
                let joiner = if matches!(self, Self::UnionOf(_)) {
                    " or "
                } else {
                    " and "
                };
                write!(f, "(")?;
                for (i, op) in ops.iter().enumerate() {
                    if i > 0 {
                        write!(f, "{joiner}")?;
                    }
                    write!(f, "{op}")?;
                }
                write!(f, ")")
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
