//! # Activity Model
//!
//! In-memory container for one activity model: its individuals, the facts
//! between them, and model-level annotations.
//!
//! The model owns every individual and fact. Facts refer to individuals by
//! identifier only. Individuals and facts keep their insertion order, and
//! lookups go through `BTreeMap` indexes for deterministic behaviour.

use crate::expression::Expression;
use crate::projection::{Projection, project};
use crate::{Annotation, CamError};
use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// INDIVIDUAL
// =============================================================================

/// An individual (entity) of an activity model.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Individual {
    /// The individual identifier.
    pub id: String,
    /// Asserted types.
    pub types: Vec<Expression>,
    /// Types inferred by the reasoner collaborator.
    pub inferred_types: Vec<Expression>,
    /// Upper-level ("root") types used for display grouping.
    pub root_types: Vec<Expression>,
    /// Annotations on the individual.
    pub annotations: Vec<Annotation>,
}

impl Individual {
    /// Create an individual with no types or annotations.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Add an asserted type.
    #[must_use]
    pub fn with_type(mut self, expr: Expression) -> Self {
        self.types.push(expr);
        self
    }

    /// Add an inferred type.
    #[must_use]
    pub fn with_inferred_type(mut self, expr: Expression) -> Self {
        self.inferred_types.push(expr);
        self
    }

    /// Add a root type.
    #[must_use]
    pub fn with_root_type(mut self, expr: Expression) -> Self {
        self.root_types.push(expr);
        self
    }

    /// Add an annotation.
    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Append types and annotations of `other` that are not already present.
    fn absorb(&mut self, other: Individual) {
        merge_unique(&mut self.types, other.types);
        merge_unique(&mut self.inferred_types, other.inferred_types);
        merge_unique(&mut self.root_types, other.root_types);
        merge_unique(&mut self.annotations, other.annotations);
    }
}

// =============================================================================
// FACT
// =============================================================================

/// A directed, annotated relation between two individuals.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Fact {
    /// Subject individual identifier.
    pub subject: String,
    /// Relation identifier.
    pub property: String,
    /// Object individual identifier.
    pub object: String,
    /// Annotations on the fact (evidence, contributor, ...).
    pub annotations: Vec<Annotation>,
}

impl Fact {
    /// Create an unannotated fact.
    #[must_use]
    pub fn new(
        subject: impl Into<String>,
        property: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            property: property.into(),
            object: object.into(),
            annotations: Vec::new(),
        }
    }

    /// Add an annotation.
    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// The (subject, property, object) triple identifying this fact.
    #[must_use]
    pub fn key(&self) -> (&str, &str, &str) {
        (&self.subject, &self.property, &self.object)
    }

    /// Check if the fact has `id` as subject or object.
    #[must_use]
    pub fn touches(&self, id: &str) -> bool {
        self.subject == id || self.object == id
    }
}

type FactKey = (String, String, String);

fn fact_key(fact: &Fact) -> FactKey {
    (
        fact.subject.clone(),
        fact.property.clone(),
        fact.object.clone(),
    )
}

fn merge_unique<T: PartialEq>(into: &mut Vec<T>, from: Vec<T>) {
    for item in from {
        if !into.contains(&item) {
            into.push(item);
        }
    }
}

// =============================================================================
// ACTIVITY MODEL
// =============================================================================

/// A complete activity model.
#[derive(Debug, Clone, Default)]
pub struct ActivityModel {
    id: String,
    annotations: Vec<Annotation>,
    individuals: Vec<Individual>,
    /// Individual id -> position in `individuals`
    individual_index: BTreeMap<String, usize>,
    facts: Vec<Fact>,
    /// (subject, property, object) -> position in `facts`
    fact_index: BTreeMap<FactKey, usize>,
}

impl ActivityModel {
    /// Create an empty model.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// The model identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Model-level annotations.
    #[must_use]
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Add a model-level annotation.
    pub fn add_annotation(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }

    /// All individuals in insertion order.
    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// All facts in insertion order.
    #[must_use]
    pub fn facts(&self) -> &[Fact] {
        &self.facts
    }

    /// Lookup an individual by identifier.
    #[must_use]
    pub fn individual(&self, id: &str) -> Option<&Individual> {
        self.individual_index
            .get(id)
            .and_then(|&pos| self.individuals.get(pos))
    }

    /// Check if the model contains an individual.
    #[must_use]
    pub fn contains_individual(&self, id: &str) -> bool {
        self.individual_index.contains_key(id)
    }

    /// Insert an individual.
    ///
    /// If an individual with the same id exists, the new types and
    /// annotations are merged into it. Returns `true` if the individual was
    /// new.
    pub fn insert_individual(&mut self, individual: Individual) -> bool {
        if let Some(&pos) = self.individual_index.get(&individual.id) {
            if let Some(existing) = self.individuals.get_mut(pos) {
                existing.absorb(individual);
            }
            return false;
        }
        self.individual_index
            .insert(individual.id.clone(), self.individuals.len());
        self.individuals.push(individual);
        true
    }

    /// Add a fact between two individuals of this model.
    ///
    /// Re-adding an existing triple appends the new annotations to the stored
    /// fact instead of duplicating it. Returns `true` if the fact was new.
    pub fn add_fact(&mut self, fact: Fact) -> Result<bool, CamError> {
        for endpoint in [&fact.subject, &fact.object] {
            if !self.contains_individual(endpoint) {
                return Err(CamError::UnknownIndividual(endpoint.clone()));
            }
        }

        let key = fact_key(&fact);
        if let Some(&pos) = self.fact_index.get(&key) {
            if let Some(existing) = self.facts.get_mut(pos) {
                merge_unique(&mut existing.annotations, fact.annotations);
            }
            return Ok(false);
        }
        self.fact_index.insert(key, self.facts.len());
        self.facts.push(fact);
        Ok(true)
    }

    /// Facts that have `id` as subject or object, in insertion order.
    pub fn facts_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Fact> + 'a {
        self.facts.iter().filter(move |fact| fact.touches(id))
    }

    /// Remove an individual together with every fact that touches it.
    ///
    /// Returns the removed individual, if it existed.
    pub fn remove_individual(&mut self, id: &str) -> Option<Individual> {
        let pos = self.individual_index.remove(id)?;
        let removed = self.individuals.remove(pos);
        self.facts.retain(|fact| !fact.touches(id));
        self.reindex();
        Some(removed)
    }

    /// The sub-model induced by `selected`. See [`project`].
    #[must_use]
    pub fn project<S>(&self, selected: &BTreeSet<S>) -> Projection
    where
        S: Borrow<str> + Ord,
    {
        project(&self.individuals, &self.facts, selected)
    }

    fn reindex(&mut self) {
        self.individual_index = self
            .individuals
            .iter()
            .enumerate()
            .map(|(pos, ind)| (ind.id.clone(), pos))
            .collect();
        self.fact_index = self
            .facts
            .iter()
            .enumerate()
            .map(|(pos, fact)| (fact_key(fact), pos))
            .collect();
    }
}

// =============================================================================
// TESTS
// =============================================================================
