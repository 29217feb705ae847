//! Optimization directives - how a requested field turns into eager fetching

use std::sync::Arc;

use super::OptimizationSchema;

/// A computed column evaluated as part of the base fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// Column alias the computed value is exposed under
    pub alias: String,
    /// SQL expression producing the value
    pub expression: String,
}

impl Annotation {
    pub fn new(alias: &str, expression: &str) -> Self {
        Self {
            alias: alias.to_string(),
            expression: expression.to_string(),
        }
    }
}

/// Target of a prefetch directive.
#[derive(Debug, Clone)]
pub enum PrefetchTarget<Q> {
    /// Bare relation name, prefetched against the default query
    Relation(String),
    /// Relation with its own nested schema and a base query to refine
    Spec(PrefetchSpec<Q>),
}

/// A to-many (or isolate-query) relation that carries its own optimization
/// schema and a declared base query.
///
/// When the selection requests nested fields beneath the relation, the
/// compiler walks `schema` against them and refines a clone of `base_query`
/// with whatever it finds.
#[derive(Debug, Clone)]
pub struct PrefetchSpec<Q> {
    /// Relation name on the owning entity
    pub relation: String,
    /// Query the prefetch runs when no refinement applies
    pub base_query: Q,
    /// Schema for the related entity's own fields
    pub schema: Arc<OptimizationSchema<Q>>,
    /// Prefetch with `base_query` even when nothing was refined, instead of
    /// falling back to the bare relation name (one-to-one relations that the
    /// executor cannot join)
    pub always_prefetch: bool,
}

impl<Q> PrefetchSpec<Q> {
    pub fn new(relation: &str, base_query: Q, schema: Arc<OptimizationSchema<Q>>) -> Self {
        Self {
            relation: relation.to_string(),
            base_query,
            schema,
            always_prefetch: false,
        }
    }

    /// Mark the relation as one that must be prefetched even unrefined
    pub fn always_prefetch(mut self) -> Self {
        self.always_prefetch = true;
        self
    }
}

/// A to-one join whose child schema contributes further directives.
///
/// The joined relation cannot carry a fetch plan of its own, so everything
/// its schema declares is expressed through the for-parent directive
/// variants, with relation paths already scoped to the joining entity.
#[derive(Debug, Clone)]
pub struct NestedSelect<Q> {
    /// Relation name to eager-join on the owning entity
    pub relation: String,
    /// Schema for the joined entity's own fields
    pub schema: Arc<OptimizationSchema<Q>>,
}

impl<Q> NestedSelect<Q> {
    pub fn new(relation: &str, schema: Arc<OptimizationSchema<Q>>) -> Self {
        Self {
            relation: relation.to_string(),
            schema,
        }
    }
}

/// What fetching a declared field costs, and how to avoid paying it per row.
#[derive(Debug, Clone)]
pub enum OptimizationDirective<Q> {
    /// Eager-join a to-one relation by name
    Select(String),
    /// Register a computed column on the base fetch
    Annotate(Annotation),
    /// Eager-load a relation through a separate batched query
    Prefetch(PrefetchTarget<Q>),
    /// Eager-join a to-one relation whose child schema hoists further
    /// directives into the current level
    SelectWithChildren(NestedSelect<Q>),
    /// Eager-join on the *enclosing* level's query, not the current one
    SelectForParent(String),
    /// Prefetch on the *enclosing* level's query, not the current one
    PrefetchForParent(PrefetchTarget<Q>),
}

impl<Q> OptimizationDirective<Q> {
    /// Short variant name, used in log output.
    pub fn kind(&self) -> &'static str {
        match self {
            OptimizationDirective::Select(_) => "select",
            OptimizationDirective::Annotate(_) => "annotate",
            OptimizationDirective::Prefetch(_) => "prefetch",
            OptimizationDirective::SelectWithChildren(_) => "select_with_children",
            OptimizationDirective::SelectForParent(_) => "select_for_parent",
            OptimizationDirective::PrefetchForParent(_) => "prefetch_for_parent",
        }
    }
}
