//! Compiled fetch plans
//!
//! A [`CompiledPlan`] holds one level's eager-load directives in ordered
//! sets keyed by directive identity: joined relations and hoisted joins by
//! relation name, annotations by alias, prefetches by relation name. The
//! key choice makes the no-duplicates guarantee structural and keeps
//! iteration order deterministic.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use crate::schema::Annotation;

/// One planned prefetch, bare or carrying a refined sub-query.
#[derive(Debug, Clone, PartialEq)]
pub enum Prefetch<Q> {
    /// Prefetch the relation against its default query
    Relation(String),
    /// Prefetch the relation through the given sub-query
    Query { relation: String, query: Q },
}

impl<Q> Prefetch<Q> {
    /// Relation name this prefetch targets
    pub fn relation(&self) -> &str {
        match self {
            Prefetch::Relation(relation) => relation,
            Prefetch::Query { relation, .. } => relation,
        }
    }

    /// The refined sub-query, if this prefetch carries one
    pub fn query(&self) -> Option<&Q> {
        match self {
            Prefetch::Relation(_) => None,
            Prefetch::Query { query, .. } => Some(query),
        }
    }

    /// Whether this prefetch carries a sub-query
    pub fn is_refined(&self) -> bool {
        matches!(self, Prefetch::Query { .. })
    }
}

/// Eager-load directives compiled from one selection-tree level.
///
/// `selects`, `annotations` and `prefetches` apply to this level's own
/// query. `parent_selects` and `parent_prefetches` are hoisted directives
/// the *caller* must fold into its query; the top compilation level only
/// ever receives them from nested levels, never produces its own.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPlan<Q> {
    /// To-one relations to eager-join
    pub selects: BTreeSet<String>,
    /// Computed columns, keyed by alias
    pub annotations: BTreeMap<String, Annotation>,
    /// Batched prefetches, keyed by relation name
    pub prefetches: BTreeMap<String, Prefetch<Q>>,
    /// Joins hoisted to the enclosing level
    pub parent_selects: BTreeSet<String>,
    /// Prefetches hoisted to the enclosing level, keyed by relation name
    pub parent_prefetches: BTreeMap<String, Prefetch<Q>>,
}

impl<Q> Default for CompiledPlan<Q> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Q> CompiledPlan<Q> {
    /// Create an empty plan
    pub fn new() -> Self {
        Self {
            selects: BTreeSet::new(),
            annotations: BTreeMap::new(),
            prefetches: BTreeMap::new(),
            parent_selects: BTreeSet::new(),
            parent_prefetches: BTreeMap::new(),
        }
    }

    /// Plan an eager join
    pub fn add_select(&mut self, relation: &str) {
        self.selects.insert(relation.to_string());
    }

    /// Plan a computed column; a second annotation for the same alias keeps
    /// the first
    pub fn add_annotation(&mut self, annotation: Annotation) {
        match self.annotations.entry(annotation.alias.clone()) {
            Entry::Vacant(entry) => {
                entry.insert(annotation);
            }
            Entry::Occupied(_) => {
                tracing::debug!(
                    "Annotation '{}' already planned, keeping the first",
                    annotation.alias
                );
            }
        }
    }

    /// Plan a prefetch; a second prefetch for the same relation keeps the
    /// first
    pub fn add_prefetch(&mut self, prefetch: Prefetch<Q>) {
        match self.prefetches.entry(prefetch.relation().to_string()) {
            Entry::Vacant(entry) => {
                entry.insert(prefetch);
            }
            Entry::Occupied(_) => {
                tracing::debug!(
                    "Prefetch for '{}' already planned, keeping the first",
                    prefetch.relation()
                );
            }
        }
    }

    /// Hoist an eager join to the enclosing level
    pub fn add_parent_select(&mut self, relation: &str) {
        self.parent_selects.insert(relation.to_string());
    }

    /// Hoist a prefetch to the enclosing level; collisions keep the first
    pub fn add_parent_prefetch(&mut self, prefetch: Prefetch<Q>) {
        match self.parent_prefetches.entry(prefetch.relation().to_string()) {
            Entry::Vacant(entry) => {
                entry.insert(prefetch);
            }
            Entry::Occupied(_) => {
                tracing::debug!(
                    "Parent prefetch for '{}' already planned, keeping the first",
                    prefetch.relation()
                );
            }
        }
    }

    /// Whether this level's own query would change at all
    pub fn has_local_directives(&self) -> bool {
        !self.selects.is_empty() || !self.annotations.is_empty() || !self.prefetches.is_empty()
    }

    /// Whether the plan carries no directives at all
    pub fn is_empty(&self) -> bool {
        !self.has_local_directives()
            && self.parent_selects.is_empty()
            && self.parent_prefetches.is_empty()
    }

    /// Total number of planned directives across all channels
    pub fn directive_count(&self) -> usize {
        self.selects.len()
            + self.annotations.len()
            + self.prefetches.len()
            + self.parent_selects.len()
            + self.parent_prefetches.len()
    }
}

/// Result of compiling one nested prefetch level.
///
/// The hoisted channels belong to the caller's plan; `refined` is the
/// prefetch to run for the relation itself, or `None` when no declared
/// optimization matched and the caller should fall back to an unrefined
/// prefetch.
#[derive(Debug, Clone, PartialEq)]
pub struct PrefetchPlan<Q> {
    /// Joins the caller must apply to its own query
    pub parent_selects: BTreeSet<String>,
    /// Prefetches the caller must apply to its own query
    pub parent_prefetches: BTreeMap<String, Prefetch<Q>>,
    /// Refined prefetch for the relation, if anything matched
    pub refined: Option<Prefetch<Q>>,
}

impl<Q> Default for PrefetchPlan<Q> {
    fn default() -> Self {
        Self::unrefined()
    }
}

impl<Q> PrefetchPlan<Q> {
    /// Plan with no refinement and nothing hoisted
    pub fn unrefined() -> Self {
        Self {
            parent_selects: BTreeSet::new(),
            parent_prefetches: BTreeMap::new(),
            refined: None,
        }
    }

    /// Whether any directives were hoisted to the caller
    pub fn has_hoisted(&self) -> bool {
        !self.parent_selects.is_empty() || !self.parent_prefetches.is_empty()
    }
}
