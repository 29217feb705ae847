//! Plan Compiler - walks a selection tree against an optimization schema
//!
//! Compilation is a single-pass recursive fold with no backtracking and no
//! failure path: fields without a schema entry are skipped and fetch lazily
//! at execution time. The only state is the plan being accumulated at each
//! level.

use crate::applier::apply_directives;
use crate::plan::{CompiledPlan, Prefetch, PrefetchPlan};
use crate::query::EagerQuery;
use crate::schema::{OptimizationDirective, OptimizationSchema, PrefetchSpec, PrefetchTarget};
use crate::selection::SelectionNode;

/// Bounds for one compilation pass.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Maximum nesting depth for prefetch compilation; schemas can reference
    /// each other cyclically through shared `Arc`s, and levels beyond the
    /// bound compile to nothing instead of recursing forever
    pub max_depth: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self { max_depth: 10 }
    }
}

/// Compile a top-level selection against an entity's optimization schema.
///
/// `children` are the entity-level field selections (the children of the
/// node returned by
/// [`find_collection_node`](crate::selection::find_collection_node)).
/// Parent-scoped directives have no meaning at this level and are skipped
/// with a warning; the returned plan's parent channels carry only what
/// nested compilations hoisted, and
/// [`apply_to_query`](crate::applier::apply_to_query) folds them into the
/// base query.
pub fn compile<Q: EagerQuery>(
    children: &[SelectionNode],
    schema: &OptimizationSchema<Q>,
) -> CompiledPlan<Q> {
    compile_with(children, schema, &CompileOptions::default())
}

/// [`compile`] with explicit options.
pub fn compile_with<Q: EagerQuery>(
    children: &[SelectionNode],
    schema: &OptimizationSchema<Q>,
    options: &CompileOptions,
) -> CompiledPlan<Q> {
    compile_level(children, schema, true, 0, options)
}

/// Compile the selection beneath a prefetched relation.
///
/// Returns the directives hoisted to the caller's level and, when any local
/// directive matched, a refined prefetch built from a clone of `base_query`;
/// `refined` is `None` when nothing matched and the caller decides the
/// fallback.
pub fn compile_prefetch<Q: EagerQuery>(
    relation: &str,
    children: &[SelectionNode],
    schema: &OptimizationSchema<Q>,
    base_query: &Q,
) -> PrefetchPlan<Q> {
    compile_prefetch_with(relation, children, schema, base_query, &CompileOptions::default())
}

/// [`compile_prefetch`] with explicit options.
pub fn compile_prefetch_with<Q: EagerQuery>(
    relation: &str,
    children: &[SelectionNode],
    schema: &OptimizationSchema<Q>,
    base_query: &Q,
    options: &CompileOptions,
) -> PrefetchPlan<Q> {
    prefetch_level(relation, children, schema, base_query, 1, options)
}

/// Walk one selection level, dispatching each requested field on its
/// declared directive.
fn compile_level<Q: EagerQuery>(
    children: &[SelectionNode],
    schema: &OptimizationSchema<Q>,
    top_level: bool,
    depth: usize,
    options: &CompileOptions,
) -> CompiledPlan<Q> {
    let mut plan = CompiledPlan::new();

    for child in children {
        let Some(directive) = schema.directive(&child.name) else {
            tracing::debug!(
                "Field '{}' has no optimization entry in schema for '{}', skipping",
                child.name,
                schema.entity()
            );
            continue;
        };

        match directive {
            OptimizationDirective::Select(relation) => {
                plan.add_select(relation);
            }
            OptimizationDirective::Annotate(annotation) => {
                plan.add_annotation(annotation.clone());
            }
            OptimizationDirective::Prefetch(PrefetchTarget::Relation(relation)) => {
                plan.add_prefetch(Prefetch::Relation(relation.clone()));
            }
            OptimizationDirective::Prefetch(PrefetchTarget::Spec(spec)) => {
                if child.children.is_empty() {
                    plan.add_prefetch(unrefined_prefetch(spec));
                } else {
                    let nested = prefetch_level(
                        &spec.relation,
                        &child.children,
                        &spec.schema,
                        &spec.base_query,
                        depth + 1,
                        options,
                    );
                    // A nested level's hoists are this level's work; the top
                    // level keeps them in the parent channels instead, where
                    // the applier folds them into the base query.
                    if top_level {
                        for relation in nested.parent_selects {
                            plan.add_parent_select(&relation);
                        }
                        for prefetch in nested.parent_prefetches.into_values() {
                            plan.add_parent_prefetch(prefetch);
                        }
                    } else {
                        for relation in nested.parent_selects {
                            plan.add_select(&relation);
                        }
                        for prefetch in nested.parent_prefetches.into_values() {
                            plan.add_prefetch(prefetch);
                        }
                    }
                    let prefetch = nested.refined.unwrap_or_else(|| Prefetch::Query {
                        relation: spec.relation.clone(),
                        query: spec.base_query.clone(),
                    });
                    plan.add_prefetch(prefetch);
                }
            }
            OptimizationDirective::SelectWithChildren(nested_select) if !top_level => {
                if !child.children.is_empty() {
                    let hoisted =
                        hoisted_level(&child.children, &nested_select.schema, depth + 1, options);
                    for relation in hoisted.parent_selects {
                        plan.add_select(&relation);
                    }
                    for prefetch in hoisted.parent_prefetches.into_values() {
                        plan.add_prefetch(prefetch);
                    }
                }
                // The to-one join itself happens regardless of nesting.
                plan.add_select(&nested_select.relation);
            }
            OptimizationDirective::SelectForParent(relation) if !top_level => {
                plan.add_parent_select(relation);
            }
            OptimizationDirective::PrefetchForParent(target) if !top_level => match target {
                PrefetchTarget::Relation(relation) => {
                    plan.add_parent_prefetch(Prefetch::Relation(relation.clone()));
                }
                PrefetchTarget::Spec(spec) => {
                    let prefetch = if child.children.is_empty() {
                        unrefined_prefetch(spec)
                    } else {
                        let nested = prefetch_level(
                            &spec.relation,
                            &child.children,
                            &spec.schema,
                            &spec.base_query,
                            depth + 1,
                            options,
                        );
                        if nested.has_hoisted() {
                            tracing::debug!(
                                "Hoists inside parent-bound prefetch '{}' have no consumer, dropping",
                                spec.relation
                            );
                        }
                        nested.refined.unwrap_or_else(|| unrefined_prefetch(spec))
                    };
                    plan.add_parent_prefetch(prefetch);
                }
            },
            other => {
                tracing::warn!(
                    "Directive '{}' for field '{}' needs an enclosing plan, skipped at the top level",
                    other.kind(),
                    child.name
                );
            }
        }
    }

    plan
}

/// Compile one prefetched relation's selection and refine its base query.
fn prefetch_level<Q: EagerQuery>(
    relation: &str,
    children: &[SelectionNode],
    schema: &OptimizationSchema<Q>,
    base_query: &Q,
    depth: usize,
    options: &CompileOptions,
) -> PrefetchPlan<Q> {
    if depth > options.max_depth {
        tracing::warn!(
            "Nested compilation for '{}' exceeded max depth {}, leaving the prefetch unrefined",
            relation,
            options.max_depth
        );
        return PrefetchPlan::unrefined();
    }

    let level = compile_level(children, schema, false, depth, options);

    let refined = if level.has_local_directives() {
        let mut query = base_query.clone();
        apply_directives(&level, &mut query);
        Some(Prefetch::Query {
            relation: relation.to_string(),
            query,
        })
    } else {
        None
    };

    tracing::debug!(
        "Compiled prefetch level for '{}': {} joins, {} annotations, {} prefetches, {} hoisted, refined: {}",
        relation,
        level.selects.len(),
        level.annotations.len(),
        level.prefetches.len(),
        level.parent_selects.len() + level.parent_prefetches.len(),
        refined.is_some()
    );

    PrefetchPlan {
        parent_selects: level.parent_selects,
        parent_prefetches: level.parent_prefetches,
        refined,
    }
}

/// Walk a joined to-one relation's child schema for directives to hoist.
///
/// There is no query to refine here, so only the for-parent channels of the
/// walk are meaningful; anything else the child schema declared is dropped.
fn hoisted_level<Q: EagerQuery>(
    children: &[SelectionNode],
    schema: &OptimizationSchema<Q>,
    depth: usize,
    options: &CompileOptions,
) -> CompiledPlan<Q> {
    if depth > options.max_depth {
        tracing::warn!(
            "Join child schema for '{}' exceeded max depth {}, skipping",
            schema.entity(),
            options.max_depth
        );
        return CompiledPlan::new();
    }

    let level = compile_level(children, schema, false, depth, options);
    if level.has_local_directives() {
        tracing::debug!(
            "Join child schema for '{}' produced directives with no query to refine, dropping them",
            schema.entity()
        );
    }
    level
}

/// Prefetch to run when no refinement applies.
fn unrefined_prefetch<Q: EagerQuery>(spec: &PrefetchSpec<Q>) -> Prefetch<Q> {
    if spec.always_prefetch {
        Prefetch::Query {
            relation: spec.relation.clone(),
            query: spec.base_query.clone(),
        }
    } else {
        Prefetch::Relation(spec.relation.clone())
    }
}
