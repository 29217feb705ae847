//! High-level entry point wiring extraction, compilation and application
//!
//! `FetchOptimizer` is what request handlers hold: one per entity, built
//! from an explicitly passed schema or looked up in a `SchemaCatalog`. The
//! whole pass is infallible; when the selection does not cover the entity
//! the query comes back untouched and fetching proceeds unoptimized.

use std::sync::Arc;

use crate::applier::apply_to_query;
use crate::compiler::{compile_with, CompileOptions};
use crate::plan::CompiledPlan;
use crate::query::EagerQuery;
use crate::schema::{OptimizationSchema, SchemaCatalog};
use crate::selection::{find_collection_node, SelectionNode};

/// Compiles selections against one entity's schema and applies the result.
#[derive(Debug, Clone)]
pub struct FetchOptimizer<Q: EagerQuery> {
    schema: Arc<OptimizationSchema<Q>>,
    options: CompileOptions,
}

impl<Q: EagerQuery> FetchOptimizer<Q> {
    /// Create an optimizer for one entity's schema
    pub fn new(schema: Arc<OptimizationSchema<Q>>) -> Self {
        Self {
            schema,
            options: CompileOptions::default(),
        }
    }

    /// Create an optimizer with explicit compile options
    pub fn with_options(schema: Arc<OptimizationSchema<Q>>, options: CompileOptions) -> Self {
        Self { schema, options }
    }

    /// Look an entity up in a catalog and build an optimizer for it
    pub fn for_entity(catalog: &SchemaCatalog<Q>, entity: &str) -> Option<Self> {
        catalog.get(entity).map(Self::new)
    }

    /// The schema this optimizer compiles against
    pub fn schema(&self) -> &OptimizationSchema<Q> {
        &self.schema
    }

    /// The compile options in effect
    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Compile entity-level selections into a plan without applying it
    pub fn compile(&self, children: &[SelectionNode]) -> CompiledPlan<Q> {
        compile_with(children, &self.schema, &self.options)
    }

    /// Optimize a base query for a requested selection.
    ///
    /// Locates `field_name` in the selection, unwraps its edges/node
    /// connection wrappers, compiles the node's children and folds the plan
    /// into `query`. Returns the query unchanged when the selection does not
    /// request the collection or nothing in it matched the schema.
    pub fn optimize(&self, requested: &SelectionNode, field_name: &str, mut query: Q) -> Q {
        let Some(collection) = find_collection_node(requested, field_name) else {
            tracing::debug!(
                "Selection has no '{}' collection under edges/node, leaving query unoptimized",
                field_name
            );
            return query;
        };

        let plan = self.compile(&collection.children);
        if plan.is_empty() {
            tracing::debug!(
                "Nothing to optimize for '{}' on '{}'",
                field_name,
                self.schema.entity()
            );
            return query;
        }

        apply_to_query(&plan, &mut query);
        tracing::debug!(
            "Optimized '{}' fetch for '{}' with {} directives",
            field_name,
            self.schema.entity(),
            plan.directive_count()
        );
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::query::QueryBuilder;

    fn connection(name: &str, fields: Vec<SelectionNode>) -> SelectionNode {
        SelectionNode::with_children(
            name,
            vec![SelectionNode::with_children(
                "edges",
                vec![SelectionNode::with_children("node", fields)],
            )],
        )
    }

    fn reservation_schema() -> Arc<OptimizationSchema<QueryBuilder>> {
        Arc::new(
            OptimizationSchema::builder("Reservation")
                .select("user", "user")
                .prefetch("tags", "tags")
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_optimize_applies_compiled_plan() {
        let optimizer = FetchOptimizer::new(reservation_schema());
        let requested = SelectionNode::with_children(
            "query",
            vec![connection(
                "reservations",
                vec![SelectionNode::new("user"), SelectionNode::new("tags")],
            )],
        );

        let query = optimizer.optimize(
            &requested,
            "reservations",
            QueryBuilder::new().from("reservations"),
        );

        assert_eq!(query.joined_relations(), ["user"]);
        assert_eq!(query.prefetches().len(), 1);
        assert_eq!(query.prefetches()[0].relation(), "tags");
    }

    #[test]
    fn test_missing_collection_leaves_query_unchanged() {
        let optimizer = FetchOptimizer::new(reservation_schema());
        let requested = SelectionNode::with_children(
            "query",
            vec![connection("resources", vec![SelectionNode::new("name")])],
        );
        let base = QueryBuilder::new().from("reservations");

        let query = optimizer.optimize(&requested, "reservations", base.clone());
        assert_eq!(query, base);
    }

    #[test]
    fn test_unmatched_fields_leave_query_unchanged() {
        let optimizer = FetchOptimizer::new(reservation_schema());
        let requested = SelectionNode::with_children(
            "query",
            vec![connection(
                "reservations",
                vec![SelectionNode::new("id"), SelectionNode::new("code")],
            )],
        );
        let base = QueryBuilder::new().from("reservations");

        let query = optimizer.optimize(&requested, "reservations", base.clone());
        assert_eq!(query, base);
    }

    #[test]
    fn test_for_entity_resolves_through_catalog() {
        let catalog = SchemaCatalog::new();
        catalog.register(reservation_schema()).unwrap();

        let optimizer = FetchOptimizer::for_entity(&catalog, "Reservation").unwrap();
        assert_eq!(optimizer.schema().entity(), "Reservation");

        assert!(FetchOptimizer::<QueryBuilder>::for_entity(&catalog, "Resource").is_none());
    }
}
