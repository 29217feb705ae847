//! Plan Applier - folds a compiled plan into a query handle
//!
//! Application is infallible and order-fixed: annotations first, then eager
//! joins, then prefetches. Refinement inside the compiler uses the same
//! order, so a nested sub-query and a base query are shaped the same way.

use crate::plan::CompiledPlan;
use crate::query::EagerQuery;

/// Apply a plan's own directive sets to a query, ignoring the parent
/// channels.
///
/// This is the refinement step for nested sub-queries: the plan's parent
/// channels belong to the enclosing level and must not leak into the query
/// being refined.
pub fn apply_directives<Q: EagerQuery>(plan: &CompiledPlan<Q>, query: &mut Q) {
    for annotation in plan.annotations.values() {
        query.annotate(annotation);
    }
    for relation in &plan.selects {
        query.select_related(relation);
    }
    for prefetch in plan.prefetches.values() {
        query.prefetch_related(prefetch.clone());
    }
}

/// Apply a top-level plan to the base query, parent channels included.
///
/// The base query is the parent of every depth-one relation, so directives
/// hoisted out of nested compilations land here, after the plan's own in
/// each phase.
pub fn apply_to_query<Q: EagerQuery>(plan: &CompiledPlan<Q>, query: &mut Q) {
    for annotation in plan.annotations.values() {
        query.annotate(annotation);
    }
    for relation in plan.selects.iter().chain(&plan.parent_selects) {
        query.select_related(relation);
    }
    for prefetch in plan.prefetches.values().chain(plan.parent_prefetches.values()) {
        query.prefetch_related(prefetch.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::plan::Prefetch;
    use crate::query::QueryBuilder;
    use crate::schema::Annotation;

    fn sample_plan() -> CompiledPlan<QueryBuilder> {
        let mut plan = CompiledPlan::new();
        plan.add_annotation(Annotation::new("total_cents", "quantity * unit_price_cents"));
        plan.add_select("user");
        plan.add_select("resource");
        plan.add_prefetch(Prefetch::Relation("tags".to_string()));
        plan.add_parent_select("venue");
        plan.add_parent_prefetch(Prefetch::Query {
            relation: "catering_menu".to_string(),
            query: QueryBuilder::new().from("catering_menus"),
        });
        plan
    }

    #[test]
    fn test_apply_directives_skips_parent_channels() {
        let plan = sample_plan();
        let mut query = QueryBuilder::new().from("reservations");

        apply_directives(&plan, &mut query);

        assert_eq!(query.joined_relations(), ["resource", "user"]);
        assert_eq!(query.annotations().len(), 1);
        assert_eq!(query.prefetches().len(), 1);
        assert_eq!(query.prefetches()[0].relation(), "tags");
    }

    #[test]
    fn test_apply_to_query_folds_in_parent_channels() {
        let plan = sample_plan();
        let mut query = QueryBuilder::new().from("reservations");

        apply_to_query(&plan, &mut query);

        assert_eq!(query.joined_relations(), ["resource", "user", "venue"]);
        let relations: Vec<&str> = query.prefetches().iter().map(|p| p.relation()).collect();
        assert_eq!(relations, ["tags", "catering_menu"]);
    }

    #[test]
    fn test_reapplying_a_plan_is_idempotent() {
        let plan = sample_plan();
        let mut query = QueryBuilder::new().from("reservations");

        apply_to_query(&plan, &mut query);
        let once = query.clone();
        apply_to_query(&plan, &mut query);

        assert_eq!(query, once);
    }
}
