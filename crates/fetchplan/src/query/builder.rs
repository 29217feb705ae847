//! Fluent query builder carrying eager-load state

use serde_json::Value;

use crate::plan::Prefetch;
use crate::query::traits::EagerQuery;
use crate::query::types::{OrderDirection, QueryOperator, WhereCondition};
use crate::schema::Annotation;

/// Declarative query handle for a single table.
///
/// Holds filters, ordering and the eager-load state a compiled plan writes
/// into it. Building is pure; [`to_sql`](QueryBuilder::to_sql) renders the
/// primary statement and the executor realizes joins and prefetches.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryBuilder {
    pub(crate) from_table: String,
    pub(crate) select_columns: Vec<String>,
    pub(crate) where_conditions: Vec<WhereCondition>,
    pub(crate) order_by: Vec<(String, OrderDirection)>,
    pub(crate) limit_count: Option<i64>,
    pub(crate) annotations: Vec<Annotation>,
    pub(crate) joined_relations: Vec<String>,
    pub(crate) prefetches: Vec<Prefetch<QueryBuilder>>,
}

impl QueryBuilder {
    /// Create a new empty query builder
    pub fn new() -> Self {
        Self {
            from_table: String::new(),
            select_columns: Vec::new(),
            where_conditions: Vec::new(),
            order_by: Vec::new(),
            limit_count: None,
            annotations: Vec::new(),
            joined_relations: Vec::new(),
            prefetches: Vec::new(),
        }
    }

    /// Set the table to query from
    pub fn from(mut self, table: &str) -> Self {
        self.from_table = table.to_string();
        self
    }

    /// Add columns to select (comma-separated or single column)
    pub fn select(mut self, columns: &str) -> Self {
        for column in columns.split(',') {
            let column = column.trim();
            if !column.is_empty() {
                self.select_columns.push(column.to_string());
            }
        }
        self
    }

    /// Add an equality condition
    pub fn where_eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.where_conditions
            .push(WhereCondition::new(column, QueryOperator::Equal, value.into()));
        self
    }

    /// Add a not-equal condition
    pub fn where_ne(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.where_conditions
            .push(WhereCondition::new(column, QueryOperator::NotEqual, value.into()));
        self
    }

    /// Add a greater-than condition
    pub fn where_gt(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.where_conditions.push(WhereCondition::new(
            column,
            QueryOperator::GreaterThan,
            value.into(),
        ));
        self
    }

    /// Add a less-than condition
    pub fn where_lt(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.where_conditions.push(WhereCondition::new(
            column,
            QueryOperator::LessThan,
            value.into(),
        ));
        self
    }

    /// Add an IN condition over a list of values
    pub fn where_in(mut self, column: &str, values: Vec<Value>) -> Self {
        self.where_conditions
            .push(WhereCondition::new_in(column, values));
        self
    }

    /// Add an IS NULL condition
    pub fn where_null(mut self, column: &str) -> Self {
        self.where_conditions
            .push(WhereCondition::new_unary(column, QueryOperator::IsNull));
        self
    }

    /// Add an IS NOT NULL condition
    pub fn where_not_null(mut self, column: &str) -> Self {
        self.where_conditions
            .push(WhereCondition::new_unary(column, QueryOperator::IsNotNull));
        self
    }

    /// Order ascending by a column
    pub fn order_by(mut self, column: &str) -> Self {
        self.order_by.push((column.to_string(), OrderDirection::Asc));
        self
    }

    /// Order descending by a column
    pub fn order_by_desc(mut self, column: &str) -> Self {
        self.order_by.push((column.to_string(), OrderDirection::Desc));
        self
    }

    /// Limit the number of rows returned
    pub fn limit(mut self, count: i64) -> Self {
        self.limit_count = Some(count);
        self
    }

    /// The table this query fetches from
    pub fn table(&self) -> &str {
        &self.from_table
    }

    /// Relations registered for eager joining
    pub fn joined_relations(&self) -> &[String] {
        &self.joined_relations
    }

    /// Relations registered for batched prefetching
    pub fn prefetches(&self) -> &[Prefetch<QueryBuilder>] {
        &self.prefetches
    }

    /// Computed columns registered on this query
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EagerQuery for QueryBuilder {
    fn annotate(&mut self, annotation: &Annotation) {
        if self.annotations.iter().any(|a| a.alias == annotation.alias) {
            return;
        }
        self.annotations.push(annotation.clone());
    }

    fn select_related(&mut self, relation: &str) {
        if self.joined_relations.iter().any(|r| r == relation) {
            return;
        }
        self.joined_relations.push(relation.to_string());
    }

    fn prefetch_related(&mut self, prefetch: Prefetch<Self>) {
        if self
            .prefetches
            .iter()
            .any(|p| p.relation() == prefetch.relation())
        {
            tracing::debug!(
                "Relation '{}' already prefetched on this query, keeping the first",
                prefetch.relation()
            );
            return;
        }
        self.prefetches.push(prefetch);
    }
}
