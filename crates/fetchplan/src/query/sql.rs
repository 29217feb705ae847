//! SQL generation for the query builder

use serde_json::Value;

use crate::query::builder::QueryBuilder;
use crate::query::types::QueryOperator;

impl QueryBuilder {
    /// Generate SQL with positional placeholders and return the parameters.
    ///
    /// Only the primary statement is rendered; joined relations and
    /// prefetches are carried as state for the executor to realize.
    pub fn to_sql_with_params(&self) -> (String, Vec<String>) {
        let mut params = Vec::new();
        let mut sql = format!("SELECT {} FROM {}", self.select_list(), self.from_table);

        if let Some(where_clause) = self.build_where_clause(&mut params) {
            sql.push_str(" WHERE ");
            sql.push_str(&where_clause);
        }

        self.append_order_and_limit(&mut sql);
        (sql, params)
    }

    /// Generate SQL with values inlined, for logging and debugging
    pub fn to_sql(&self) -> String {
        let mut sql = format!("SELECT {} FROM {}", self.select_list(), self.from_table);

        if let Some(where_clause) = self.build_where_clause_inline() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_clause);
        }

        self.append_order_and_limit(&mut sql);
        sql
    }

    fn select_list(&self) -> String {
        let mut parts: Vec<String> = if self.select_columns.is_empty() {
            vec!["*".to_string()]
        } else {
            self.select_columns.clone()
        };
        for annotation in &self.annotations {
            parts.push(format!("{} AS {}", annotation.expression, annotation.alias));
        }
        parts.join(", ")
    }

    fn build_where_clause(&self, params: &mut Vec<String>) -> Option<String> {
        if self.where_conditions.is_empty() {
            return None;
        }

        let mut clause = String::new();
        let mut param_counter = 1;
        for (i, condition) in self.where_conditions.iter().enumerate() {
            if i > 0 {
                clause.push_str(" AND ");
            }
            clause.push_str(&condition.column);
            clause.push(' ');
            match condition.operator {
                QueryOperator::In => {
                    clause.push_str("IN (");
                    for (j, value) in condition.values.iter().enumerate() {
                        if j > 0 {
                            clause.push_str(", ");
                        }
                        clause.push_str(&format!("${}", param_counter));
                        params.push(value.to_string());
                        param_counter += 1;
                    }
                    clause.push(')');
                }
                QueryOperator::IsNull | QueryOperator::IsNotNull => {
                    clause.push_str(&condition.operator.to_string());
                }
                _ => {
                    clause.push_str(&condition.operator.to_string());
                    if let Some(ref value) = condition.value {
                        clause.push_str(&format!(" ${}", param_counter));
                        params.push(value.to_string());
                        param_counter += 1;
                    }
                }
            }
        }
        Some(clause)
    }

    fn build_where_clause_inline(&self) -> Option<String> {
        if self.where_conditions.is_empty() {
            return None;
        }

        let clauses: Vec<String> = self
            .where_conditions
            .iter()
            .map(|condition| match condition.operator {
                QueryOperator::In => {
                    let values: Vec<String> =
                        condition.values.iter().map(format_value).collect();
                    format!("{} IN ({})", condition.column, values.join(", "))
                }
                QueryOperator::IsNull | QueryOperator::IsNotNull => {
                    format!("{} {}", condition.column, condition.operator)
                }
                _ => match condition.value {
                    Some(ref value) => format!(
                        "{} {} {}",
                        condition.column,
                        condition.operator,
                        format_value(value)
                    ),
                    None => format!("{} {} NULL", condition.column, condition.operator),
                },
            })
            .collect();
        Some(clauses.join(" AND "))
    }

    fn append_order_and_limit(&self, sql: &mut String) {
        if !self.order_by.is_empty() {
            let clauses: Vec<String> = self
                .order_by
                .iter()
                .map(|(column, direction)| format!("{} {}", column, direction))
                .collect();
            sql.push_str(&format!(" ORDER BY {}", clauses.join(", ")));
        }
        if let Some(limit) = self.limit_count {
            sql.push_str(&format!(" LIMIT {}", limit));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{}'", s.replace('\'', "''")),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "NULL".to_string(),
        _ => "NULL".to_string(),
    }
}
