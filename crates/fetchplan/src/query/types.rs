//! Core types for query construction

use std::fmt;

use serde_json::Value;

/// Comparison operators for where conditions
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOperator {
    Equal,
    NotEqual,
    GreaterThan,
    LessThan,
    In,
    IsNull,
    IsNotNull,
}

impl fmt::Display for QueryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            QueryOperator::Equal => "=",
            QueryOperator::NotEqual => "!=",
            QueryOperator::GreaterThan => ">",
            QueryOperator::LessThan => "<",
            QueryOperator::In => "IN",
            QueryOperator::IsNull => "IS NULL",
            QueryOperator::IsNotNull => "IS NOT NULL",
        };
        write!(f, "{}", op)
    }
}

/// A single where condition in a query
#[derive(Debug, Clone, PartialEq)]
pub struct WhereCondition {
    pub column: String,
    pub operator: QueryOperator,
    pub value: Option<Value>,
    /// Used for IN conditions
    pub values: Vec<Value>,
}

impl WhereCondition {
    /// Condition comparing a column against a single value
    pub fn new(column: &str, operator: QueryOperator, value: Value) -> Self {
        Self {
            column: column.to_string(),
            operator,
            value: Some(value),
            values: Vec::new(),
        }
    }

    /// Condition matching a column against a list of values
    pub fn new_in(column: &str, values: Vec<Value>) -> Self {
        Self {
            column: column.to_string(),
            operator: QueryOperator::In,
            value: None,
            values,
        }
    }

    /// Condition with no right-hand value (IS NULL, IS NOT NULL)
    pub fn new_unary(column: &str, operator: QueryOperator) -> Self {
        Self {
            column: column.to_string(),
            operator,
            value: None,
            values: Vec::new(),
        }
    }
}

/// Sort direction for ORDER BY clauses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderDirection::Asc => write!(f, "ASC"),
            OrderDirection::Desc => write!(f, "DESC"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_display() {
        assert_eq!(QueryOperator::Equal.to_string(), "=");
        assert_eq!(QueryOperator::In.to_string(), "IN");
        assert_eq!(QueryOperator::IsNotNull.to_string(), "IS NOT NULL");
    }

    #[test]
    fn test_order_direction_display() {
        assert_eq!(OrderDirection::Asc.to_string(), "ASC");
        assert_eq!(OrderDirection::Desc.to_string(), "DESC");
    }
}
