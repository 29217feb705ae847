//! Query construction and the eager-load capability trait
//!
//! The compiler is generic over [`EagerQuery`]; [`QueryBuilder`] is the
//! concrete handle used throughout this crate's tests and by callers that
//! do not bring their own.

pub mod builder;
pub mod sql;
pub mod traits;
pub mod types;

pub use builder::QueryBuilder;
pub use traits::EagerQuery;
pub use types::{OrderDirection, QueryOperator, WhereCondition};
