//! Error types for schema declaration and registration
//!
//! Compilation and plan application never fail: unknown fields are skipped
//! and a missing root selection means "nothing to optimize". The only errors
//! this crate produces are raised while *declaring* optimization schemas,
//! before any request is served.

/// Schema declaration and registration error types
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Entity name cannot be empty")]
    EmptyEntityName,

    #[error("Field name cannot be empty in schema for '{entity}'")]
    EmptyFieldName { entity: String },

    #[error("Field '{field}' in schema for '{entity}' has an empty {target}")]
    EmptyTarget {
        entity: String,
        field: String,
        target: String,
    },

    #[error("Duplicate field '{field}' in schema for '{entity}'")]
    DuplicateField { entity: String, field: String },

    #[error("Schema for '{entity}' is already registered")]
    AlreadyRegistered { entity: String },
}

/// Result type for schema declaration operations
pub type SchemaResult<T> = Result<T, SchemaError>;
