//! Optimization Schema - per-entity declarative eager-fetch mappings
//!
//! Each entity type declares, once at startup, how every client-visible
//! field *can* be fetched eagerly. Schemas are immutable after construction
//! and shared behind `Arc` across concurrent compilations; nothing here is
//! global state, the owning service wires schemas (or a [`SchemaCatalog`])
//! into whatever needs them.

use std::collections::HashMap;

pub mod builder;
pub mod catalog;
pub mod directive;

pub use builder::SchemaBuilder;
pub use catalog::SchemaCatalog;
pub use directive::{
    Annotation, NestedSelect, OptimizationDirective, PrefetchSpec, PrefetchTarget,
};

/// Immutable mapping from external field name to optimization directive for
/// one entity type.
///
/// Constructed only through [`SchemaBuilder`], which validates the
/// declarations; key order is irrelevant.
#[derive(Debug)]
pub struct OptimizationSchema<Q> {
    entity: String,
    fields: HashMap<String, OptimizationDirective<Q>>,
}

impl<Q> OptimizationSchema<Q> {
    /// Start declaring a schema for the named entity type
    pub fn builder(entity: &str) -> SchemaBuilder<Q> {
        SchemaBuilder::new(entity)
    }

    /// Entity type this schema describes
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Directive declared for an external field name, if any
    pub fn directive(&self, field: &str) -> Option<&OptimizationDirective<Q>> {
        self.fields.get(field)
    }

    /// Whether the field has a declared directive
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// All declared external field names
    pub fn field_names(&self) -> Vec<String> {
        self.fields.keys().cloned().collect()
    }

    /// Number of declared fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no fields are declared
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
