//! Schema catalog - thread-safe collection of per-entity schemas

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::error::{SchemaError, SchemaResult};

use super::OptimizationSchema;

/// Thread-safe mapping from entity-type name to its optimization schema.
///
/// A catalog is an explicitly constructed value handed to whatever needs it;
/// there is no process-global instance. Cloning shares the underlying map.
#[derive(Debug, Clone)]
pub struct SchemaCatalog<Q> {
    schemas: Arc<DashMap<String, Arc<OptimizationSchema<Q>>>>,
}

impl<Q> Default for SchemaCatalog<Q> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Q> SchemaCatalog<Q> {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            schemas: Arc::new(DashMap::new()),
        }
    }

    /// Register a schema under its entity name
    pub fn register(&self, schema: Arc<OptimizationSchema<Q>>) -> SchemaResult<()> {
        match self.schemas.entry(schema.entity().to_string()) {
            Entry::Occupied(entry) => Err(SchemaError::AlreadyRegistered {
                entity: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                tracing::debug!(
                    "Registered optimization schema for '{}' with {} fields",
                    schema.entity(),
                    schema.len()
                );
                entry.insert(schema);
                Ok(())
            }
        }
    }

    /// Look up the schema for an entity type
    pub fn get(&self, entity: &str) -> Option<Arc<OptimizationSchema<Q>>> {
        self.schemas.get(entity).map(|entry| Arc::clone(entry.value()))
    }

    /// Whether a schema is registered for the entity type
    pub fn contains(&self, entity: &str) -> bool {
        self.schemas.contains_key(entity)
    }

    /// Names of all registered entity types
    pub fn entity_names(&self) -> Vec<String> {
        self.schemas.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Number of registered schemas
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Whether no schemas are registered
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Remove all registered schemas
    pub fn clear(&self) {
        self.schemas.clear();
    }
}
