//! Capability trait connecting plans to query handles

use std::fmt::Debug;

use crate::plan::Prefetch;
use crate::schema::Annotation;

/// Mutation surface the compiler and applier need from a query handle.
///
/// Implemented by this crate's [`QueryBuilder`](crate::query::QueryBuilder)
/// and by whatever handle the storage layer actually executes. Every method
/// registers an eager-loading instruction; none of them run anything.
/// Implementations are expected to be idempotent per identity (annotation
/// alias, joined relation name, prefetched relation name), since plans
/// deduplicate on the same keys.
pub trait EagerQuery: Clone + Debug {
    /// Register a computed column evaluated alongside the base fetch
    fn annotate(&mut self, annotation: &Annotation);

    /// Eager-join a to-one relation into the primary fetch
    fn select_related(&mut self, relation: &str);

    /// Eager-load a relation through a separate batched query
    fn prefetch_related(&mut self, prefetch: Prefetch<Self>);
}
