//! # roomline-fetchplan: Fetch-Plan Compiler for the Roomline Backend
//!
//! Compiles a client's field selection against per-entity optimization
//! schemas into an eager-loading plan, then applies that plan to a query
//! handle so related records load in a fixed number of batched queries
//! instead of one query per row.
//!
//! The pipeline is three infallible steps: locate the collection node in
//! the selection tree, compile its children into a [`CompiledPlan`], and
//! fold the plan into a query through the [`EagerQuery`] trait. Schemas are
//! declared once with [`SchemaBuilder`], which is the only place anything
//! can fail.

pub mod applier;
pub mod compiler;
pub mod error;
pub mod optimizer;
pub mod plan;
pub mod query;
pub mod schema;
pub mod selection;

// Re-export the crate surface (curated to avoid submodule name conflicts)
pub use applier::{apply_directives, apply_to_query};
pub use compiler::{
    compile, compile_prefetch, compile_prefetch_with, compile_with, CompileOptions,
};
pub use error::{SchemaError, SchemaResult};
pub use optimizer::FetchOptimizer;
pub use plan::{CompiledPlan, Prefetch, PrefetchPlan};
pub use query::{EagerQuery, OrderDirection, QueryBuilder, QueryOperator, WhereCondition};
pub use schema::{
    Annotation, NestedSelect, OptimizationDirective, OptimizationSchema, PrefetchSpec,
    PrefetchTarget, SchemaBuilder, SchemaCatalog,
};
pub use selection::{find_collection_node, SelectionNode, EDGES_FIELD, NODE_FIELD};
