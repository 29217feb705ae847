//! Selection Tree - the fields a client actually requested
//!
//! The compiler never sees a protocol AST. Transports convert whatever
//! document format they speak into [`SelectionNode`] trees, and
//! [`find_collection_node`] digs the entity-level selection out of the
//! connection-style wrapping.

pub mod extract;
pub mod node;

pub use extract::{find_collection_node, EDGES_FIELD, NODE_FIELD};
pub use node::SelectionNode;
