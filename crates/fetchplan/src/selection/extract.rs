//! Locating the optimizable collection inside a requested-field tree

use super::node::SelectionNode;

/// Connection-style wrapper field holding the list of edges.
pub const EDGES_FIELD: &str = "edges";

/// Connection-style wrapper field holding the entity node inside an edge.
pub const NODE_FIELD: &str = "node";

/// Find the entity-level selection for a connection-style collection field.
///
/// Searches `requested` depth-first for the first field named `field_name`,
/// then unwraps exactly one `edges` child and one `node` child beneath it.
/// The returned node's children are the entity's real field selections.
///
/// Returns `None` when the field is absent or the wrapper shape is not
/// found at the expected depth; the caller then runs the base query
/// unoptimized.
///
/// Callers must ensure the optimizable field occurs at most once in the
/// requested structure: with multiple (e.g. aliased) occurrences only the
/// first in document order is found, and the others fetch lazily.
pub fn find_collection_node<'a>(
    requested: &'a SelectionNode,
    field_name: &str,
) -> Option<&'a SelectionNode> {
    let field = find_field(requested, field_name)?;
    field.child(EDGES_FIELD)?.child(NODE_FIELD)
}

/// Depth-first search for the first node with the given name.
fn find_field<'a>(node: &'a SelectionNode, field_name: &str) -> Option<&'a SelectionNode> {
    if node.name == field_name {
        return Some(node);
    }
    node.children
        .iter()
        .find_map(|child| find_field(child, field_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connection(field_name: &str, node_children: Vec<SelectionNode>) -> SelectionNode {
        SelectionNode::with_children(
            field_name,
            vec![SelectionNode::with_children(
                EDGES_FIELD,
                vec![SelectionNode::with_children(NODE_FIELD, node_children)],
            )],
        )
    }

    #[test]
    fn test_finds_node_under_connection_wrapper() {
        let requested = SelectionNode::with_children(
            "query",
            vec![connection(
                "reservations",
                vec![SelectionNode::new("user"), SelectionNode::new("beginTime")],
            )],
        );

        let node = find_collection_node(&requested, "reservations").unwrap();
        assert_eq!(node.name, NODE_FIELD);
        assert_eq!(node.children.len(), 2);
        assert_eq!(node.children[0].name, "user");
    }

    #[test]
    fn test_missing_field_returns_none() {
        let requested = SelectionNode::with_children(
            "query",
            vec![connection("reservations", vec![SelectionNode::new("user")])],
        );
        assert!(find_collection_node(&requested, "resources").is_none());
    }

    #[test]
    fn test_missing_wrapper_returns_none() {
        // Field present but without the edges/node indirection.
        let requested = SelectionNode::with_children(
            "query",
            vec![SelectionNode::with_children(
                "reservations",
                vec![SelectionNode::new("user")],
            )],
        );
        assert!(find_collection_node(&requested, "reservations").is_none());

        // edges present but no node beneath it.
        let requested = SelectionNode::with_children(
            "query",
            vec![SelectionNode::with_children(
                "reservations",
                vec![SelectionNode::with_children(
                    EDGES_FIELD,
                    vec![SelectionNode::new("cursor")],
                )],
            )],
        );
        assert!(find_collection_node(&requested, "reservations").is_none());
    }

    #[test]
    fn test_finds_field_at_any_depth() {
        let requested = SelectionNode::with_children(
            "query",
            vec![SelectionNode::with_children(
                "viewer",
                vec![connection("reservations", vec![SelectionNode::new("user")])],
            )],
        );

        let node = find_collection_node(&requested, "reservations").unwrap();
        assert_eq!(node.children[0].name, "user");
    }

    #[test]
    fn test_first_occurrence_wins() {
        let requested = SelectionNode::with_children(
            "query",
            vec![
                connection("reservations", vec![SelectionNode::new("user")]),
                connection("reservations", vec![SelectionNode::new("resource")]),
            ],
        );

        let node = find_collection_node(&requested, "reservations").unwrap();
        assert_eq!(node.children.len(), 1);
        assert_eq!(node.children[0].name, "user");
    }

    #[test]
    fn test_root_itself_can_match() {
        let requested = connection("reservations", vec![SelectionNode::new("user")]);
        assert!(find_collection_node(&requested, "reservations").is_some());
    }
}
