//! Selection tree nodes

use serde::{Deserialize, Serialize};

/// One requested field, with the fields requested beneath it.
///
/// A selection tree is produced fresh for every incoming query by the
/// transport layer and is never mutated afterwards. Any protocol that can
/// express "field name plus nested field names" can be converted into this
/// shape; the `Deserialize` impl accepts the JSON form directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionNode {
    /// External (client-visible) field name
    pub name: String,
    /// Nested selections, empty for a scalar leaf
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SelectionNode>,
}

impl SelectionNode {
    /// Create a leaf selection with no nested fields
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            children: Vec::new(),
        }
    }

    /// Create a selection with nested fields
    pub fn with_children(name: &str, children: Vec<SelectionNode>) -> Self {
        Self {
            name: name.to_string(),
            children,
        }
    }

    /// Whether this selection has no nested fields
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// First direct child with the given name
    pub fn child(&self, name: &str) -> Option<&SelectionNode> {
        self.children.iter().find(|child| child.name == name)
    }
}
