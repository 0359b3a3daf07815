//! Form layout and the conditional visibility rules attached to it.

pub mod conversion;
pub mod node;
pub mod rule;
pub mod visibility;

pub use conversion::*;
pub use node::*;
pub use rule::*;
pub use visibility::*;

use crate::error::ConfigurationError;
use crate::schema::Schema;
use ahash::AHashSet;
use serde::{Deserialize, Serialize};

/// A layout tree, independent of the schema's type information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Layout {
    root: LayoutNode,
}

impl Layout {
    pub fn new(root: LayoutNode) -> Self {
        Self { root }
    }

    /// A root group with id `root` holding `children`.
    pub fn vertical(children: Vec<LayoutNode>) -> Self {
        Self::new(LayoutNode::group("root", children))
    }

    pub fn root(&self) -> &LayoutNode {
        &self.root
    }

    /// All nodes, depth-first, parents before children.
    pub fn nodes(&self) -> Vec<&LayoutNode> {
        let mut nodes = Vec::new();
        self.root.walk(&mut |node| nodes.push(node));
        nodes
    }

    pub fn find(&self, id: &str) -> Option<&LayoutNode> {
        self.nodes().into_iter().find(|n| n.id().as_str() == id)
    }

    /// Checks the layout against a schema: node ids are unique, and every
    /// field reference and rule dependency names a schema field.
    pub fn check(&self, schema: &Schema) -> Result<(), ConfigurationError> {
        let mut ids = AHashSet::new();
        for node in self.nodes() {
            if !ids.insert(node.id()) {
                return Err(ConfigurationError::DuplicateNodeId(node.id().to_string()));
            }
            if let Some(field) = node.field_ref() {
                if !schema.contains(field) {
                    return Err(ConfigurationError::UnknownFieldRef {
                        node_id: node.id().to_string(),
                        field: field.to_string(),
                    });
                }
            }
            if let Some(rule) = node.rule() {
                if !schema.contains(&rule.depends_on_field) {
                    return Err(ConfigurationError::UnknownRuleField {
                        node_id: node.id().to_string(),
                        field: rule.depends_on_field.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
