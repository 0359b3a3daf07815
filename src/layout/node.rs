use super::rule::VisibilityRule;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a layout node, unique within one layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A node of the form layout: a group of nodes or a single field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LayoutNode {
    Group {
        id: NodeId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        #[serde(default)]
        children: Vec<LayoutNode>,
        #[serde(rename = "visibilityRule", default, skip_serializing_if = "Option::is_none")]
        rule: Option<VisibilityRule>,
    },
    Field {
        id: NodeId,
        #[serde(rename = "fieldRef")]
        field_ref: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        #[serde(rename = "visibilityRule", default, skip_serializing_if = "Option::is_none")]
        rule: Option<VisibilityRule>,
    },
}

impl LayoutNode {
    pub fn group(id: &str, children: Vec<LayoutNode>) -> Self {
        LayoutNode::Group {
            id: id.into(),
            label: None,
            children,
            rule: None,
        }
    }

    /// A field node whose id is `field:<name>`.
    pub fn field(field_ref: &str) -> Self {
        LayoutNode::Field {
            id: NodeId(format!("field:{}", field_ref)),
            field_ref: field_ref.to_string(),
            label: None,
            rule: None,
        }
    }

    pub fn with_rule(mut self, visibility: VisibilityRule) -> Self {
        match &mut self {
            LayoutNode::Group { rule, .. } | LayoutNode::Field { rule, .. } => {
                *rule = Some(visibility)
            }
        }
        self
    }

    pub fn with_label(mut self, text: &str) -> Self {
        match &mut self {
            LayoutNode::Group { label, .. } | LayoutNode::Field { label, .. } => {
                *label = Some(text.to_string())
            }
        }
        self
    }

    pub fn id(&self) -> &NodeId {
        match self {
            LayoutNode::Group { id, .. } | LayoutNode::Field { id, .. } => id,
        }
    }

    pub fn rule(&self) -> Option<&VisibilityRule> {
        match self {
            LayoutNode::Group { rule, .. } | LayoutNode::Field { rule, .. } => rule.as_ref(),
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            LayoutNode::Group { label, .. } | LayoutNode::Field { label, .. } => label.as_deref(),
        }
    }

    pub fn children(&self) -> &[LayoutNode] {
        match self {
            LayoutNode::Group { children, .. } => children,
            LayoutNode::Field { .. } => &[],
        }
    }

    pub fn field_ref(&self) -> Option<&str> {
        match self {
            LayoutNode::Field { field_ref, .. } => Some(field_ref),
            LayoutNode::Group { .. } => None,
        }
    }

    /// Visits this node and all descendants depth-first, parents first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a LayoutNode)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }
}
