use super::node::{LayoutNode, NodeId};
use super::rule::VisibilityRule;
use super::Layout;
use crate::form::FormState;
use serde_json::Value;
use std::collections::BTreeMap;

/// Visibility of one node for a given form state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeVisibility {
    /// Outcome of the node's own rule; `true` when it has none.
    pub own: bool,
    /// Whether the node is rendered: its own rule passes and no ancestor is hidden.
    pub shown: bool,
}

/// How one node's visibility was decided. Input to the trace formatter.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleTrace {
    pub node: NodeId,
    pub field_ref: Option<String>,
    pub rule: Option<VisibilityRule>,
    /// The value the rule saw for its depended-on field.
    pub observed: Value,
    pub own: bool,
    /// The nearest hidden ancestor, when the node is suppressed by one.
    pub suppressed_by: Option<NodeId>,
}

impl RuleTrace {
    pub fn shown(&self) -> bool {
        self.own && self.suppressed_by.is_none()
    }
}

/// The visibility of every node of a layout for one form state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Visibility {
    nodes: BTreeMap<NodeId, NodeVisibility>,
    shown_fields: Vec<String>,
}

impl Visibility {
    pub fn node(&self, id: &NodeId) -> Option<NodeVisibility> {
        self.nodes.get(id).copied()
    }

    /// Whether the node is rendered. Unknown ids are not.
    pub fn is_shown(&self, id: &str) -> bool {
        self.nodes
            .get(&NodeId::from(id))
            .is_some_and(|v| v.shown)
    }

    /// Node id to rendered flag, for every node of the layout.
    pub fn shown_map(&self) -> BTreeMap<NodeId, bool> {
        self.nodes.iter().map(|(id, v)| (id.clone(), v.shown)).collect()
    }

    /// Names of fields with at least one rendered node, in layout order.
    pub fn shown_fields(&self) -> &[String] {
        &self.shown_fields
    }

    pub fn is_field_shown(&self, field: &str) -> bool {
        self.shown_fields.iter().any(|f| f == field)
    }
}

/// Explains the visibility of every node, depth-first in layout order.
///
/// Each node's own rule is evaluated from the form state alone; a hidden
/// ancestor then suppresses rendering of everything below it.
pub fn explain(layout: &Layout, state: &FormState) -> Vec<RuleTrace> {
    let mut traces = Vec::new();
    trace_node(layout.root(), state, None, &mut traces);
    traces
}

fn trace_node(
    node: &LayoutNode,
    state: &FormState,
    hidden_ancestor: Option<&NodeId>,
    traces: &mut Vec<RuleTrace>,
) {
    let rule = node.rule();
    let own = rule.is_none_or(|r| r.evaluate(state));
    let observed = rule
        .map(|r| state.value_of(&r.depends_on_field).clone())
        .unwrap_or(Value::Null);

    traces.push(RuleTrace {
        node: node.id().clone(),
        field_ref: node.field_ref().map(str::to_string),
        rule: rule.cloned(),
        observed,
        own,
        suppressed_by: hidden_ancestor.cloned(),
    });

    // Children report the innermost hidden group above them
    let child_ancestor = if own { hidden_ancestor } else { Some(node.id()) };
    for child in node.children() {
        trace_node(child, state, child_ancestor, traces);
    }
}

/// Computes which nodes and fields are rendered for `state`.
///
/// A pure function of its inputs. Call it again after every state change.
pub fn compute_visibility(layout: &Layout, state: &FormState) -> Visibility {
    let mut visibility = Visibility::default();
    for trace in explain(layout, state) {
        let shown = trace.shown();
        if shown {
            if let Some(field) = &trace.field_ref {
                if !visibility.shown_fields.contains(field) {
                    visibility.shown_fields.push(field.clone());
                }
            }
        }
        visibility.nodes.insert(
            trace.node,
            NodeVisibility {
                own: trace.own,
                shown,
            },
        );
    }
    visibility
}
