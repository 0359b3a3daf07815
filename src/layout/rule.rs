use crate::form::FormState;
use crate::value::same_value;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// What a matching rule does to its node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    Show,
    Hide,
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::Show => write!(f, "SHOW"),
            Effect::Hide => write!(f, "HIDE"),
        }
    }
}

/// Shows or hides a node depending on the current value of one field.
///
/// Rules never combine several fields. New modes only need new rule data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityRule {
    pub effect: Effect,
    pub depends_on_field: String,
    pub match_if: Vec<Value>,
}

impl VisibilityRule {
    pub fn show_when(field: &str, values: &[&str]) -> Self {
        Self::new(Effect::Show, field, values)
    }

    pub fn hide_when(field: &str, values: &[&str]) -> Self {
        Self::new(Effect::Hide, field, values)
    }

    fn new(effect: Effect, field: &str, values: &[&str]) -> Self {
        Self {
            effect,
            depends_on_field: field.to_string(),
            match_if: values.iter().map(|v| Value::String(v.to_string())).collect(),
        }
    }

    /// Whether the depended-on value is in the match set. A field with no
    /// value is matched as `null`; numbers match by value.
    pub fn matches(&self, state: &FormState) -> bool {
        let observed = state.value_of(&self.depends_on_field);
        self.match_if.iter().any(|candidate| same_value(candidate, observed))
    }

    /// The node's own visibility under this rule.
    pub fn evaluate(&self, state: &FormState) -> bool {
        match self.effect {
            Effect::Show => self.matches(state),
            Effect::Hide => !self.matches(state),
        }
    }
}
