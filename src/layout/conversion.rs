use super::node::{LayoutNode, NodeId};
use super::rule::{Effect, VisibilityRule};
use super::Layout;
use crate::error::ConfigurationError;
use itertools::Itertools;
use serde::Deserialize;
use serde_json::Value;

/// A trait for layout formats that can be converted into a [`LayoutNode`] tree.
///
/// Implement it on your own UI description structs to feed the visibility
/// engine. [`UiElement`] implements it for JSON-Forms style UI schemas.
pub trait IntoLayout {
    fn into_layout(self) -> Result<Layout, ConfigurationError>;
}

/// One element of a JSON-Forms style UI schema.
#[derive(Debug, Deserialize, Clone)]
pub struct UiElement {
    #[serde(rename = "type")]
    pub element_type: String,
    pub label: Option<String>,
    pub scope: Option<String>,
    #[serde(default)]
    pub elements: Vec<UiElement>,
    pub rule: Option<UiRule>,
}

/// Rule attached to a UI element.
#[derive(Debug, Deserialize, Clone)]
pub struct UiRule {
    pub effect: String,
    pub condition: UiCondition,
}

/// Condition of a UI rule: a scope and a schema its value must satisfy.
#[derive(Debug, Deserialize, Clone)]
pub struct UiCondition {
    pub scope: String,
    pub schema: UiConditionSchema,
}

/// The supported subset of condition schemas: `enum` or `const`.
#[derive(Debug, Deserialize, Clone)]
pub struct UiConditionSchema {
    #[serde(rename = "enum")]
    pub enumeration: Option<Vec<Value>>,
    #[serde(rename = "const")]
    pub constant: Option<Value>,
}

/// Parses a UI schema JSON value and converts it into a layout.
pub fn from_ui_schema(ui_schema: &Value) -> Result<Layout, ConfigurationError> {
    let root: UiElement = serde_json::from_value(ui_schema.clone())
        .map_err(|e| ConfigurationError::InvalidUiSchema(e.to_string()))?;
    root.into_layout()
}

impl IntoLayout for UiElement {
    fn into_layout(self) -> Result<Layout, ConfigurationError> {
        convert(self, &[]).map(Layout::new)
    }
}

/// Converts one element. `path` holds the child positions leading to it;
/// an empty path is the root.
///
/// Groups are named `root`, `group:<label>` when labelled, or
/// `group:<i.j>` by position. Controls are named after their field.
fn convert(element: UiElement, path: &[usize]) -> Result<LayoutNode, ConfigurationError> {
    // Rules convert the same way for controls and groups
    let rule = element.rule.map(convert_rule).transpose()?;
    match element.element_type.as_str() {
        "Control" => {
            let scope = element.scope.ok_or_else(|| {
                ConfigurationError::InvalidUiSchema("Control element without scope".to_string())
            })?;
            let field_ref = field_from_scope(&scope)?;
            Ok(LayoutNode::Field {
                id: NodeId(format!("field:{}", field_ref)),
                field_ref,
                label: element.label,
                rule,
            })
        }
        "VerticalLayout" | "HorizontalLayout" | "Group" => {
            let id = group_id(path, element.label.as_deref());

            // Children extend the positional path even below a labelled group
            let mut child_path = path.to_vec();
            child_path.push(0);
            let children = element
                .elements
                .into_iter()
                .enumerate()
                .map(|(i, child)| {
                    if let Some(last) = child_path.last_mut() {
                        *last = i;
                    }
                    convert(child, &child_path)
                })
                .collect::<Result<Vec<_>, _>>()?;

            Ok(LayoutNode::Group {
                id,
                label: element.label,
                children,
                rule,
            })
        }
        other => Err(ConfigurationError::InvalidUiSchema(format!(
            "unsupported element type '{}'",
            other
        ))),
    }
}

fn group_id(path: &[usize], label: Option<&str>) -> NodeId {
    if path.is_empty() {
        return NodeId::from("root");
    }
    match label.map(slug).filter(|s| !s.is_empty()) {
        Some(name) => NodeId(format!("group:{}", name)),
        None => NodeId(format!("group:{}", path.iter().join("."))),
    }
}

/// Lowercases a label and collapses everything but letters and digits to `-`.
fn slug(label: &str) -> String {
    label
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .join("-")
}

fn convert_rule(rule: UiRule) -> Result<VisibilityRule, ConfigurationError> {
    let effect = match rule.effect.to_ascii_uppercase().as_str() {
        "SHOW" => Effect::Show,
        "HIDE" => Effect::Hide,
        other => {
            return Err(ConfigurationError::InvalidUiSchema(format!(
                "unsupported rule effect '{}'",
                other
            )));
        }
    };
    let match_if = match (rule.condition.schema.enumeration, rule.condition.schema.constant) {
        (Some(values), _) => values,
        (None, Some(value)) => vec![value],
        (None, None) => {
            return Err(ConfigurationError::InvalidUiSchema(
                "rule condition needs an 'enum' or 'const' schema".to_string(),
            ));
        }
    };
    Ok(VisibilityRule {
        effect,
        depends_on_field: field_from_scope(&rule.condition.scope)?,
        match_if,
    })
}

/// Extracts `name` from a `#/properties/name` scope. Nested scopes are not supported.
fn field_from_scope(scope: &str) -> Result<String, ConfigurationError> {
    match scope.strip_prefix("#/properties/") {
        Some(name) if !name.is_empty() && !name.contains('/') => Ok(name.to_string()),
        _ => Err(ConfigurationError::InvalidUiSchema(format!(
            "unsupported scope '{}'",
            scope
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_from_scope() {
        assert_eq!(field_from_scope("#/properties/type").unwrap(), "type");
        assert!(field_from_scope("#/properties/a/properties/b").is_err());
        assert!(field_from_scope("type").is_err());
    }

    #[test]
    fn test_group_ids_follow_position() {
        let layout = from_ui_schema(&json!({
            "type": "VerticalLayout",
            "elements": [
                {"type": "Control", "scope": "#/properties/type"},
                {"type": "VerticalLayout", "elements": [
                    {"type": "Group", "elements": []}
                ]}
            ]
        }))
        .unwrap();
        assert!(layout.find("root").is_some());
        assert!(layout.find("field:type").is_some());
        assert!(layout.find("group:1").is_some());
        assert!(layout.find("group:1.0").is_some());
    }

    #[test]
    fn test_labelled_groups_are_named_by_label() {
        let layout = from_ui_schema(&json!({
            "type": "VerticalLayout",
            "label": "Ignored at root",
            "elements": [
                {"type": "Group", "label": "Block Details", "elements": [
                    {"type": "Group", "elements": []}
                ]},
                {"type": "Group", "label": "  ", "elements": []}
            ]
        }))
        .unwrap();
        assert!(layout.find("root").is_some());
        assert!(layout.find("group:block-details").is_some());
        assert!(layout.find("group:0.0").is_some());
        assert!(layout.find("group:1").is_some());
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("Block Details"), "block-details");
        assert_eq!(slug("Headline / Visual"), "headline-visual");
        assert_eq!(slug("--"), "");
    }

    #[test]
    fn test_const_condition() {
        let rule = convert_rule(UiRule {
            effect: "SHOW".to_string(),
            condition: UiCondition {
                scope: "#/properties/type".to_string(),
                schema: UiConditionSchema {
                    enumeration: None,
                    constant: Some(json!("format")),
                },
            },
        })
        .unwrap();
        assert_eq!(rule, VisibilityRule::show_when("type", &["format"]));
    }
}
