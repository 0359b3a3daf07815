//! Schema conformance checks for a [`FormState`].
//!
//! Validation looks at every value in the state, whether or not its field is
//! currently visible. Top-level fields are optional; item properties of array
//! fields are required. A `null` value counts as absent.

use crate::form::FormState;
use crate::schema::{FieldKind, FieldSpec, ItemSchema, Schema};
use crate::value::{DisplayValue, is_integer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// One failed check, located by a JSON pointer into the form state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub path: String,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Ordered validation issues. Empty means the state satisfies the schema.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationResult(Vec<ValidationIssue>);

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationIssue> {
        self.0.iter()
    }

    fn push(&mut self, path: String, message: String) {
        self.0.push(ValidationIssue { path, message });
    }
}

impl<'a> IntoIterator for &'a ValidationResult {
    type Item = &'a ValidationIssue;
    type IntoIter = std::slice::Iter<'a, ValidationIssue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Checks `state` against `schema`, in schema field order.
pub fn validate(schema: &Schema, state: &FormState) -> ValidationResult {
    let mut result = ValidationResult::default();
    for field in &schema.fields {
        match state.get(&field.name) {
            // Top-level fields are optional
            None | Some(Value::Null) => {}
            Some(value) => check_value(field, value, format!("/{}", field.name), &mut result),
        }
    }
    result
}

fn check_value(field: &FieldSpec, value: &Value, path: String, result: &mut ValidationResult) {
    match field.kind {
        FieldKind::String => {
            if !value.is_string() {
                result.push(path, format!("must be string, found {}", DisplayValue(value)));
            }
        }
        FieldKind::Integer => {
            if !is_integer(value) {
                result.push(path, format!("must be integer, found {}", DisplayValue(value)));
            } else if let (Some(maximum), Some(n)) = (field.maximum, value.as_f64()) {
                if n > maximum {
                    result.push(
                        path,
                        format!("must be <= {}", DisplayValue(&serde_json::json!(maximum))),
                    );
                }
            }
        }
        FieldKind::Enum => match value.as_str() {
            Some(choice) if field.allows(choice) => {}
            Some(_) => result.push(path, "must be equal to one of the allowed values".to_string()),
            None => result.push(path, format!("must be string, found {}", DisplayValue(value))),
        },
        FieldKind::Array => match (value.as_array(), &field.items) {
            (Some(elements), Some(items)) => {
                for (index, element) in elements.iter().enumerate() {
                    check_item(items, element, format!("{}/{}", path, index), result);
                }
            }
            // Synthesized arrays always carry items; hand-built ones may not
            (Some(_), None) => {}
            (None, _) => result.push(path, "must be array".to_string()),
        },
    }
}

fn check_item(items: &ItemSchema, element: &Value, path: String, result: &mut ValidationResult) {
    let Some(object) = element.as_object() else {
        result.push(path, "must be object".to_string());
        return;
    };
    for name in &items.required {
        if object.get(name).is_none_or(Value::is_null) {
            result.push(
                path.clone(),
                format!("must have required property '{}'", name),
            );
        }
    }
    for property in &items.properties {
        match object.get(&property.name) {
            None | Some(Value::Null) => {}
            Some(value) => check_value(
                property,
                value,
                format!("{}/{}", path, property.name),
                result,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn integer_field(maximum: f64) -> FieldSpec {
        FieldSpec {
            name: "count".to_string(),
            kind: FieldKind::Integer,
            enumeration: None,
            maximum: Some(maximum),
            items: None,
        }
    }

    #[test]
    fn test_integer_maximum() {
        let schema = Schema {
            fields: vec![integer_field(100.0)],
        };
        let ok = FormState::new().with("count", json!(100));
        assert!(validate(&schema, &ok).is_valid());

        let too_big = FormState::new().with("count", json!(101));
        let result = validate(&schema, &too_big);
        assert_eq!(result.len(), 1);
        assert_eq!(result.issues()[0].path, "/count");
        assert_eq!(result.issues()[0].message, "must be <= 100");
    }

    #[test]
    fn test_null_counts_as_absent() {
        let schema = Schema {
            fields: vec![integer_field(10.0)],
        };
        let state = FormState::new().with("count", Value::Null);
        assert!(validate(&schema, &state).is_valid());
    }

    #[test]
    fn test_fractional_is_not_integer() {
        let schema = Schema {
            fields: vec![integer_field(10.0)],
        };
        let state = FormState::new().with("count", json!(2.5));
        assert_eq!(validate(&schema, &state).len(), 1);
    }
}
