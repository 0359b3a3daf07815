use serde::{Deserialize, Serialize};
use std::fmt;

/// The value type a form field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Integer,
    Enum,
    Array,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::String => "string",
            FieldKind::Integer => "integer",
            FieldKind::Enum => "enum",
            FieldKind::Array => "array",
        };
        write!(f, "{}", name)
    }
}

/// A synthesized field: its type, its resolved choices and its bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    /// Present and non-empty exactly when `kind` is `Enum`.
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enumeration: Option<Vec<String>>,
    #[serde(rename = "max", default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    /// Present exactly when `kind` is `Array`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<ItemSchema>>,
}

impl FieldSpec {
    pub fn allows(&self, choice: &str) -> bool {
        self.enumeration
            .as_ref()
            .is_some_and(|choices| choices.iter().any(|c| c == choice))
    }
}

/// The object shape of each element of an array field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSchema {
    pub properties: Vec<FieldSpec>,
    pub required: Vec<String>,
}

impl ItemSchema {
    pub fn property(&self, name: &str) -> Option<&FieldSpec> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// The complete, synthesized contract a form payload must satisfy.
///
/// Fields keep their declaration order. A schema is only ever produced whole
/// by the synthesizer and replaced whole when reference data changes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schema {
    pub fields: Vec<FieldSpec>,
}

impl Schema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
