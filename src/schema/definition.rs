use super::field::FieldKind;
use serde::{Deserialize, Serialize};

/// Where an enum field gets its choices from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "from", rename_all = "camelCase")]
pub enum ChoiceBinding {
    /// The field has no enumeration.
    #[default]
    None,
    /// Author-defined choices, kept in the order written.
    Fixed { choices: Vec<String> },
    /// The configured choice list of `field` in reference source `source`.
    ChoiceList { source: String, field: String },
    /// The values of `attribute` across the live records of `source`.
    RecordAttribute { source: String, attribute: String },
}

impl ChoiceBinding {
    pub fn is_dynamic(&self) -> bool {
        matches!(
            self,
            ChoiceBinding::ChoiceList { .. } | ChoiceBinding::RecordAttribute { .. }
        )
    }
}

/// A statically declared form field, before reference data is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub choices: ChoiceBinding,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    /// Item properties of an array field. Every item property is required.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<FieldDefinition>,
}

impl FieldDefinition {
    fn new(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            choices: ChoiceBinding::None,
            maximum: None,
            items: Vec::new(),
        }
    }

    pub fn string(name: &str) -> Self {
        Self::new(name, FieldKind::String)
    }

    pub fn integer(name: &str) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    pub fn fixed_enum(name: &str, choices: &[&str]) -> Self {
        Self::new(name, FieldKind::Enum).with_choices(ChoiceBinding::Fixed {
            choices: choices.iter().map(|c| c.to_string()).collect(),
        })
    }

    pub fn choice_list(name: &str, source: &str, field: &str) -> Self {
        Self::new(name, FieldKind::Enum).with_choices(ChoiceBinding::ChoiceList {
            source: source.to_string(),
            field: field.to_string(),
        })
    }

    pub fn record_attribute(name: &str, source: &str, attribute: &str) -> Self {
        Self::new(name, FieldKind::Enum).with_choices(ChoiceBinding::RecordAttribute {
            source: source.to_string(),
            attribute: attribute.to_string(),
        })
    }

    pub fn array(name: &str, items: Vec<FieldDefinition>) -> Self {
        Self {
            items,
            ..Self::new(name, FieldKind::Array)
        }
    }

    pub fn with_choices(mut self, choices: ChoiceBinding) -> Self {
        self.choices = choices;
        self
    }

    pub fn with_maximum(mut self, maximum: f64) -> Self {
        self.maximum = Some(maximum);
        self
    }
}
