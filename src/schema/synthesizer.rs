use super::definition::{ChoiceBinding, FieldDefinition};
use super::field::{FieldKind, FieldSpec, ItemSchema, Schema};
use crate::error::ConfigurationError;
use crate::source::ReferenceCatalog;
use crate::value::choice_label;
use ahash::AHashSet;
use itertools::Itertools;
use tracing::debug;

/// Builds a [`Schema`] by resolving static field definitions against live
/// reference data.
///
/// Synthesis is a pure transformation. Run it again whenever the reference
/// sources change; choice lists grow and shrink as records are edited.
pub struct SchemaSynthesizer<'a> {
    definitions: &'a [FieldDefinition],
    catalog: &'a ReferenceCatalog<'a>,
}

impl<'a> SchemaSynthesizer<'a> {
    pub fn new(definitions: &'a [FieldDefinition], catalog: &'a ReferenceCatalog<'a>) -> Self {
        Self {
            definitions,
            catalog,
        }
    }

    pub fn synthesize(&self) -> Result<Schema, ConfigurationError> {
        let fields = self.synthesize_fields(self.definitions)?;
        debug!(fields = fields.len(), "synthesized form schema");
        Ok(Schema { fields })
    }

    fn synthesize_fields(
        &self,
        definitions: &[FieldDefinition],
    ) -> Result<Vec<FieldSpec>, ConfigurationError> {
        let mut seen = AHashSet::new();
        definitions
            .iter()
            .map(|definition| {
                if !seen.insert(definition.name.as_str()) {
                    return Err(ConfigurationError::DuplicateField(definition.name.clone()));
                }
                self.synthesize_field(definition)
            })
            .collect()
    }

    fn synthesize_field(&self, definition: &FieldDefinition) -> Result<FieldSpec, ConfigurationError> {
        let invalid = |message: &str| ConfigurationError::InvalidDefinition {
            field: definition.name.clone(),
            kind: definition.kind.to_string(),
            message: message.to_string(),
        };

        // Reject definitions whose kind disagrees with their bindings or items
        match definition.kind {
            FieldKind::Enum if definition.choices == ChoiceBinding::None => {
                return Err(invalid("has no choice binding"));
            }
            FieldKind::String | FieldKind::Integer | FieldKind::Array
                if definition.choices != ChoiceBinding::None =>
            {
                return Err(invalid("carries a choice binding"));
            }
            FieldKind::Array if definition.items.is_empty() => {
                return Err(ConfigurationError::MissingItems(definition.name.clone()));
            }
            FieldKind::String | FieldKind::Integer | FieldKind::Enum
                if !definition.items.is_empty() =>
            {
                return Err(invalid("declares item properties"));
            }
            _ => {}
        }

        // Choices are read from the live sources on every synthesis
        let enumeration = match &definition.choices {
            ChoiceBinding::None => None,
            binding => Some(self.resolve_choices(&definition.name, binding)?),
        };

        // Item properties go through the same rules and are all required
        let items = if definition.kind == FieldKind::Array {
            let properties = self.synthesize_fields(&definition.items)?;
            let required = properties.iter().map(|p| p.name.clone()).collect();
            Some(Box::new(ItemSchema {
                properties,
                required,
            }))
        } else {
            None
        };

        Ok(FieldSpec {
            name: definition.name.clone(),
            kind: definition.kind,
            enumeration,
            maximum: definition.maximum,
            items,
        })
    }

    fn resolve_choices(
        &self,
        field: &str,
        binding: &ChoiceBinding,
    ) -> Result<Vec<String>, ConfigurationError> {
        let choices = match binding {
            ChoiceBinding::None => Vec::new(),
            // Author order is kept, so duplicates are a definition error
            ChoiceBinding::Fixed { choices } => {
                if let Some(duplicate) = choices.iter().duplicates().next() {
                    return Err(ConfigurationError::DuplicateChoice {
                        field: field.to_string(),
                        value: duplicate.clone(),
                    });
                }
                choices.clone()
            }
            ChoiceBinding::ChoiceList {
                source,
                field: list,
            } => {
                let raw = self
                    .catalog
                    .get(source)
                    .ok_or_else(|| ConfigurationError::SourceNotFound(source.clone()))?
                    .choice_list(list)
                    .ok_or_else(|| ConfigurationError::ChoiceListNotFound {
                        source_name: source.clone(),
                        field: list.clone(),
                    })?;
                normalize_choices(raw)
            }
            ChoiceBinding::RecordAttribute { source, attribute } => {
                let raw = self
                    .catalog
                    .get(source)
                    .ok_or_else(|| ConfigurationError::SourceNotFound(source.clone()))?
                    .distinct_values(attribute)
                    .ok_or_else(|| ConfigurationError::AttributeNotFound {
                        source_name: source.clone(),
                        attribute: attribute.clone(),
                    })?;
                normalize_choices(raw.iter().filter_map(choice_label).collect())
            }
        };

        if choices.is_empty() {
            return Err(ConfigurationError::EmptyChoices(field.to_string()));
        }
        Ok(choices)
    }
}

/// Deduplicates and sorts raw reference values into a stable choice list.
pub fn normalize_choices(raw: Vec<String>) -> Vec<String> {
    raw.into_iter().sorted().dedup().collect()
}

/// Convenience wrapper around [`SchemaSynthesizer`].
pub fn synthesize(
    definitions: &[FieldDefinition],
    catalog: &ReferenceCatalog<'_>,
) -> Result<Schema, ConfigurationError> {
    SchemaSynthesizer::new(definitions, catalog).synthesize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_choices() {
        let raw = vec!["b".to_string(), "a".to_string(), "a".to_string()];
        assert_eq!(normalize_choices(raw), vec!["a", "b"]);
    }

    #[test]
    fn test_fixed_choices_keep_author_order() {
        let defs = vec![FieldDefinition::fixed_enum("type", &["simple", "medium", "format"])];
        let catalog = ReferenceCatalog::new();
        let schema = synthesize(&defs, &catalog).unwrap();
        assert_eq!(
            schema.field("type").unwrap().enumeration.as_deref(),
            Some(&["simple".to_string(), "medium".to_string(), "format".to_string()][..])
        );
    }

    #[test]
    fn test_enum_without_binding_is_rejected() {
        let mut def = FieldDefinition::string("mode");
        def.kind = FieldKind::Enum;
        let catalog = ReferenceCatalog::new();
        assert!(matches!(
            synthesize(&[def], &catalog),
            Err(ConfigurationError::InvalidDefinition { .. })
        ));
    }
}
