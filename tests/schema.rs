//! Tests for schema synthesis from static definitions and reference data.
mod common;
use common::*;
use serde_json::json;
use shiji::prelude::*;

#[test]
fn test_reference_choices_are_deduplicated_and_sorted() {
    let snapshot = create_reference_snapshot();
    let schema = synthesize(&shiji::forms::creative_version::fields(), &snapshot.catalog())
        .expect("Failed to synthesize");

    let items = schema.field("blocks").unwrap().items.as_ref().unwrap();
    assert_eq!(
        items.property("category").unwrap().enumeration,
        Some(vec!["Color".to_string(), "Format".to_string()])
    );
    assert_eq!(
        items.property("parameter").unwrap().enumeration,
        Some(vec!["Hue".to_string(), "Size".to_string()])
    );
    assert_eq!(items.required, vec!["name", "attribute", "category", "parameter"]);
}

#[test]
fn test_choice_list_order_does_not_matter() {
    let defs = vec![FieldDefinition::choice_list("letter", "Letters", "Letter")];
    let forward = ReferenceTable::default().with_choices("Letter", &["b", "a", "a"]);
    let backward = ReferenceTable::default().with_choices("Letter", &["a", "a", "b"]);

    let first = synthesize(&defs, &ReferenceCatalog::new().with_source("Letters", &forward)).unwrap();
    let second =
        synthesize(&defs, &ReferenceCatalog::new().with_source("Letters", &backward)).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        first.field("letter").unwrap().enumeration,
        Some(vec!["a".to_string(), "b".to_string()])
    );
}

#[test]
fn test_fixed_enum_keeps_author_order() {
    let snapshot = create_reference_snapshot();
    let schema = synthesize(&shiji::forms::creative_version::fields(), &snapshot.catalog()).unwrap();
    assert_eq!(
        schema.field("type").unwrap().enumeration,
        Some(vec![
            "simple".to_string(),
            "medium".to_string(),
            "radical".to_string(),
            "format".to_string()
        ])
    );
}

#[test]
fn test_missing_source_is_a_configuration_error() {
    let snapshot = ReferenceSnapshot::default().with_table(
        "Creative process",
        ReferenceTable::default().with_choices("Created By", &["JD"]),
    );
    let result = synthesize(&shiji::forms::creative_version::fields(), &snapshot.catalog());
    assert_eq!(
        result.unwrap_err(),
        ConfigurationError::SourceNotFound("Blocks".to_string())
    );
}

#[test]
fn test_missing_choice_list_is_a_configuration_error() {
    let mut snapshot = create_reference_snapshot();
    snapshot.table_mut("Creative process").unwrap().choices.clear();

    match synthesize(&shiji::forms::creative_version::fields(), &snapshot.catalog()) {
        Err(ConfigurationError::ChoiceListNotFound { source_name, field }) => {
            assert_eq!(source_name, "Creative process");
            assert_eq!(field, "Created By");
        }
        other => panic!("Expected ChoiceListNotFound, got {:?}", other),
    }
}

#[test]
fn test_missing_attribute_is_a_configuration_error() {
    let defs = vec![FieldDefinition::record_attribute("parameter", "Blocks", "Parameter")];
    let table = ReferenceTable::default().with_record("blk1", json!({"Block": "Visual"}));
    let result = synthesize(&defs, &ReferenceCatalog::new().with_source("Blocks", &table));
    assert!(matches!(
        result,
        Err(ConfigurationError::AttributeNotFound { .. })
    ));
}

#[test]
fn test_empty_reference_choices_are_rejected() {
    let defs = vec![FieldDefinition::record_attribute("parameter", "Blocks", "Parameter")];
    let table = ReferenceTable::default().with_attribute("Parameter");
    let result = synthesize(&defs, &ReferenceCatalog::new().with_source("Blocks", &table));
    assert_eq!(
        result.unwrap_err(),
        ConfigurationError::EmptyChoices("parameter".to_string())
    );
}

#[test]
fn test_duplicate_fields_are_rejected() {
    let defs = vec![FieldDefinition::string("headline"), FieldDefinition::string("headline")];
    let result = synthesize(&defs, &ReferenceCatalog::new());
    assert_eq!(
        result.unwrap_err(),
        ConfigurationError::DuplicateField("headline".to_string())
    );
}

#[test]
fn test_schema_follows_reference_changes() {
    let mut snapshot = create_reference_snapshot();
    let defs = shiji::forms::creative_version::fields();
    let before = synthesize(&defs, &snapshot.catalog()).unwrap();

    snapshot
        .table_mut("Blocks")
        .unwrap()
        .records
        .push(ReferenceRecord {
            id: "blk9".to_string(),
            fields: json!({"Parameter": "Angle"}).as_object().unwrap().clone(),
        });
    let after = synthesize(&defs, &snapshot.catalog()).unwrap();

    let parameters = |schema: &Schema| {
        let items = schema.field("blocks").unwrap().items.as_ref().unwrap();
        items.property("parameter").unwrap().enumeration.clone().unwrap()
    };
    assert_eq!(parameters(&before), vec!["Hue", "Size"]);
    assert_eq!(parameters(&after), vec!["Angle", "Hue", "Size"]);
}

#[test]
fn test_json_schema_export() {
    let form = mount_creative_form();
    let json = form.schema().to_json_schema();
    assert_eq!(json["properties"]["type"]["enum"], json!(["simple", "medium", "radical", "format"]));
    assert_eq!(json["properties"]["createdBy"]["enum"], json!(["AB", "JD"]));
    assert_eq!(json["properties"]["blocks"]["type"], "array");
    assert_eq!(
        json["properties"]["blocks"]["items"]["required"],
        json!(["name", "attribute", "category", "parameter"])
    );
}
