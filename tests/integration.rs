//! End-to-end tests: reference data to schema, form edits to visibility,
//! and submission to tracked invocations.
mod common;
use common::*;
use serde_json::json;
use shiji::prelude::*;

#[tokio::test]
async fn test_format_version_end_to_end() {
    let snapshot = create_reference_snapshot();
    let mut form = FormSession::mount(shiji::forms::creative_version(), &snapshot.catalog())
        .expect("Failed to mount form");

    let items = form.schema().field("blocks").unwrap().items.clone().unwrap();
    assert_eq!(
        items.property("category").unwrap().enumeration,
        Some(vec!["Color".to_string(), "Format".to_string()])
    );

    form.set_value("type", json!("format"));
    let visibility = form.visibility();
    assert!(visibility.is_shown("section:blocks"));
    assert!(visibility.is_shown("field:blocks"));
    assert!(!visibility.is_shown("field:headline"));
    assert!(!visibility.is_shown("field:visual"));

    form.set_value("blocks", json!([valid_block()]));
    assert!(form.validation().is_valid(), "{:?}", form.validation());

    let selection = vec!["recCreative1".to_string()];
    assert!(form.can_submit(&selection));

    let (mut dispatcher, endpoint) = create_dispatcher(SimulatedEndpoint::new(2));
    let id = form.submit(&mut dispatcher, &selection).expect("Failed to submit");

    let tracker = dispatcher.tracker();
    assert_eq!(tracker.len(), 1);
    let invocation = tracker.get(id).unwrap();
    assert_eq!(invocation.status(), InvocationStatus::Pending);
    assert_eq!(invocation.path(), "/creative/create-version");
    assert_eq!(
        invocation.target_record_ids().iter().collect::<Vec<_>>(),
        vec!["recCreative1"]
    );

    dispatcher.settle().await;
    assert_eq!(dispatcher.tracker().get(id).unwrap().status(), InvocationStatus::Succeeded);

    let submitted = endpoint.submitted().await;
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].invocation_id, id);
    assert_eq!(submitted[0].payload["blocks"][0]["category"], "Color");
}

#[tokio::test]
async fn test_invalid_block_blocks_submission() {
    let mut form = mount_creative_form();
    form.set_value("type", json!("format"));
    form.set_value(
        "blocks",
        json!([{"name": "Visual", "attribute": "Format", "category": "Texture"}]),
    );

    let paths: Vec<_> = form.validation().iter().map(|i| i.path.as_str()).collect();
    assert_eq!(paths, vec!["/blocks/0", "/blocks/0/category"]);
    assert_eq!(
        form.validation().issues()[0].message,
        "must have required property 'parameter'"
    );

    let selection = vec!["rec1".to_string()];
    assert!(!form.can_submit(&selection));

    let (mut dispatcher, _) = create_dispatcher(SimulatedEndpoint::new(1));
    let result = form.submit(&mut dispatcher, &selection);
    assert!(matches!(result, Err(PreconditionError::InvalidPayload(_))));
    assert!(dispatcher.tracker().is_empty());
}

#[test]
fn test_refresh_swaps_schema_whole() {
    let mut snapshot = create_reference_snapshot();
    let mut form = FormSession::mount(shiji::forms::creative_version(), &snapshot.catalog()).unwrap();
    form.set_value("createdBy", json!("ZZ"));
    assert!(!form.validation().is_valid());

    snapshot
        .table_mut("Creative process")
        .unwrap()
        .choices
        .insert("Created By".to_string(), vec!["ZZ".to_string()]);
    form.refresh(&snapshot.catalog()).expect("Failed to refresh");
    assert!(form.validation().is_valid());
    assert_eq!(form.state().get("createdBy"), Some(&json!("ZZ")));
}

#[test]
fn test_failed_refresh_keeps_previous_schema() {
    let mut snapshot = create_reference_snapshot();
    let mut form = FormSession::mount(shiji::forms::creative_version(), &snapshot.catalog()).unwrap();
    let before = form.schema().clone();

    snapshot.sources.remove("Blocks");
    let result = form.refresh(&snapshot.catalog());
    assert_eq!(result, Err(ConfigurationError::SourceNotFound("Blocks".to_string())));
    assert_eq!(form.schema(), &before);
}

#[test]
fn test_snapshot_json_drives_the_form() {
    let snapshot = ReferenceSnapshot::from_json(
        r#"{
            "sources": {
                "Creative process": {"choices": {"Created By": ["MK"]}},
                "Blocks": {
                    "choices": {"Category": ["Format", "Color", "Color"]},
                    "records": [
                        {"id": "blk1", "fields": {"Parameter": "Ratio"}},
                        {"id": "blk2", "fields": {"Parameter": null}}
                    ]
                }
            }
        }"#,
    )
    .expect("Failed to parse snapshot");

    let form = FormSession::mount(shiji::forms::creative_version(), &snapshot.catalog()).unwrap();
    let items = form.schema().field("blocks").unwrap().items.clone().unwrap();
    assert_eq!(
        items.property("parameter").unwrap().enumeration,
        Some(vec!["Ratio".to_string()])
    );
}
