//! Common test utilities for building reference data, forms and dispatchers.
use serde_json::json;
use shiji::forms::creative_version::{BLOCK_SOURCE, CREATIVE_SOURCE};
use shiji::prelude::*;
use std::sync::Arc;

/// Reference data for the creative-version form.
///
/// Categories are `["Format", "Color", "Color"]`; block parameters are
/// `["Size", "Hue", "Size"]` with one record missing a value.
#[allow(dead_code)]
pub fn create_reference_snapshot() -> ReferenceSnapshot {
    ReferenceSnapshot::default()
        .with_table(
            CREATIVE_SOURCE,
            ReferenceTable::default().with_choices("Created By", &["JD", "AB"]),
        )
        .with_table(
            BLOCK_SOURCE,
            ReferenceTable::default()
                .with_choices("Category", &["Format", "Color", "Color"])
                .with_record("blk1", json!({"Parameter": "Size", "Block": "Visual"}))
                .with_record("blk2", json!({"Parameter": "Hue"}))
                .with_record("blk3", json!({"Parameter": "Size"}))
                .with_record("blk4", json!({"Block": "Visual"})),
        )
}

/// A block entry that satisfies the synthesized item schema.
#[allow(dead_code)]
pub fn valid_block() -> serde_json::Value {
    json!({
        "name": "Visual",
        "attribute": "Format",
        "category": "Color",
        "parameter": "Size"
    })
}

/// Mounts the creative-version form on the default snapshot.
#[allow(dead_code)]
pub fn mount_creative_form() -> FormSession {
    let snapshot = create_reference_snapshot();
    FormSession::mount(shiji::forms::creative_version(), &snapshot.catalog())
        .expect("creative form should mount")
}

/// Settings that poll quickly so tests finish fast.
#[allow(dead_code)]
pub fn fast_settings() -> DispatcherSettings {
    DispatcherSettings {
        poll_interval_ms: 1,
        max_polls: 50,
        request_timeout_ms: 50,
    }
}

#[allow(dead_code)]
pub fn create_dispatcher(endpoint: SimulatedEndpoint) -> (Dispatcher, Arc<SimulatedEndpoint>) {
    let endpoint = Arc::new(endpoint);
    let dispatcher = Dispatcher::new(endpoint.clone(), fast_settings());
    (dispatcher, endpoint)
}
