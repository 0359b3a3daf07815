//! # Shiji - Conditional Forms and Tracked Automation Dispatch
//!
//! **Shiji** builds the request form for a batch operation on selected
//! records and sends the approved request to a remote automation, tracking
//! every run until it finishes.
//!
//! ## Core Workflow
//!
//! 1.  **Describe the form**: declare fields as `FieldDefinition`s (fixed
//!     choices, or choices bound to reference data) and a `Layout` whose nodes
//!     carry `VisibilityRule`s.
//! 2.  **Synthesize**: resolve the definitions against a `ReferenceCatalog` into
//!     a `Schema`. Dynamic choice lists are deduplicated and sorted. Missing
//!     sources or fields fail with a `ConfigurationError`.
//! 3.  **Edit**: a `FormSession` recomputes visibility and validation after
//!     every change. Hidden fields keep their values.
//! 4.  **Dispatch**: a `Dispatcher` checks the selection and payload, records a
//!     `PENDING` invocation and watches the remote run in the background.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use shiji::prelude::*;
//! use shiji::forms::creative_version;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let snapshot = ReferenceSnapshot::from_file("data/reference.json")?;
//!     let mut form = FormSession::mount(creative_version(), &snapshot.catalog())?;
//!
//!     form.set_value("type", json!("format"));
//!     println!("Shown fields: {:?}", form.visibility().shown_fields());
//!
//!     let endpoint = Arc::new(SimulatedEndpoint::new(2));
//!     let mut dispatcher = Dispatcher::new(endpoint, DispatcherSettings::default());
//!     let selection = vec!["rec123".to_string()];
//!
//!     if form.can_submit(&selection) {
//!         let id = form.submit(&mut dispatcher, &selection)?;
//!         dispatcher.settle().await;
//!         println!("{} -> {}", id, dispatcher.tracker().get(id).unwrap().status());
//!     }
//!     Ok(())
//! }
//! ```

pub mod automation;
pub mod config;
pub mod data;
pub mod error;
pub mod form;
pub mod forms;
pub mod layout;
pub mod prelude;
pub mod schema;
pub mod source;
pub mod trace;
pub mod validation;
pub mod value;
