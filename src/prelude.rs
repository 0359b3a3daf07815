//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the shiji crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use shiji::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let snapshot = ReferenceSnapshot::from_file("path/to/reference.json")?;
//! let form = FormSession::mount(shiji::forms::creative_version(), &snapshot.catalog())?;
//! println!("{}", form.schema().to_json_schema());
//! # Ok(())
//! # }
//! ```

// Schema synthesis
pub use crate::schema::{
    ChoiceBinding, FieldDefinition, FieldKind, FieldSpec, ItemSchema, Schema, SchemaSynthesizer,
    synthesize,
};

// Layout and visibility
pub use crate::layout::{
    Effect, IntoLayout, Layout, LayoutNode, NodeId, RuleTrace, Visibility, VisibilityRule,
    compute_visibility, explain, from_ui_schema,
};

// Form state, sessions and validation
pub use crate::form::{FormDefinition, FormSession, FormState};
pub use crate::validation::{ValidationIssue, ValidationResult, validate};

// Reference data
pub use crate::data::{ReferenceRecord, ReferenceSnapshot, ReferenceTable};
pub use crate::source::{ReferenceCatalog, ReferenceSource, SelectionSource};

// Automation dispatch and tracking
pub use crate::automation::{
    AutomationEndpoint, AutomationInvocation, AutomationRequest, Dispatcher, InvocationId,
    InvocationStatus, InvocationTracker, RemoteRunId, RemoteStatus, SimulatedEndpoint,
    StatusSummary, StatusUpdate, UpdateOutcome, UpdateSender,
};

// Configuration
pub use crate::config::{DispatcherSettings, Settings};

// Error types
pub use crate::error::{ConfigurationError, DataError, EndpointError, PreconditionError};

// Trace formatting
pub use crate::trace::TraceFormatter;

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
