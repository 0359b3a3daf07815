use crate::validation::ValidationResult;
use thiserror::Error;

/// Errors raised while synthesizing a schema or checking a layout against it.
///
/// These mean the reference data or the form definition has drifted from what
/// the form expects. They abort rendering and must be shown to the operator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Reference source '{0}' is not available")]
    SourceNotFound(String),

    #[error("Choice list for field '{field}' not found in reference source '{source_name}'")]
    ChoiceListNotFound { source_name: String, field: String },

    #[error("Attribute '{attribute}' not found in reference source '{source_name}'")]
    AttributeNotFound {
        source_name: String,
        attribute: String,
    },

    #[error("Field '{0}' resolved to an empty set of choices")]
    EmptyChoices(String),

    #[error("Field '{0}' is declared more than once")]
    DuplicateField(String),

    #[error("Fixed choices of field '{field}' contain '{value}' more than once")]
    DuplicateChoice { field: String, value: String },

    #[error("Field '{field}' is declared as {kind} but {message}")]
    InvalidDefinition {
        field: String,
        kind: String,
        message: String,
    },

    #[error("Array field '{0}' has no item definitions")]
    MissingItems(String),

    #[error("Layout node '{node_id}' references unknown field '{field}'")]
    UnknownFieldRef { node_id: String, field: String },

    #[error("Visibility rule on node '{node_id}' depends on unknown field '{field}'")]
    UnknownRuleField { node_id: String, field: String },

    #[error("Layout node id '{0}' is used more than once")]
    DuplicateNodeId(String),

    #[error("Invalid UI schema: {0}")]
    InvalidUiSchema(String),
}

/// Reasons a dispatch is refused before anything is sent to the remote endpoint.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PreconditionError {
    #[error("No target records are selected")]
    NoTargets,

    #[error("Payload has {} validation error(s)", .0.len())]
    InvalidPayload(ValidationResult),

    #[error("No async runtime is available to watch the invocation")]
    NoRuntime,
}

/// Errors reported by a remote automation endpoint.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EndpointError {
    #[error("Remote endpoint rejected the request: {0}")]
    Rejected(String),

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Remote run '{0}' is not known to the endpoint")]
    UnknownRun(String),
}

/// Errors raised while loading snapshots, settings or form state from disk.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Could not read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}
