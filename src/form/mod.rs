//! A mounted form: schema, layout and state kept consistent on every change.

pub mod state;

pub use state::*;

use crate::automation::{Dispatcher, InvocationId};
use crate::error::{ConfigurationError, PreconditionError};
use crate::layout::{Layout, RuleTrace, Visibility, compute_visibility, explain};
use crate::schema::{FieldDefinition, Schema, synthesize};
use crate::source::{ReferenceCatalog, SelectionSource};
use crate::validation::{ValidationResult, validate};
use serde_json::Value;
use tracing::debug;

/// Everything static about a form: its fields, layout and target endpoint.
#[derive(Debug, Clone)]
pub struct FormDefinition {
    pub name: String,
    pub fields: Vec<FieldDefinition>,
    pub layout: Layout,
    /// Path of the remote automation the form submits to.
    pub endpoint_path: String,
}

/// A form bound to live reference data and the operator's current input.
///
/// Visibility and validation are recomputed eagerly after every mutation.
/// Hiding a field never clears its value.
#[derive(Debug, Clone)]
pub struct FormSession {
    definition: FormDefinition,
    schema: Schema,
    state: FormState,
    visibility: Visibility,
    validation: ValidationResult,
}

impl FormSession {
    /// Synthesizes the schema, checks the layout against it and starts from
    /// an empty state.
    pub fn mount(
        definition: FormDefinition,
        catalog: &ReferenceCatalog<'_>,
    ) -> Result<Self, ConfigurationError> {
        let schema = synthesize(&definition.fields, catalog)?;
        definition.layout.check(&schema)?;
        let mut session = Self {
            definition,
            schema,
            state: FormState::new(),
            visibility: Visibility::default(),
            validation: ValidationResult::default(),
        };
        session.recompute();
        Ok(session)
    }

    /// Rebuilds the schema from changed reference data.
    ///
    /// The schema is swapped whole and only when synthesis and the layout
    /// check both succeed; on error the session is left as it was.
    pub fn refresh(&mut self, catalog: &ReferenceCatalog<'_>) -> Result<(), ConfigurationError> {
        let schema = synthesize(&self.definition.fields, catalog)?;
        self.definition.layout.check(&schema)?;
        self.schema = schema;
        self.recompute();
        Ok(())
    }

    pub fn set_value(&mut self, field: &str, value: Value) {
        self.state.set(field, value);
        self.recompute();
    }

    pub fn clear_value(&mut self, field: &str) {
        self.state.remove(field);
        self.recompute();
    }

    pub fn replace_state(&mut self, state: FormState) {
        self.state = state;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.visibility = compute_visibility(&self.definition.layout, &self.state);
        self.validation = validate(&self.schema, &self.state);
        debug!(
            form = %self.definition.name,
            shown = self.visibility.shown_fields().len(),
            issues = self.validation.len(),
            "form recomputed"
        );
    }

    pub fn definition(&self) -> &FormDefinition {
        &self.definition
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn visibility(&self) -> &Visibility {
        &self.visibility
    }

    pub fn validation(&self) -> &ValidationResult {
        &self.validation
    }

    pub fn explain(&self) -> Vec<RuleTrace> {
        explain(&self.definition.layout, &self.state)
    }

    /// Submission needs a selection and a state free of validation issues,
    /// including issues on fields that are currently hidden.
    pub fn can_submit<S: SelectionSource + ?Sized>(&self, selection: &S) -> bool {
        !selection.selected_record_ids().is_empty() && self.validation.is_valid()
    }

    /// Dispatches a snapshot of the current state for the selected records.
    pub fn submit<S: SelectionSource + ?Sized>(
        &self,
        dispatcher: &mut Dispatcher,
        selection: &S,
    ) -> Result<InvocationId, PreconditionError> {
        dispatcher.dispatch(
            &self.definition.endpoint_path,
            &self.schema,
            selection.selected_record_ids(),
            &self.state,
        )
    }
}
