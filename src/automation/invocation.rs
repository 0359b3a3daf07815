use crate::form::FormState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

/// Identifies one dispatched invocation for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvocationId(Uuid);

impl InvocationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InvocationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InvocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of an invocation. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvocationStatus {
    /// Created locally, not yet acknowledged by the remote endpoint.
    Pending,
    /// Accepted by the remote endpoint and executing.
    Running,
    Succeeded,
    Failed,
}

impl InvocationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Running => 1,
            Self::Succeeded | Self::Failed => 2,
        }
    }

    /// Whether moving from `self` to `next` is a forward transition.
    pub fn can_advance_to(&self, next: InvocationStatus) -> bool {
        next.rank() > self.rank()
    }
}

impl fmt::Display for InvocationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "PENDING",
            Self::Running => "RUNNING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
        };
        write!(f, "{}", name)
    }
}

/// One submitted automation request together with its tracked status.
///
/// The payload and targets are fixed at creation. Only the tracker moves
/// the status forward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomationInvocation {
    id: InvocationId,
    path: String,
    target_record_ids: BTreeSet<String>,
    payload: FormState,
    status: InvocationStatus,
    created_at: DateTime<Utc>,
    last_updated_at: DateTime<Utc>,
    error: Option<String>,
    abandoned: bool,
}

impl AutomationInvocation {
    pub(crate) fn pending(path: &str, target_record_ids: BTreeSet<String>, payload: FormState) -> Self {
        let now = Utc::now();
        Self {
            id: InvocationId::new(),
            path: path.to_string(),
            target_record_ids,
            payload,
            status: InvocationStatus::Pending,
            created_at: now,
            last_updated_at: now,
            error: None,
            abandoned: false,
        }
    }

    pub fn id(&self) -> InvocationId {
        self.id
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn target_record_ids(&self) -> &BTreeSet<String> {
        &self.target_record_ids
    }

    pub fn payload(&self) -> &FormState {
        &self.payload
    }

    pub fn status(&self) -> InvocationStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_updated_at(&self) -> DateTime<Utc> {
        self.last_updated_at
    }

    /// Failure detail reported by the remote side, if the invocation failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True once the watcher stopped observing a run that never finished.
    pub fn is_abandoned(&self) -> bool {
        self.abandoned
    }

    /// Moves the status forward. Returns the previous status, or `None` when
    /// `next` would not advance the invocation.
    pub(crate) fn advance(
        &mut self,
        next: InvocationStatus,
        error: Option<String>,
        at: DateTime<Utc>,
    ) -> Option<InvocationStatus> {
        if !self.status.can_advance_to(next) {
            return None;
        }
        let previous = self.status;
        self.status = next;
        self.last_updated_at = at.max(self.last_updated_at);
        if next == InvocationStatus::Failed {
            self.error = error;
        }
        Some(previous)
    }

    pub(crate) fn abandon(&mut self) {
        self.abandoned = true;
    }
}
