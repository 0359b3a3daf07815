use super::invocation::{AutomationInvocation, InvocationId, InvocationStatus};
use ahash::AHashMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// A status notification for one invocation, as delivered by a watcher or
/// pushed by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub invocation_id: InvocationId,
    pub status: InvocationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub at: DateTime<Utc>,
}

impl StatusUpdate {
    pub fn new(invocation_id: InvocationId, status: InvocationStatus) -> Self {
        Self {
            invocation_id,
            status,
            error: None,
            at: Utc::now(),
        }
    }

    pub fn running(invocation_id: InvocationId) -> Self {
        Self::new(invocation_id, InvocationStatus::Running)
    }

    pub fn succeeded(invocation_id: InvocationId) -> Self {
        Self::new(invocation_id, InvocationStatus::Succeeded)
    }

    pub fn failed(invocation_id: InvocationId, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::new(invocation_id, InvocationStatus::Failed)
        }
    }
}

/// What applying a [`StatusUpdate`] did to the tracked list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Applied {
        id: InvocationId,
        from: InvocationStatus,
        to: InvocationStatus,
    },
    /// The update would not move the invocation forward and was dropped.
    Ignored {
        id: InvocationId,
        current: InvocationStatus,
    },
    UnknownInvocation(InvocationId),
    /// The watcher stopped observing the run before it finished.
    Abandoned(InvocationId),
}

/// Counts of tracked invocations per status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StatusSummary {
    pub pending: usize,
    pub running: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Append-only list of invocations in dispatch order.
///
/// Entries are never removed or replaced; status displays read it through
/// [`InvocationTracker::invocations`].
#[derive(Debug, Default)]
pub struct InvocationTracker {
    invocations: Vec<AutomationInvocation>,
    index: AHashMap<InvocationId, usize>,
}

impl InvocationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn append(&mut self, invocation: AutomationInvocation) -> InvocationId {
        let id = invocation.id();
        self.index.insert(id, self.invocations.len());
        self.invocations.push(invocation);
        id
    }

    pub fn invocations(&self) -> &[AutomationInvocation] {
        &self.invocations
    }

    pub fn get(&self, id: InvocationId) -> Option<&AutomationInvocation> {
        self.index.get(&id).map(|&i| &self.invocations[i])
    }

    pub fn len(&self) -> usize {
        self.invocations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invocations.is_empty()
    }

    /// True when no invocation is still waiting on its watcher.
    pub fn is_settled(&self) -> bool {
        self.invocations
            .iter()
            .all(|inv| inv.status().is_terminal() || inv.is_abandoned())
    }

    pub fn summary(&self) -> StatusSummary {
        let mut summary = StatusSummary::default();
        for invocation in &self.invocations {
            match invocation.status() {
                InvocationStatus::Pending => summary.pending += 1,
                InvocationStatus::Running => summary.running += 1,
                InvocationStatus::Succeeded => summary.succeeded += 1,
                InvocationStatus::Failed => summary.failed += 1,
            }
        }
        summary
    }

    /// Applies one update by invocation id. Unknown ids and backward or
    /// repeated transitions are logged and otherwise ignored.
    pub fn apply(&mut self, update: &StatusUpdate) -> UpdateOutcome {
        let id = update.invocation_id;
        let Some(&position) = self.index.get(&id) else {
            warn!(invocation = %id, status = %update.status, "status update for unknown invocation ignored");
            return UpdateOutcome::UnknownInvocation(id);
        };
        let invocation = &mut self.invocations[position];

        match invocation.advance(update.status, update.error.clone(), update.at) {
            Some(from) => {
                if update.status.is_terminal() {
                    info!(
                        invocation = %id,
                        status = %update.status,
                        error = update.error.as_deref().unwrap_or(""),
                        "invocation finished"
                    );
                } else {
                    debug!(invocation = %id, from = %from, to = %update.status, "invocation advanced");
                }
                UpdateOutcome::Applied {
                    id,
                    from,
                    to: update.status,
                }
            }
            None => {
                debug!(
                    invocation = %id,
                    current = %invocation.status(),
                    received = %update.status,
                    "non-advancing status update ignored"
                );
                UpdateOutcome::Ignored {
                    id,
                    current: invocation.status(),
                }
            }
        }
    }

    pub(crate) fn abandon(&mut self, id: InvocationId) -> UpdateOutcome {
        match self.index.get(&id) {
            Some(&position) => {
                let invocation = &mut self.invocations[position];
                if !invocation.status().is_terminal() {
                    warn!(invocation = %id, status = %invocation.status(), "watcher gave up on invocation");
                    invocation.abandon();
                }
                UpdateOutcome::Abandoned(id)
            }
            None => UpdateOutcome::UnknownInvocation(id),
        }
    }
}
