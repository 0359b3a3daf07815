use super::invocation::InvocationId;
use crate::error::EndpointError;
use ahash::AHashMap;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;

/// What is sent to the remote automation endpoint for one invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomationRequest {
    pub invocation_id: InvocationId,
    pub path: String,
    pub target_record_ids: Vec<String>,
    pub payload: Value,
}

/// Handle the remote side assigns to an accepted request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteRunId(pub String);

impl fmt::Display for RemoteRunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Progress of a remote run as reported by the endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "error", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RemoteStatus {
    Running,
    Succeeded,
    Failed(String),
}

/// The remote service that executes automations.
///
/// The transport is up to the implementation. The dispatcher only submits a
/// request once and then polls the returned run until it finishes.
#[async_trait]
pub trait AutomationEndpoint: Send + Sync {
    async fn submit(&self, request: &AutomationRequest) -> Result<RemoteRunId, EndpointError>;

    async fn status(&self, run: &RemoteRunId) -> Result<RemoteStatus, EndpointError>;
}

/// An in-process endpoint that finishes every run after a fixed number of
/// status polls. Used by the CLI's dry runs and by tests.
pub struct SimulatedEndpoint {
    polls_until_done: u32,
    fail_with: Option<String>,
    reject_with: Option<String>,
    next_run: AtomicU64,
    runs: Mutex<AHashMap<RemoteRunId, u32>>,
    submitted: Mutex<Vec<AutomationRequest>>,
}

impl SimulatedEndpoint {
    pub fn new(polls_until_done: u32) -> Self {
        Self {
            polls_until_done,
            fail_with: None,
            reject_with: None,
            next_run: AtomicU64::new(1),
            runs: Mutex::new(AHashMap::new()),
            submitted: Mutex::new(Vec::new()),
        }
    }

    /// Every run ends in `FAILED` with this message.
    pub fn failing(mut self, message: &str) -> Self {
        self.fail_with = Some(message.to_string());
        self
    }

    /// Every submission is refused with this message.
    pub fn rejecting(mut self, message: &str) -> Self {
        self.reject_with = Some(message.to_string());
        self
    }

    /// Requests received so far, in arrival order.
    pub async fn submitted(&self) -> Vec<AutomationRequest> {
        self.submitted.lock().await.clone()
    }
}

#[async_trait]
impl AutomationEndpoint for SimulatedEndpoint {
    async fn submit(&self, request: &AutomationRequest) -> Result<RemoteRunId, EndpointError> {
        self.submitted.lock().await.push(request.clone());
        if let Some(message) = &self.reject_with {
            return Err(EndpointError::Rejected(message.clone()));
        }
        let run = RemoteRunId(format!("run-{}", self.next_run.fetch_add(1, Ordering::SeqCst)));
        self.runs.lock().await.insert(run.clone(), 0);
        Ok(run)
    }

    async fn status(&self, run: &RemoteRunId) -> Result<RemoteStatus, EndpointError> {
        let mut runs = self.runs.lock().await;
        let polls = runs
            .get_mut(run)
            .ok_or_else(|| EndpointError::UnknownRun(run.to_string()))?;
        *polls += 1;
        if *polls < self.polls_until_done {
            return Ok(RemoteStatus::Running);
        }
        Ok(match &self.fail_with {
            Some(message) => RemoteStatus::Failed(message.clone()),
            None => RemoteStatus::Succeeded,
        })
    }
}
