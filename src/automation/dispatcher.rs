use super::endpoint::{AutomationEndpoint, AutomationRequest, RemoteStatus};
use super::invocation::{AutomationInvocation, InvocationId};
use super::tracker::{InvocationTracker, StatusUpdate, UpdateOutcome};
use crate::config::DispatcherSettings;
use crate::error::PreconditionError;
use crate::form::FormState;
use crate::schema::Schema;
use crate::validation::validate;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::time;
use tracing::{debug, error, info, warn};

#[derive(Debug)]
enum TrackerEvent {
    Status(StatusUpdate),
    Abandoned(InvocationId),
}

/// Feeds status notifications into a dispatcher's update queue.
///
/// Watchers hold one of these; hosts that receive pushed notifications can
/// obtain one with [`Dispatcher::update_sender`].
#[derive(Debug, Clone)]
pub struct UpdateSender {
    tx: mpsc::UnboundedSender<TrackerEvent>,
}

impl UpdateSender {
    /// Queues an update. Returns false once the dispatcher is gone.
    pub fn send(&self, update: StatusUpdate) -> bool {
        self.send_event(TrackerEvent::Status(update))
    }

    fn send_event(&self, event: TrackerEvent) -> bool {
        match self.tx.send(event) {
            Ok(()) => true,
            Err(e) => {
                debug!(event = ?e.0, "dispatcher dropped, update discarded");
                false
            }
        }
    }
}

/// Submits automation requests and owns the list of tracked invocations.
///
/// `dispatch` never blocks on the remote side: it records a `PENDING`
/// invocation and hands the remote conversation to a spawned watcher task.
/// Watchers report back through a single queue; the owner applies queued
/// updates in arrival order with [`next_update`](Self::next_update) or
/// [`drain_updates`](Self::drain_updates). Dispatching needs a current
/// tokio runtime.
pub struct Dispatcher {
    endpoint: Arc<dyn AutomationEndpoint>,
    settings: DispatcherSettings,
    tracker: InvocationTracker,
    sender: UpdateSender,
    rx: mpsc::UnboundedReceiver<TrackerEvent>,
}

impl Dispatcher {
    pub fn new(endpoint: Arc<dyn AutomationEndpoint>, settings: DispatcherSettings) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            endpoint,
            settings,
            tracker: InvocationTracker::new(),
            sender: UpdateSender { tx },
            rx,
        }
    }

    /// Read-only view of every invocation dispatched in this session.
    pub fn tracker(&self) -> &InvocationTracker {
        &self.tracker
    }

    pub fn update_sender(&self) -> UpdateSender {
        self.sender.clone()
    }

    /// Creates and tracks one new invocation, then starts watching it.
    ///
    /// Refuses with [`PreconditionError`] when no target is given, the
    /// payload does not satisfy `schema`, or no tokio runtime is current;
    /// nothing is tracked or sent then. Identical repeated calls create
    /// distinct invocations.
    pub fn dispatch<I, S>(
        &mut self,
        path: &str,
        schema: &Schema,
        target_record_ids: I,
        payload: &FormState,
    ) -> Result<InvocationId, PreconditionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let targets: BTreeSet<String> = target_record_ids.into_iter().map(Into::into).collect();
        if targets.is_empty() {
            return Err(PreconditionError::NoTargets);
        }
        let issues = validate(schema, payload);
        if !issues.is_valid() {
            return Err(PreconditionError::InvalidPayload(issues));
        }
        let runtime = Handle::try_current().map_err(|_| PreconditionError::NoRuntime)?;

        let invocation = AutomationInvocation::pending(path, targets, payload.clone());
        let request = AutomationRequest {
            invocation_id: invocation.id(),
            path: path.to_string(),
            target_record_ids: invocation.target_record_ids().iter().cloned().collect(),
            payload: payload.to_value(),
        };
        let id = self.tracker.append(invocation);
        info!(
            invocation = %id,
            path,
            targets = request.target_record_ids.len(),
            "automation dispatched"
        );

        runtime.spawn(supervise(
            Arc::clone(&self.endpoint),
            request,
            self.settings.clone(),
            self.sender.clone(),
        ));
        Ok(id)
    }

    /// Waits for the next queued event and applies it.
    pub async fn next_update(&mut self) -> Option<UpdateOutcome> {
        let event = self.rx.recv().await?;
        Some(self.apply(event))
    }

    /// Applies every event already queued, without waiting.
    pub fn drain_updates(&mut self) -> Vec<UpdateOutcome> {
        let mut outcomes = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            outcomes.push(self.apply(event));
        }
        outcomes
    }

    /// Applies updates until every invocation is finished or abandoned.
    pub async fn settle(&mut self) {
        while !self.tracker.is_settled() {
            if self.next_update().await.is_none() {
                break;
            }
        }
    }

    fn apply(&mut self, event: TrackerEvent) -> UpdateOutcome {
        match event {
            TrackerEvent::Status(update) => self.tracker.apply(&update),
            TrackerEvent::Abandoned(id) => self.tracker.abandon(id),
        }
    }
}

/// Runs the watcher as its own task so a panic inside the endpoint still
/// ends the invocation as `FAILED`.
async fn supervise(
    endpoint: Arc<dyn AutomationEndpoint>,
    request: AutomationRequest,
    settings: DispatcherSettings,
    sender: UpdateSender,
) {
    let id = request.invocation_id;
    let watcher = tokio::spawn(watch(endpoint, request, settings, sender.clone()));
    if let Err(e) = watcher.await {
        error!(invocation = %id, error = %e, "invocation watcher stopped unexpectedly");
        sender.send(StatusUpdate::failed(id, e.to_string()));
    }
}

/// Drives one remote run: submit, then poll until a terminal status.
///
/// Every endpoint call is bounded by `request_timeout`. The watcher always
/// ends with a terminal update or an abandonment.
async fn watch(
    endpoint: Arc<dyn AutomationEndpoint>,
    request: AutomationRequest,
    settings: DispatcherSettings,
    sender: UpdateSender,
) {
    let id = request.invocation_id;
    let limit = settings.request_timeout();

    // Submitted once only; the remote side may have accepted a timed-out call
    let run = match time::timeout(limit, endpoint.submit(&request)).await {
        Ok(Ok(run)) => run,
        Ok(Err(e)) => {
            warn!(invocation = %id, error = %e, "automation submission failed");
            sender.send(StatusUpdate::failed(id, e.to_string()));
            return;
        }
        Err(_) => {
            warn!(
                invocation = %id,
                timeout_ms = settings.request_timeout_ms,
                "automation submission timed out, abandoning"
            );
            sender.send_event(TrackerEvent::Abandoned(id));
            return;
        }
    };
    debug!(invocation = %id, run = %run, "remote run accepted");
    sender.send(StatusUpdate::running(id));

    // Poll until the run finishes or the poll budget runs out
    let mut polls = 0u32;
    loop {
        if settings.max_polls > 0 && polls >= settings.max_polls {
            warn!(invocation = %id, run = %run, polls, "remote run did not finish, abandoning");
            sender.send_event(TrackerEvent::Abandoned(id));
            return;
        }
        time::sleep(settings.poll_interval()).await;
        polls += 1;

        let update = match time::timeout(limit, endpoint.status(&run)).await {
            // A hung poll counts like an unfinished one
            Err(_) => {
                debug!(invocation = %id, run = %run, polls, "status poll timed out");
                continue;
            }
            Ok(Ok(RemoteStatus::Running)) => continue,
            Ok(Ok(RemoteStatus::Succeeded)) => StatusUpdate::succeeded(id),
            Ok(Ok(RemoteStatus::Failed(message))) => StatusUpdate::failed(id, message),
            Ok(Err(e)) => StatusUpdate::failed(id, e.to_string()),
        };
        sender.send(update);
        return;
    }
}
