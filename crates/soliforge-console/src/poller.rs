/*
[INPUT]:  Task feed (detail + logs endpoints), poll interval, CancellationToken
[OUTPUT]: PollEvent stream for the mounted execution view
[POS]:    View layer - task status poller state machine
[UPDATE]: When changing poll cadence, reconciliation, or cancellation behavior
[UPDATE]: 2026-09-14 read shared state on every tick instead of a captured status
*/

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use soliforge_client::{LogEntry, SoliforgeClient, SoliforgeError, Task, TaskStatus};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Read side of the task API used by the poller
#[async_trait]
pub trait TaskFeed: Send + Sync {
    async fn task_detail(&self, task_id: &str) -> soliforge_client::Result<Task>;
    async fn task_logs(&self, task_id: &str) -> soliforge_client::Result<Vec<LogEntry>>;
}

#[async_trait]
impl TaskFeed for SoliforgeClient {
    async fn task_detail(&self, task_id: &str) -> soliforge_client::Result<Task> {
        SoliforgeClient::task_detail(self, task_id).await
    }

    async fn task_logs(&self, task_id: &str) -> soliforge_client::Result<Vec<LogEntry>> {
        SoliforgeClient::task_logs(self, task_id).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollerState {
    /// Nothing to poll (signed out or not mounted)
    Idle,
    /// Last known status is active; every tick fetches
    Polling {
        task_id: String,
        last_status: TaskStatus,
    },
    /// Last known status is terminal or dormant; ticks are skipped
    Stopped {
        task_id: String,
        last_status: TaskStatus,
    },
}

impl PollerState {
    pub fn observe(task_id: impl Into<String>, status: TaskStatus) -> Self {
        let task_id = task_id.into();
        if status.is_active() {
            PollerState::Polling {
                task_id,
                last_status: status,
            }
        } else {
            PollerState::Stopped {
                task_id,
                last_status: status,
            }
        }
    }

    pub fn is_polling(&self) -> bool {
        matches!(self, PollerState::Polling { .. })
    }

    pub fn task_id(&self) -> Option<&str> {
        match self {
            PollerState::Idle => None,
            PollerState::Polling { task_id, .. } | PollerState::Stopped { task_id, .. } => {
                Some(task_id)
            }
        }
    }

    pub fn last_status(&self) -> Option<TaskStatus> {
        match self {
            PollerState::Idle => None,
            PollerState::Polling { last_status, .. }
            | PollerState::Stopped { last_status, .. } => Some(*last_status),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PollEvent {
    /// Full replacement of the view's task and log list
    Snapshot { task: Task, logs: Vec<LogEntry> },
    /// The server rejected the session mid-poll
    Unauthenticated,
}

pub type SharedPollerState = Arc<Mutex<PollerState>>;

fn lock(state: &SharedPollerState) -> MutexGuard<'_, PollerState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One poller bound to a feed and its authoritative state
pub struct TaskPoller<F: ?Sized> {
    feed: Arc<F>,
    state: SharedPollerState,
}

impl<F: TaskFeed + ?Sized> TaskPoller<F> {
    pub fn new(feed: Arc<F>, state: SharedPollerState) -> Self {
        Self { feed, state }
    }

    /// Run one tick against the current state.
    ///
    /// Returns `None` when the tick was skipped or a fetch failed; failures
    /// are logged and the previous snapshot stays on screen. State is left
    /// untouched so the caller can discard the result after cancellation.
    pub async fn fetch(&self) -> Option<PollEvent> {
        let task_id = match &*lock(&self.state) {
            PollerState::Polling { task_id, .. } => task_id.clone(),
            _ => return None,
        };

        let (logs, detail) = tokio::join!(
            self.feed.task_logs(&task_id),
            self.feed.task_detail(&task_id)
        );

        match (logs, detail) {
            (Ok(logs), Ok(task)) => {
                debug!(
                    task_id = %task_id,
                    status = %task.status,
                    log_count = logs.len(),
                    "poll tick fetched snapshot"
                );
                Some(PollEvent::Snapshot { task, logs })
            }
            (logs, detail) => {
                let errors = [logs.err(), detail.err()];
                if errors.iter().flatten().any(SoliforgeError::is_auth_error) {
                    warn!(task_id = %task_id, "poll rejected: session expired");
                    return Some(PollEvent::Unauthenticated);
                }
                for err in errors.into_iter().flatten() {
                    warn!(task_id = %task_id, error = %err, "poll failed; keeping previous snapshot");
                }
                None
            }
        }
    }

    /// Apply a published event to the shared state
    pub fn reconcile(&self, event: &PollEvent) {
        let mut guard = lock(&self.state);
        match event {
            PollEvent::Snapshot { task, .. } => {
                let next = match &*guard {
                    PollerState::Idle => return,
                    PollerState::Polling { task_id, .. } | PollerState::Stopped { task_id, .. } => {
                        PollerState::observe(task_id.clone(), task.status)
                    }
                };
                if !next.is_polling() {
                    debug!(task_id = ?next.task_id(), status = ?next.last_status(), "poller parked");
                }
                *guard = next;
            }
            PollEvent::Unauthenticated => *guard = PollerState::Idle,
        }
    }

    async fn run(
        self,
        interval: Duration,
        shutdown: CancellationToken,
        events: mpsc::UnboundedSender<PollEvent>,
    ) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; the view has just loaded.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let event = tokio::select! {
                _ = shutdown.cancelled() => break,
                event = self.fetch() => event,
            };

            let Some(event) = event else {
                continue;
            };
            if shutdown.is_cancelled() {
                break;
            }

            self.reconcile(&event);
            if events.send(event).is_err() {
                break;
            }
        }

        debug!("task poller stopped");
    }
}

/// Owner of a running poller; dropping it unmounts the poller
#[derive(Debug)]
pub struct PollerHandle {
    state: SharedPollerState,
    shutdown: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl PollerHandle {
    pub fn state(&self) -> PollerState {
        lock(&self.state).clone()
    }

    /// Reconcile after a view-side fetch (start/stop/upload/refresh)
    pub fn observe(&self, task: &Task) {
        *lock(&self.state) = PollerState::observe(task.id.clone(), task.status);
    }

    pub fn set_idle(&self) {
        *lock(&self.state) = PollerState::Idle;
    }

    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Cancel and wait for the poll task to exit
    pub async fn shutdown(mut self) {
        self.shutdown.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(err) = handle.await {
                warn!(error = %err, "task poller join failed");
            }
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Spawn a poller for `task`, seeded from its current status
pub fn spawn_poller<F>(
    feed: Arc<F>,
    task: &Task,
    interval: Duration,
) -> (PollerHandle, mpsc::UnboundedReceiver<PollEvent>)
where
    F: TaskFeed + ?Sized + 'static,
{
    let state: SharedPollerState = Arc::new(Mutex::new(PollerState::observe(
        task.id.clone(),
        task.status,
    )));
    let shutdown = CancellationToken::new();
    let (tx, rx) = mpsc::unbounded_channel();

    let poller = TaskPoller::new(feed, state.clone());
    let handle = tokio::spawn(poller.run(interval, shutdown.clone(), tx));
    debug!(task_id = %task.id, interval_ms = interval.as_millis() as u64, "task poller spawned");

    (
        PollerHandle {
            state,
            shutdown,
            handle: Some(handle),
        },
        rx,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observe_classifies_status() {
        assert!(PollerState::observe("t", TaskStatus::Created).is_polling());
        assert!(PollerState::observe("t", TaskStatus::Running).is_polling());
        for status in [
            TaskStatus::Uploaded,
            TaskStatus::Stopped,
            TaskStatus::Completed,
            TaskStatus::Failed,
        ] {
            let state = PollerState::observe("t", status);
            assert!(!state.is_polling());
            assert_eq!(state.last_status(), Some(status));
            assert_eq!(state.task_id(), Some("t"));
        }
        assert_eq!(PollerState::Idle.task_id(), None);
    }
}
