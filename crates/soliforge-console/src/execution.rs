/*
[INPUT]:  SoliforgeClient, task id, poll settings, PollEvents from the mounted poller
[OUTPUT]: Task snapshot, log list, elapsed clock and action state for one task
[POS]:    View layer - execution view model (owns the poller and the elapsed ticker)
[UPDATE]: When changing execution actions, placeholders, or poll wiring
*/

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use soliforge_client::{LogEntry, SoliforgeClient, Task, TaskStatus};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::alert::{LOAD_TASK_FALLBACK, ViewError};
use crate::config::PollConfig;
use crate::elapsed::{self, ElapsedTicker};
use crate::matrix::MatrixSummary;
use crate::poller::{PollEvent, PollerHandle, PollerState, spawn_poller};

pub const NO_V1_CODE: &str = "// No V1 code";
pub const NO_V2_CODE: &str = "// No V2 code (Fixing...)";
pub const WAITING_FOR_UPLOAD: &str = "Waiting for upload...";

/// What woke the execution view
#[derive(Debug)]
pub enum ExecSignal {
    Poll(PollEvent),
    /// Poll channel closed; the poller is gone
    PollClosed,
    /// Elapsed clock should be redrawn
    Tick,
}

pub struct ExecutionView {
    client: SoliforgeClient,
    task_id: String,
    task: Option<Task>,
    logs: Vec<LogEntry>,
    load_error: Option<String>,
    starting: bool,
    poll_interval: Duration,
    settle_delay: Duration,
    poller: Option<PollerHandle>,
    events: Option<mpsc::UnboundedReceiver<PollEvent>>,
    ticker: ElapsedTicker,
}

impl ExecutionView {
    pub fn new(client: SoliforgeClient, task_id: impl Into<String>, poll: &PollConfig) -> Self {
        Self {
            client,
            task_id: task_id.into(),
            task: None,
            logs: Vec::new(),
            load_error: None,
            starting: false,
            poll_interval: poll.interval(),
            settle_delay: poll.start_settle(),
            poller: None,
            events: None,
            ticker: ElapsedTicker::new(poll.elapsed_tick()),
        }
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn task(&self) -> Option<&Task> {
        self.task.as_ref()
    }

    pub fn logs(&self) -> &[LogEntry] {
        &self.logs
    }

    /// Message that replaces the view after a failed initial load
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn is_starting(&self) -> bool {
        self.starting
    }

    pub fn poller_state(&self) -> Option<PollerState> {
        self.poller.as_ref().map(PollerHandle::state)
    }

    pub fn ticker_active(&self) -> bool {
        self.ticker.is_active()
    }

    /// Initial load, then mount the poller
    pub async fn load(&mut self) -> Result<(), ViewError> {
        match self.client.task_detail(&self.task_id).await {
            Ok(task) => {
                self.load_error = None;
                self.mount(task);
                match self.client.task_logs(&self.task_id).await {
                    Ok(logs) => self.logs = logs,
                    Err(err) if err.is_auth_error() => {
                        self.unmount();
                        return Err(ViewError::Unauthenticated);
                    }
                    Err(err) => {
                        warn!(task_id = %self.task_id, error = %err, "initial log fetch failed")
                    }
                }
                Ok(())
            }
            Err(err) => {
                let err = ViewError::load(err, LOAD_TASK_FALLBACK);
                if let ViewError::Load(message) = &err {
                    self.load_error = Some(message.clone());
                }
                Err(err)
            }
        }
    }

    fn mount(&mut self, task: Task) {
        if self.poller.is_none() {
            let (handle, events) = spawn_poller(
                Arc::new(self.client.clone()),
                &task,
                self.poll_interval,
            );
            self.poller = Some(handle);
            self.events = Some(events);
        }
        self.set_task(task);
    }

    fn set_task(&mut self, task: Task) {
        self.ticker.sync(&task);
        if let Some(poller) = self.poller.as_ref() {
            poller.observe(&task);
        }
        self.task = Some(task);
    }

    /// Stop polling and ticking; later poll results are discarded
    pub fn unmount(&mut self) {
        self.poller = None;
        self.events = None;
    }

    /// Wait for the next poll event or clock tick
    pub async fn next_signal(&mut self) -> ExecSignal {
        let events = self.events.as_mut();
        let ticker = &mut self.ticker;
        tokio::select! {
            event = recv_or_pending(events) => match event {
                Some(event) => ExecSignal::Poll(event),
                None => ExecSignal::PollClosed,
            },
            _ = ticker.tick() => ExecSignal::Tick,
        }
    }

    pub fn handle_signal(&mut self, signal: ExecSignal) -> Result<(), ViewError> {
        match signal {
            ExecSignal::Poll(event) => self.apply(event),
            ExecSignal::PollClosed => {
                self.events = None;
                Ok(())
            }
            ExecSignal::Tick => Ok(()),
        }
    }

    /// Replace the snapshot with a poll result
    pub fn apply(&mut self, event: PollEvent) -> Result<(), ViewError> {
        match event {
            PollEvent::Snapshot { task, logs } => {
                self.logs = logs;
                self.ticker.sync(&task);
                self.task = Some(task);
                Ok(())
            }
            PollEvent::Unauthenticated => {
                self.unmount();
                Err(ViewError::Unauthenticated)
            }
        }
    }

    /// Re-fetch the detail and reconcile the poller
    pub async fn refresh(&mut self) -> Result<(), ViewError> {
        self.refetch("Refresh").await
    }

    async fn refetch(&mut self, action: &str) -> Result<(), ViewError> {
        let task = self
            .client
            .task_detail(&self.task_id)
            .await
            .map_err(|err| ViewError::alert(action, err))?;
        self.set_task(task);
        Ok(())
    }

    pub fn status(&self) -> Option<TaskStatus> {
        self.task.as_ref().map(|task| task.status)
    }

    pub fn has_contract(&self) -> bool {
        self.task.as_ref().is_some_and(Task::has_contract)
    }

    pub fn can_stop(&self) -> bool {
        self.status() == Some(TaskStatus::Running)
    }

    pub fn can_start(&self) -> bool {
        !self.can_stop() && self.has_contract() && !self.starting
    }

    pub fn start_label(&self) -> &'static str {
        match self.status() {
            Some(TaskStatus::Created | TaskStatus::Uploaded) => "Start",
            _ => "Restart",
        }
    }

    pub fn upload_label(&self) -> &'static str {
        if self.has_contract() {
            "Re-upload"
        } else {
            "Upload"
        }
    }

    pub async fn start(&mut self) -> Result<(), ViewError> {
        if self.task.is_none() || self.can_stop() {
            return Err(ViewError::rejected("Start", "Task is not ready"));
        }
        if !self.has_contract() {
            return Err(ViewError::rejected("Start", "Upload a contract first"));
        }
        if self.starting {
            return Err(ViewError::rejected("Start", "Start already in progress"));
        }

        self.starting = true;
        if let Err(err) = self.client.start_task(&self.task_id).await {
            self.starting = false;
            return Err(ViewError::alert("Start", err));
        }
        info!(task_id = %self.task_id, "start accepted; waiting for backend to settle");

        tokio::time::sleep(self.settle_delay).await;
        let result = self.refetch("Start").await;
        self.starting = false;
        result
    }

    pub async fn stop(&mut self) -> Result<(), ViewError> {
        if !self.can_stop() {
            return Err(ViewError::rejected("Stop", "Task is not running"));
        }
        self.client
            .stop_task(&self.task_id)
            .await
            .map_err(|err| ViewError::alert("Stop", err))?;
        self.refetch("Stop").await
    }

    /// Upload a `.sol` file from disk
    pub async fn upload(&mut self, path: &Path) -> Result<(), ViewError> {
        if !is_solidity_file(path) {
            return Err(ViewError::rejected(
                "Upload",
                format!("{} is not a .sol file", path.display()),
            ));
        }
        if self.can_stop() {
            return Err(ViewError::rejected("Upload", "Stop the task before uploading"));
        }
        self.client
            .upload_contract(&self.task_id, path)
            .await
            .map_err(|err| ViewError::alert("Upload", err))?;
        self.refetch("Upload").await
    }

    pub fn elapsed_at(&self, now: DateTime<Utc>) -> u64 {
        self.task
            .as_ref()
            .map(|task| elapsed::for_task(task, now))
            .unwrap_or(0)
    }

    pub fn clock(&self) -> String {
        elapsed::format_clock(self.elapsed_at(Utc::now()))
    }

    pub fn summary(&self) -> MatrixSummary {
        self.task
            .as_ref()
            .map(MatrixSummary::for_task)
            .unwrap_or_default()
    }

    pub fn source_v1(&self) -> &str {
        self.task
            .as_ref()
            .and_then(Task::original_code)
            .unwrap_or(NO_V1_CODE)
    }

    pub fn source_v2(&self) -> &str {
        self.task
            .as_ref()
            .and_then(Task::fixed_code)
            .unwrap_or(NO_V2_CODE)
    }

    pub fn waiting_for_upload(&self) -> bool {
        self.task
            .as_ref()
            .is_some_and(|task| task.original_code().is_none())
    }
}

async fn recv_or_pending(
    events: Option<&mut mpsc::UnboundedReceiver<PollEvent>>,
) -> Option<PollEvent> {
    match events {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

pub fn is_solidity_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("sol"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_is_solidity_file() {
        assert!(is_solidity_file(&PathBuf::from("contracts/Vault.sol")));
        assert!(is_solidity_file(&PathBuf::from("Vault.SOL")));
        assert!(!is_solidity_file(&PathBuf::from("Vault.vy")));
        assert!(!is_solidity_file(&PathBuf::from("Vault")));
    }

    #[test]
    fn test_unloaded_view_placeholders() {
        let client = SoliforgeClient::new(soliforge_client::DEFAULT_BASE_URL).unwrap();
        let view = ExecutionView::new(client, "t1", &PollConfig::default());
        assert_eq!(view.source_v1(), NO_V1_CODE);
        assert_eq!(view.source_v2(), NO_V2_CODE);
        assert!(!view.can_start());
        assert_eq!(view.start_label(), "Restart");
        assert_eq!(view.elapsed_at(Utc::now()), 0);
        assert!(view.poller_state().is_none());
    }
}
