/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared fixtures: scripted task feed, task JSON, mock API helpers
[POS]:    Test infrastructure - shared across console test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for soliforge-console tests

#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use soliforge_client::{
    AuthContext, ClientConfig, LogEntry, SessionToken, SoliforgeClient, SoliforgeError, Task,
    TaskStatus,
};
use soliforge_console::TaskFeed;
use soliforge_console::config::PollConfig;
use wiremock::MockServer;

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// API root on the mock server, mirroring the backend's `/api` prefix
pub fn api_base(server: &MockServer) -> String {
    format!("{}/api", server.uri())
}

pub fn signed_in_client(server: &MockServer, token: &str) -> SoliforgeClient {
    let auth = AuthContext::with_token(SessionToken::bearer(token));
    SoliforgeClient::with_config(ClientConfig::default(), &api_base(server), auth)
        .expect("client should build")
}

/// Poll timers without the start settle delay
pub fn fast_poll() -> PollConfig {
    PollConfig {
        start_settle_ms: 0,
        ..PollConfig::default()
    }
}

pub fn task_json(id: &str, status: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": format!("task {id}"),
        "status": status,
        "contract_name": "Vault.sol",
        "created_at": "2026-05-01T10:00:00",
        "started_at": "2026-05-01T10:01:00",
        "duration": null,
        "codes": {"original": "contract Vault {}", "fix": null},
        "matrix_cases": [
            {"id": "c1", "source": "RED_TEAM", "status": "FAILING", "name": "reentrancy drain"},
            {"id": "c2", "source": "FUZZER", "status": "PASSING", "name": "overflow"}
        ]
    })
}

pub fn task(id: &str, status: TaskStatus) -> Task {
    serde_json::from_value(task_json(id, status.as_str())).expect("fixture task should decode")
}

pub fn logs_json(messages: &[&str]) -> serde_json::Value {
    serde_json::Value::Array(
        messages
            .iter()
            .map(|message| {
                serde_json::json!({
                    "time": "2026-05-01T10:02:00",
                    "level": "INFO",
                    "content": message
                })
            })
            .collect(),
    )
}

/// Scripted task feed that counts calls
#[derive(Debug)]
pub struct ScriptedFeed {
    status: Mutex<TaskStatus>,
    delay: Mutex<Duration>,
    fail: AtomicBool,
    unauthorized: AtomicBool,
    detail_calls: AtomicUsize,
    log_calls: AtomicUsize,
}

impl ScriptedFeed {
    pub fn new(status: TaskStatus) -> Self {
        Self {
            status: Mutex::new(status),
            delay: Mutex::new(Duration::ZERO),
            fail: AtomicBool::new(false),
            unauthorized: AtomicBool::new(false),
            detail_calls: AtomicUsize::new(0),
            log_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_status(&self, status: TaskStatus) {
        *self.status.lock().unwrap() = status;
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn set_unauthorized(&self, unauthorized: bool) {
        self.unauthorized.store(unauthorized, Ordering::SeqCst);
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }

    pub fn log_calls(&self) -> usize {
        self.log_calls.load(Ordering::SeqCst)
    }

    async fn respond<T>(&self, value: T) -> soliforge_client::Result<T> {
        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if self.unauthorized.load(Ordering::SeqCst) {
            return Err(SoliforgeError::Unauthenticated);
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(SoliforgeError::Api {
                status: 500,
                message: "Internal Server Error".to_string(),
            });
        }
        Ok(value)
    }
}

#[async_trait]
impl TaskFeed for ScriptedFeed {
    async fn task_detail(&self, task_id: &str) -> soliforge_client::Result<Task> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        let status = *self.status.lock().unwrap();
        self.respond(task(task_id, status)).await
    }

    async fn task_logs(&self, _task_id: &str) -> soliforge_client::Result<Vec<LogEntry>> {
        self.log_calls.fetch_add(1, Ordering::SeqCst);
        self.respond(Vec::new()).await
    }
}
