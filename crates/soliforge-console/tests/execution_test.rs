/*
[INPUT]:  Mock SoliForge API
[OUTPUT]: Execution view load, mutation and session-expiry behavior
[POS]:    Integration tests - execution view model
[UPDATE]: When changing execution actions or their error mapping
*/

mod common;

use common::{fast_poll, logs_json, setup_mock_server, signed_in_client, task_json};
use soliforge_client::TaskStatus;
use soliforge_console::{ExecutionView, PollerState, ViewError};
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_detail(server: &MockServer, id: &str, status: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/api/tasks/{id}/detail")))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_json(id, status)))
        .mount(server)
        .await;
}

async fn mount_logs(server: &MockServer, id: &str, messages: &[&str]) {
    Mock::given(method("GET"))
        .and(path(format!("/api/tasks/{id}/logs")))
        .respond_with(ResponseTemplate::new(200).set_body_json(logs_json(messages)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_load_mounts_poller_for_running_task() {
    let server = setup_mock_server().await;
    mount_detail(&server, "t1", "running").await;
    mount_logs(&server, "t1", &["fuzzing started"]).await;

    let mut view = ExecutionView::new(signed_in_client(&server, "tok"), "t1", &fast_poll());
    assert_ok!(view.load().await);

    assert_eq!(view.status(), Some(TaskStatus::Running));
    assert_eq!(view.logs().len(), 1);
    assert!(view.can_stop());
    assert!(!view.can_start());
    assert!(view.ticker_active());
    assert!(matches!(
        view.poller_state(),
        Some(PollerState::Polling { ref task_id, .. }) if task_id == "t1"
    ));
    assert_eq!(view.summary().threats, 1);

    view.unmount();
    assert_eq!(view.poller_state(), None);
}

#[tokio::test]
async fn test_load_failure_replaces_view_with_server_detail() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/missing/detail"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(serde_json::json!({"detail": "Task not found"})),
        )
        .mount(&server)
        .await;

    let mut view = ExecutionView::new(signed_in_client(&server, "tok"), "missing", &fast_poll());
    let err = assert_err!(view.load().await);

    assert_eq!(err, ViewError::Load("Task not found".to_string()));
    assert_eq!(view.load_error(), Some("Task not found"));
    assert_eq!(view.poller_state(), None);
}

#[tokio::test]
async fn test_log_failure_does_not_fail_load() {
    let server = setup_mock_server().await;
    mount_detail(&server, "t1", "uploaded").await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/t1/logs"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut view = ExecutionView::new(signed_in_client(&server, "tok"), "t1", &fast_poll());
    assert_ok!(view.load().await);
    assert!(view.logs().is_empty());
    assert_eq!(view.load_error(), None);
}

#[tokio::test]
async fn test_failed_start_leaves_status_unchanged() {
    let server = setup_mock_server().await;
    mount_detail(&server, "t1", "uploaded").await;
    mount_logs(&server, "t1", &[]).await;
    Mock::given(method("POST"))
        .and(path("/api/tasks/t1/start"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(serde_json::json!({"detail": "engine busy"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut view = ExecutionView::new(signed_in_client(&server, "tok"), "t1", &fast_poll());
    assert_ok!(view.load().await);
    assert_eq!(view.start_label(), "Start");

    let err = assert_err!(view.start().await);
    assert_eq!(
        err,
        ViewError::Alert {
            action: "Start".to_string(),
            detail: "engine busy".to_string(),
        }
    );
    assert_eq!(view.status(), Some(TaskStatus::Uploaded));
    assert!(!view.is_starting());
    assert!(view.can_start());
}

#[tokio::test]
async fn test_start_refetches_and_resumes_polling() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/t1/detail"))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_json("t1", "uploaded")))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_detail(&server, "t1", "running").await;
    mount_logs(&server, "t1", &[]).await;
    Mock::given(method("POST"))
        .and(path("/api/tasks/t1/start"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"message": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut view = ExecutionView::new(signed_in_client(&server, "tok"), "t1", &fast_poll());
    assert_ok!(view.load().await);
    assert!(!view.poller_state().is_some_and(|state| state.is_polling()));

    assert_ok!(view.start().await);
    assert_eq!(view.status(), Some(TaskStatus::Running));
    assert!(view.poller_state().is_some_and(|state| state.is_polling()));
    assert!(view.ticker_active());
}

#[tokio::test]
async fn test_upload_rejects_non_solidity_without_request() {
    let server = setup_mock_server().await;
    mount_detail(&server, "t1", "created").await;
    mount_logs(&server, "t1", &[]).await;
    Mock::given(method("POST"))
        .and(path("/api/tasks/t1/upload"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut view = ExecutionView::new(signed_in_client(&server, "tok"), "t1", &fast_poll());
    assert_ok!(view.load().await);
    let err = assert_err!(view.upload(std::path::Path::new("notes.txt")).await);
    assert!(matches!(err, ViewError::Alert { ref action, .. } if action == "Upload"));
}

#[tokio::test]
async fn test_stop_on_expired_session_is_unauthenticated() {
    let server = setup_mock_server().await;
    mount_detail(&server, "t1", "running").await;
    mount_logs(&server, "t1", &[]).await;
    Mock::given(method("POST"))
        .and(path("/api/tasks/t1/stop"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = signed_in_client(&server, "tok");
    let mut view = ExecutionView::new(client.clone(), "t1", &fast_poll());
    assert_ok!(view.load().await);

    let err = assert_err!(view.stop().await);
    assert!(err.is_unauthenticated());
    assert!(!client.auth().is_authenticated());
    assert_eq!(view.status(), Some(TaskStatus::Running));
}
