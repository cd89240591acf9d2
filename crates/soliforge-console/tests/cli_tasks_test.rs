/*
[INPUT]:  Mock SoliForge API, soliforge binary
[OUTPUT]: Headless task commands and session expiry handling
[POS]:    Integration tests - CLI against a mock server
[UPDATE]: When changing CLI output or session handling
*/

mod common;

use std::path::PathBuf;
use std::process::{Command, Output};

use common::{api_base, logs_json, setup_mock_server, task_json};
use soliforge_client::SessionToken;
use soliforge_console::{SessionStore, StoredSession};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

fn session_path() -> PathBuf {
    std::env::temp_dir().join(format!("soliforge-cli-{}.json", uuid::Uuid::new_v4()))
}

async fn run_cli(api: String, session: PathBuf, args: Vec<&'static str>) -> Output {
    tokio::task::spawn_blocking(move || {
        Command::new(env!("CARGO_BIN_EXE_soliforge"))
            .env_remove("SOLIFORGE_TOKEN")
            .env("SOLIFORGE_SESSION__TOKEN_PATH", session)
            .args(["--log-level", "error", "--api-url"])
            .arg(api)
            .args(args)
            .output()
            .expect("Failed to start soliforge binary")
    })
    .await
    .expect("cli task should join")
}

#[tokio::test]
async fn test_tasks_list_prints_rows() {
    let server = setup_mock_server().await;
    let mut owned = task_json("t2", "running");
    owned["owner_name"] = serde_json::json!("alice");
    Mock::given(method("GET"))
        .and(path("/api/tasks/"))
        .and(header("authorization", "Bearer tok"))
        .and(query_param("status", "running"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [task_json("t1", "running"), owned],
            "total": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_cli(
        api_base(&server),
        session_path(),
        vec!["--token", "tok", "tasks", "list", "--status", "running"],
    )
    .await;

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("task t1"), "stdout: {stdout}");
    assert!(stdout.contains("running"), "stdout: {stdout}");
    assert!(stdout.contains("of 2"), "stdout: {stdout}");
    assert!(stdout.contains("alice"), "stdout: {stdout}");
    assert!(stdout.contains("Unknown"), "stdout: {stdout}");
}

#[tokio::test]
async fn test_tasks_show_prints_matrix_and_logs() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/t1/detail"))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_json("t1", "completed")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/t1/logs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(logs_json(&["attack blocked"])))
        .mount(&server)
        .await;

    let output = run_cli(
        api_base(&server),
        session_path(),
        vec!["--token", "tok", "tasks", "show", "t1"],
    )
    .await;

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("reentrancy drain"), "stdout: {stdout}");
    assert!(stdout.contains("1 / 2 BLOCKED"), "stdout: {stdout}");
    assert!(stdout.contains("attack blocked"), "stdout: {stdout}");
}

#[tokio::test]
async fn test_tasks_delete_with_yes_skips_prompt() {
    let server = setup_mock_server().await;
    Mock::given(method("DELETE"))
        .and(path("/api/tasks/t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"message": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_cli(
        api_base(&server),
        session_path(),
        vec!["--token", "tok", "tasks", "delete", "t1", "--yes"],
    )
    .await;

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Deleted task"));
}

#[tokio::test]
async fn test_expired_session_is_cleared() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let session = session_path();
    let store = SessionStore::new(session.clone());
    let stored = StoredSession::new(&api_base(&server), Some("alice"), &SessionToken::bearer("stale"));
    store.save(&stored).await.expect("session should save");

    let output = run_cli(api_base(&server), session.clone(), vec!["tasks", "list"]).await;

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("session expired"), "stderr: {stderr}");
    assert!(!session.exists());
}
