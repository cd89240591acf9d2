/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for soliforge-client tests

#![allow(dead_code)]

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use soliforge_client::{AuthContext, ClientConfig, SessionToken, SoliforgeClient};
use wiremock::MockServer;

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// API root on the mock server, mirroring the backend's `/api` prefix
pub fn api_base(server: &MockServer) -> String {
    format!("{}/api", server.uri())
}

/// Client pointed at the mock server, signed in with `token`
pub fn signed_in_client(server: &MockServer, token: &str) -> SoliforgeClient {
    let auth = AuthContext::with_token(SessionToken::bearer(token));
    SoliforgeClient::with_config(ClientConfig::default(), &api_base(server), auth)
        .expect("client should build")
}

/// Unsigned JWT carrying `sub` and `exp`
pub fn make_jwt(sub: &str, exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(
        serde_json::json!({"sub": sub, "exp": exp})
            .to_string()
            .as_bytes(),
    );
    format!("{header}.{payload}.signature")
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
