/*
[INPUT]:  Mock authentication responses
[OUTPUT]: Test results for auth flow
[POS]:    Integration tests - login, register and 401 interception
[UPDATE]: When auth endpoints or flow changes
*/

mod common;

use common::{api_base, make_jwt, setup_mock_server, signed_in_client};
use soliforge_client::{RegisterRequest, SoliforgeClient, SoliforgeError};
use tokio_test::assert_ok;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_login_installs_token() {
    let server = setup_mock_server().await;
    let jwt = make_jwt("alice@example.com", 4_000_000_000);
    Mock::given(method("POST"))
        .and(path("/api/auth/token"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("username=alice%40example.com"))
        .and(body_string_contains("password=hunter2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": jwt.clone(),
            "token_type": "bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = assert_ok!(SoliforgeClient::new(&api_base(&server)));
    assert!(!client.auth().is_authenticated());

    let token = assert_ok!(client.login("alice@example.com", "hunter2").await);
    assert_eq!(token.access_token, jwt);
    assert!(client.auth().is_authenticated());

    let stored = client.auth().token().expect("token should be stored");
    assert_eq!(stored.subject.as_deref(), Some("alice@example.com"));
    assert!(stored.expires_at.is_some());
}

#[tokio::test]
async fn test_login_bad_credentials_is_api_error() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "detail": "Incorrect username or password"
        })))
        .mount(&server)
        .await;

    let client = assert_ok!(SoliforgeClient::new(&api_base(&server)));
    let err = client.login("alice@example.com", "wrong").await.unwrap_err();
    assert!(!err.is_auth_error());
    assert_eq!(err.detail(), "Incorrect username or password");
}

#[tokio::test]
async fn test_register_sends_json_body() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .and(body_json(serde_json::json!({
            "email": "bob@example.com",
            "password": "pw",
            "username": "bob"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 3, "username": "bob", "email": "bob@example.com"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = assert_ok!(SoliforgeClient::new(&api_base(&server)));
    let request = RegisterRequest::new("bob@example.com", "pw", None);
    let profile = assert_ok!(client.register(&request).await);
    assert_eq!(profile.id, "3");
    assert_eq!(profile.username, "bob");
}

#[tokio::test]
async fn test_unauthorized_clears_context_and_is_typed() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "detail": "Could not validate credentials"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_in_client(&server, "stale");
    let view_handle = client.auth().clone();

    let err = client.me().await.unwrap_err();
    assert!(matches!(err, SoliforgeError::Unauthenticated));
    assert!(view_handle.access_token().is_none());
}

#[tokio::test]
async fn test_me_returns_profile() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "u1", "username": "alice", "email": "alice@example.com", "is_active": true
        })))
        .mount(&server)
        .await;

    let client = signed_in_client(&server, "tok");
    let profile = assert_ok!(client.me().await);
    assert_eq!(profile.username, "alice");
    assert_eq!(profile.is_active, Some(true));

    client.logout();
    assert!(!client.auth().is_authenticated());
}
