//! Integration tests for inbound request validation
//!
//! Every malformed request must yield `400 { "error": ... }` and must
//! terminate before any outbound call is made. The stub upstream records
//! invocations so the no-call guarantee is verified directly.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chatbridge::{config::Config, handlers::AppState};
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_app(upstream: &MockServer) -> Router {
    let toml = format!(
        r#"
[server]
host = "127.0.0.1"
port = 0

[upstream]
base_url = "{}/v1"
model = "test-model"
api_key = "sk-test"
"#,
        upstream.uri()
    );
    let config = Config::from_str(&toml).expect("should parse test config");
    let state = AppState::new(Arc::new(config)).expect("should create AppState");
    chatbridge::handlers::router(state)
}

async fn post_raw(app: Router, body: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("should build request");

    let response = app.oneshot(request).await.expect("should get response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("should read body");
    let json = serde_json::from_slice(&bytes).expect("error body should be JSON");
    (status, json)
}

async fn assert_rejected_without_outbound_call(body: &str) {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&upstream)
        .await;

    let app = test_app(&upstream);
    let (status, json) = post_raw(app, body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
    assert!(
        json.get("error").and_then(|e| e.as_str()).is_some(),
        "response must carry an error string, got: {}",
        json
    );

    let received = upstream
        .received_requests()
        .await
        .expect("request recording should be enabled");
    assert!(
        received.is_empty(),
        "no outbound call may be made for invalid input"
    );
}

#[tokio::test]
async fn test_missing_messages_is_rejected() {
    assert_rejected_without_outbound_call(r#"{"userName": "Dana"}"#).await;
}

#[tokio::test]
async fn test_empty_messages_is_rejected() {
    assert_rejected_without_outbound_call(r#"{"messages": []}"#).await;
}

#[tokio::test]
async fn test_non_array_messages_is_rejected() {
    assert_rejected_without_outbound_call(r#"{"messages": "hello"}"#).await;
}

#[tokio::test]
async fn test_non_object_message_items_are_rejected() {
    assert_rejected_without_outbound_call(r#"{"messages": [1, 2, 3]}"#).await;
}

#[tokio::test]
async fn test_unknown_role_is_rejected() {
    assert_rejected_without_outbound_call(r#"{"messages": [{"role": "robot", "content": "x"}]}"#)
        .await;
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    assert_rejected_without_outbound_call(r#"{"messages": ["#).await;
}

#[tokio::test]
async fn test_empty_body_is_rejected() {
    assert_rejected_without_outbound_call("").await;
}
