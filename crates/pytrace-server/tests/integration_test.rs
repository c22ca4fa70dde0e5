//! End-to-end integration tests for the pytrace HTTP API.
//!
//! Tests use `tower::ServiceExt::oneshot` to send requests directly to the
//! router without starting a network server. Validation paths never reach
//! the runtime, so those tests point the host at a nonexistent interpreter to
//! prove it. Tests that need a real runtime skip when none is installed.

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::json;
use tower::ServiceExt;

use pytrace_host::HostConfig;
use pytrace_server::router::build_router;
use pytrace_server::state::AppState;

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// Router whose host can never start a runtime.
fn offline_app() -> Router {
    let config = HostConfig::default().with_python("/nonexistent/pytrace-python");
    build_router(AppState::new(config))
}

/// Router backed by the environment's Python, or `None` when there is none.
async fn live_app() -> Option<Router> {
    let config = HostConfig::from_env()
        .unwrap_or_default()
        .with_timeout(Some(Duration::from_secs(30)));
    let app = build_router(AppState::new(config));
    let (status, body) = post_json(&app, "/runtime/init", json!({})).await;
    if status == StatusCode::OK {
        Some(app)
    } else {
        eprintln!("skipping: {}", body["error"]["message"]);
        None
    }
}

/// Sends a POST request with a JSON body and returns (status, json).
async fn post_json(
    app: &Router,
    path: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(path)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value =
        serde_json::from_slice(&body_bytes).unwrap_or(json!(null));
    (status, json)
}

/// Sends a GET request and returns (status, json).
async fn get_json(app: &Router, path: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value =
        serde_json::from_slice(&body_bytes).unwrap_or(json!(null));
    (status, json)
}

fn trace_body(code: &str, function_name: &str, parameter_value: &str) -> serde_json::Value {
    json!({
        "code": code,
        "functionName": function_name,
        "parameterValue": parameter_value,
    })
}

// ---------------------------------------------------------------------------
// Validation (no runtime involved)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn placeholder_source_is_rejected() {
    let app = offline_app();
    let (status, body) = post_json(&app, "/trace", trace_body("def func(n):", "func", "5")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["code"], json!("VALIDATION_FAILED"));
    assert_eq!(body["error"]["message"], json!("Please enter your Python code"));
    assert_eq!(body["error"]["phase"], json!("validating"));
}

#[tokio::test]
async fn unknown_function_is_named_in_the_error() {
    let app = offline_app();
    let (status, body) = post_json(
        &app,
        "/trace",
        trace_body("def func(n):\n    return n + 1", "foo", "5"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"]["message"],
        json!("Function \"foo\" not found in the code")
    );
}

#[tokio::test]
async fn forbidden_import_is_rejected_before_other_checks() {
    let app = offline_app();
    let (status, body) = post_json(
        &app,
        "/trace",
        trace_body("import os\ndef func(n):\n    return n", "", ""),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"]["message"],
        json!("Code contains forbidden operations")
    );
}

#[tokio::test]
async fn missing_fields_hit_the_guards() {
    let app = offline_app();

    let (status, body) = post_json(
        &app,
        "/trace",
        json!({ "code": "def func(n):\n    return n" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], json!("Function name is required"));

    let (_, body) = post_json(
        &app,
        "/trace",
        json!({ "code": "def func(n):\n    return n", "functionName": "func" }),
    )
    .await;
    assert_eq!(body["error"]["message"], json!("Parameter value is required"));
}

#[tokio::test]
async fn validation_leaves_runtime_uninitialized() {
    let app = offline_app();
    post_json(&app, "/trace", trace_body("def func(n):", "func", "5")).await;

    let (status, body) = get_json(&app, "/runtime").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({ "ready": false }));
}

#[tokio::test]
async fn unavailable_runtime_is_an_execution_failure() {
    let app = offline_app();
    let (status, body) = post_json(
        &app,
        "/trace",
        trace_body("def func(n):\n    return n + 1", "func", "5"),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], json!("EXECUTION_FAILED"));
    assert_eq!(body["error"]["phase"], json!("initializing_host"));

    let (status, _) = post_json(&app, "/runtime/init", json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn validate_endpoint_lists_matches() {
    let app = offline_app();

    let (status, body) = post_json(
        &app,
        "/validate",
        json!({ "code": "import sys\nx = eval('1')" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!({ "valid": false, "matched": ["import sys", "eval"] })
    );

    let (_, body) = post_json(
        &app,
        "/validate",
        json!({ "code": "def func(n):\n    return n" }),
    )
    .await;
    assert_eq!(body["data"], json!({ "valid": true, "matched": [] }));
}

// ---------------------------------------------------------------------------
// Live runtime
// ---------------------------------------------------------------------------

#[tokio::test]
async fn trace_returns_steps_and_result() {
    let Some(app) = live_app().await else {
        return;
    };

    let (status, runtime) = get_json(&app, "/runtime").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(runtime["data"]["ready"], json!(true));

    let (status, body) = post_json(
        &app,
        "/trace",
        trace_body("def func(n):\n    return n + 1", "func", "5"),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "trace failed: {:?}", body);
    assert_eq!(body["success"], json!(true));
    assert_eq!(
        body["data"]["steps"],
        json!([{ "step": 0, "line": 2, "code": "return n + 1", "variables": { "n": 5 } }])
    );
    assert_eq!(body["data"]["result"], json!(6));
    assert!(body["data"]["run_id"].is_string());
}

#[tokio::test]
async fn runtime_exception_maps_to_execution_failure() {
    let Some(app) = live_app().await else {
        return;
    };

    let (status, body) = post_json(
        &app,
        "/trace",
        trace_body("def func(n):\n    return n[0]", "func", "5"),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["phase"], json!("executing"));
    let message = body["error"]["message"].as_str().unwrap();
    assert!(message.starts_with("Failed to trace the code: TypeError"));
}
