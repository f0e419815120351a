#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use escola_db::{ensure_schema, DbSettings, Gateway};
use escola_server::{app, AppState};
use serde_json::Value;
use tower::ServiceExt;

/// Builds the router over a single-connection in-memory store with the
/// schema applied.
pub fn setup_app() -> (Router, Gateway) {
    let settings = DbSettings {
        path: ":memory:".to_string(),
        busy_timeout_ms: 5_000,
        pool_max_size: 1,
    };
    let gateway = Gateway::connect(&settings).expect("failed to create gateway");
    {
        let conn = gateway.pool().get().expect("failed to get connection");
        ensure_schema(&conn).expect("failed to apply schema");
    }

    let state = AppState {
        gateway: gateway.clone(),
    };
    (app(state), gateway)
}

/// Sends one request and returns the status and the decoded JSON body
/// (`Value::Null` when the body is empty or not JSON).
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().uri(uri).method(method);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

pub fn assert_pool_idle(gateway: &Gateway) {
    let state = gateway.pool().state();
    assert_eq!(
        state.idle_connections, state.connections,
        "all connections should be released after the request"
    );
}
