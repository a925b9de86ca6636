//! Integration tests for the liveness and support endpoints.

mod common;

use common::TestApp;

#[tokio::test]
async fn health_check_returns_ok() {
    let app = TestApp::spawn().await;

    let response = app.get("/healthz").await;

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn health_check_is_unaffected_by_prior_requests() {
    let app = TestApp::spawn().await;

    app.post_hello(r#"{"name": "Ada"}"#).await;
    app.post_hello("not json").await;
    app.post_hello(r#"{"name": 7}"#).await;

    for _ in 0..3 {
        let response = app.get("/healthz").await;
        assert_eq!(response.status().as_u16(), 200);
        assert_eq!(response.text().await.unwrap(), "OK");
    }
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(format!("{}/healthz", app.address))
        .header("x-request-id", "req-42")
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.headers()["x-request-id"], "req-42");

    let response = app.get("/healthz").await;
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn metrics_endpoint_reports_request_and_flow_counters() {
    let app = TestApp::spawn().await;

    let greeting = app.post_hello(r#"{"name": "Ada"}"#).await;
    assert_eq!(greeting.status().as_u16(), 200);

    let response = app.get("/metrics").await;

    assert_eq!(response.status().as_u16(), 200);
    assert!(response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .starts_with("text/plain"));

    let body = response.text().await.unwrap();
    assert!(!body.contains("not initialized"));
    assert!(body.contains("flow_invocations_total"));
    assert!(body.contains(r#"flow="helloFlow""#));
    assert!(body.contains("http_requests_total"));
}

#[tokio::test]
async fn unknown_route_returns_not_found() {
    let app = TestApp::spawn().await;

    let response = app.get("/goodbyeFlow").await;

    assert_eq!(response.status().as_u16(), 404);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "No such route");
}
