//! Integration tests that run the real server on a random port.

mod common;

use common::test_config;
use layout_service::services::providers::mock::MockTextProvider;
use layout_service::startup::Application;
use reqwest::Client;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Spawn the application with a mock provider and return the port number.
async fn spawn_app(provider: MockTextProvider) -> u16 {
    let config = test_config("http://127.0.0.1:9");
    let app = Application::build_with_provider(config, Arc::new(provider))
        .await
        .expect("Failed to build application");

    let port = app.port();

    tokio::spawn(async move {
        let _ = app.run_until_stopped().await;
    });

    port
}

#[tokio::test]
async fn health_check_returns_ok() {
    let port = spawn_app(MockTextProvider::responding("unused")).await;

    let response = Client::new()
        .get(format!("http://127.0.0.1:{}/health", port))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "layout-service");
}

#[tokio::test]
async fn readiness_check_returns_ok() {
    let port = spawn_app(MockTextProvider::responding("unused")).await;

    let response = Client::new()
        .get(format!("http://127.0.0.1:{}/ready", port))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
}

#[tokio::test]
async fn metrics_count_relay_outcomes() {
    let port = spawn_app(MockTextProvider::responding("Hello world")).await;
    let client = Client::new();

    let response = client
        .post(format!("http://127.0.0.1:{}/api/layout", port))
        .json(&json!({ "prompt": "a castle" }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let metrics = client
        .get(format!("http://127.0.0.1:{}/metrics", port))
        .send()
        .await
        .expect("Failed to send request")
        .text()
        .await
        .expect("Failed to read body");

    assert!(metrics.contains("layout_requests_total{outcome=\"success\"}"));
    assert!(metrics.contains("layout_upstream_duration_seconds"));
}

#[tokio::test]
async fn built_app_calls_configured_gemini_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "Hello world" }] },
                "finishReason": "STOP"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = Application::build(test_config(&server.uri()))
        .await
        .expect("Failed to build application");
    let port = app.port();
    tokio::spawn(async move {
        let _ = app.run_until_stopped().await;
    });

    let response = Client::new()
        .post(format!("http://127.0.0.1:{}/api/layout", port))
        .json(&json!({ "prompt": "a castle" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body, json!({ "paragraph": "Hello world" }));
}
