#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request},
    response::Response,
    Router,
};
use layout_service::config::{
    GeminiSettings, LayoutConfig, PromptSettings, DEFAULT_GEMINI_MODEL, DEFAULT_WORD_LIMIT,
};
use layout_service::services::providers::mock::MockTextProvider;
use layout_service::services::providers::TextProvider;
use layout_service::services::{LayoutRelay, PromptTemplate};
use layout_service::startup::{build_router, AppState};
use secrecy::Secret;
use service_core::config::Config;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

/// Configuration for an app bound to an ephemeral localhost port.
pub fn test_config(api_base: &str) -> LayoutConfig {
    LayoutConfig {
        common: Config {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
        },
        gemini: GeminiSettings {
            api_key: Secret::new("test-api-key".to_string()),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            api_base: api_base.to_string(),
            timeout_secs: 5,
        },
        prompt: PromptSettings {
            word_limit: DEFAULT_WORD_LIMIT,
        },
    }
}

/// Router wired to `provider` with the default template.
pub fn router_with(provider: Arc<dyn TextProvider>) -> Router {
    build_router(AppState {
        relay: LayoutRelay::new(provider, PromptTemplate::default()),
    })
}

/// Router plus a handle on the mock so tests can inspect recorded prompts.
pub fn mock_router(provider: MockTextProvider) -> (Router, Arc<MockTextProvider>) {
    let provider = Arc::new(provider);
    (router_with(provider.clone()), provider)
}

pub fn layout_request(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/layout")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
