//! Gemini AI provider implementation.
//!
//! Calls `models/{model}:generateContent` on Google's Generative Language API
//! with a single user text part and returns the concatenated text of the first
//! candidate.

use super::{ProviderError, ProviderResponse, TextProvider};
use crate::config::GeminiSettings;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::error::Error as _;
use std::time::Duration;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini provider configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Secret<String>,
    pub model: String,
    pub api_base: String,
    pub timeout: Duration,
}

impl From<&GeminiSettings> for GeminiConfig {
    fn from(settings: &GeminiSettings) -> Self {
        Self {
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            api_base: settings.api_base.clone(),
            timeout: Duration::from_secs(settings.timeout_secs),
        }
    }
}

/// Gemini text provider. Holds one pooled HTTP client for the process lifetime.
pub struct GeminiTextProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiTextProvider {
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Build the API URL for the configured model and method.
    fn api_url(&self, method: &str) -> String {
        format!(
            "{}/models/{}:{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.model,
            method
        )
    }
}

#[async_trait]
impl TextProvider for GeminiTextProvider {
    async fn generate(&self, prompt: &str) -> Result<ProviderResponse, ProviderError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                    thought: None,
                }],
            }],
        };

        tracing::debug!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .post(self.api_url("generateContent"))
            .header(API_KEY_HEADER, self.config.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(describe_transport_error(e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api(describe_api_error(status, &error_text)));
        }

        let api_response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        let usage = api_response.usage_metadata.unwrap_or_default();

        let text = match api_response.candidates.into_iter().next() {
            Some(candidate) => candidate_text(candidate),
            None => {
                if let Some(reason) = api_response
                    .prompt_feedback
                    .and_then(|feedback| feedback.block_reason)
                {
                    tracing::warn!(block_reason = %reason, "Gemini blocked the prompt");
                }
                None
            }
        };

        let text = text.ok_or(ProviderError::EmptyResponse)?;

        Ok(ProviderResponse {
            text,
            input_tokens: usage.prompt_token_count,
            output_tokens: usage.candidates_token_count,
        })
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

/// Concatenate the non-thought text parts of a candidate, or `None` if there are none.
fn candidate_text(candidate: Candidate) -> Option<String> {
    if let Some(reason) = candidate.finish_reason.as_deref() {
        if reason != "STOP" {
            tracing::debug!(finish_reason = %reason, "Gemini finished early");
        }
    }

    let parts: Vec<String> = candidate
        .content
        .map(|content| content.parts)
        .unwrap_or_default()
        .into_iter()
        .filter(|part| !part.thought.unwrap_or(false))
        .filter_map(|part| part.text)
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.concat())
    }
}

/// Render an error response as `"<code> <STATUS>. <message>"` when Gemini sent its
/// standard error envelope, otherwise as the HTTP status followed by the raw body.
fn describe_api_error(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => {
            let error = envelope.error;
            let code = error.code.unwrap_or(status.as_u16());
            match error.status {
                Some(api_status) => format!("{} {}. {}", code, api_status, error.message),
                None => format!("{} {}", code, error.message),
            }
        }
        Err(_) if body.trim().is_empty() => status.to_string(),
        Err(_) => format!("{}: {}", status, body.trim()),
    }
}

/// Render a transport failure with its cause chain, leaving out the request URL.
fn describe_transport_error(err: reqwest::Error) -> String {
    let err = err.without_url();
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    thought: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<i32>,
    candidates_token_count: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: Option<u16>,
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn request_body_matches_gemini_shape() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some("hi".to_string()),
                    thought: None,
                }],
            }],
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "contents": [{ "role": "user", "parts": [{ "text": "hi" }] }] })
        );
    }

    #[test]
    fn joins_text_parts_and_skips_thoughts() {
        let response = parse(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [
                    { "text": "planning...", "thought": true },
                    { "text": "Towers rise " },
                    { "text": "over the moat." }
                ]},
                "finishReason": "STOP"
            }]
        }));

        let candidate = response.candidates.into_iter().next().unwrap();
        assert_eq!(
            candidate_text(candidate).as_deref(),
            Some("Towers rise over the moat.")
        );
    }

    #[test]
    fn candidate_without_content_has_no_text() {
        let response = parse(json!({ "candidates": [{ "finishReason": "SAFETY" }] }));

        let candidate = response.candidates.into_iter().next().unwrap();
        assert!(candidate_text(candidate).is_none());
    }

    #[test]
    fn describes_standard_error_envelope() {
        let body = r#"{"error":{"code":429,"message":"Resource has been exhausted (e.g. check quota).","status":"RESOURCE_EXHAUSTED"}}"#;

        assert_eq!(
            describe_api_error(StatusCode::TOO_MANY_REQUESTS, body),
            "429 RESOURCE_EXHAUSTED. Resource has been exhausted (e.g. check quota)."
        );
    }

    #[test]
    fn describes_non_json_error_body() {
        assert_eq!(
            describe_api_error(StatusCode::BAD_GATEWAY, "upstream down"),
            "502 Bad Gateway: upstream down"
        );
        assert_eq!(
            describe_api_error(StatusCode::SERVICE_UNAVAILABLE, ""),
            "503 Service Unavailable"
        );
    }

    #[test]
    fn api_url_tolerates_trailing_slash() {
        let provider = GeminiTextProvider::new(GeminiConfig {
            api_key: Secret::new("k".to_string()),
            model: "gemini-2.5-flash".to_string(),
            api_base: "http://localhost:9999/v1beta/".to_string(),
            timeout: Duration::from_secs(1),
        })
        .unwrap();

        assert_eq!(
            provider.api_url("generateContent"),
            "http://localhost:9999/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
