//! The layout relay: template the prompt, call the provider, hand back its text.

use super::metrics;
use super::prompt::PromptTemplate;
use super::providers::{ProviderError, TextProvider};
use service_core::error::AppError;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

/// Everything that can go wrong in a relay call. Upstream failures are not
/// classified further for the caller.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error(transparent)]
    Upstream(#[from] ProviderError),
}

impl From<RelayError> for AppError {
    fn from(err: RelayError) -> Self {
        AppError::Upstream(err.to_string())
    }
}

/// Shared, read-only relay. Cloning is cheap; the provider is behind an `Arc`.
#[derive(Clone)]
pub struct LayoutRelay {
    provider: Arc<dyn TextProvider>,
    template: PromptTemplate,
}

impl LayoutRelay {
    pub fn new(provider: Arc<dyn TextProvider>, template: PromptTemplate) -> Self {
        Self { provider, template }
    }

    pub fn template(&self) -> PromptTemplate {
        self.template
    }

    /// Generate a paragraph for `prompt`. Makes exactly one provider call.
    pub async fn generate(&self, prompt: &str) -> Result<String, RelayError> {
        let instruction = self.template.render(prompt);
        let model = self.provider.model();
        let start = Instant::now();

        let result = self.provider.generate(&instruction).await;
        let elapsed = start.elapsed();
        metrics::record_upstream_latency(model, elapsed.as_secs_f64());

        match result {
            Ok(response) => {
                metrics::record_request("success");
                metrics::record_tokens(model, response.input_tokens, response.output_tokens);
                tracing::info!(
                    model = %model,
                    paragraph_len = response.text.len(),
                    latency_ms = elapsed.as_millis() as u64,
                    "Generated paragraph"
                );
                Ok(response.text)
            }
            Err(e) => {
                metrics::record_request("upstream_error");
                tracing::warn!(
                    model = %model,
                    error = %e,
                    latency_ms = elapsed.as_millis() as u64,
                    "Generation API call failed"
                );
                Err(RelayError::Upstream(e))
            }
        }
    }
}
