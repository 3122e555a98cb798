//! Text generation provider abstraction.
//!
//! The relay only needs "prompt in, text out"; the trait keeps the Gemini
//! client swappable for the mock used in tests.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

/// Failure talking to a text generation backend.
///
/// The `Display` output is what callers of the layout endpoint see, so
/// variants carry the upstream message without extra decoration.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Transport failure: connect, TLS, timeout.
    #[error("{0}")]
    Network(String),

    /// The API answered with a non-success status.
    #[error("{0}")]
    Api(String),

    #[error("Failed to parse response: {0}")]
    InvalidResponse(String),

    #[error("Model returned no text")]
    EmptyResponse,
}

/// Result of a provider call.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub text: String,

    /// Input tokens consumed, when the backend reports it.
    pub input_tokens: Option<i32>,

    /// Output tokens generated, when the backend reports it.
    pub output_tokens: Option<i32>,
}

/// Trait for text generation providers (e.g., Gemini).
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Send a single user prompt and return the generated text.
    async fn generate(&self, prompt: &str) -> Result<ProviderResponse, ProviderError>;

    /// Model identifier, for logs.
    fn model(&self) -> &str;
}
