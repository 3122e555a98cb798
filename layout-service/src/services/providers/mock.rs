//! Mock provider implementation for testing.

use super::{ProviderError, ProviderResponse, TextProvider};
use async_trait::async_trait;
use std::sync::Mutex;

enum Behavior {
    Respond(String),
    Fail(String),
}

/// Mock text provider with a canned outcome. Records every prompt it receives.
pub struct MockTextProvider {
    behavior: Behavior,
    prompts: Mutex<Vec<String>>,
}

impl MockTextProvider {
    /// Always answers with `text`.
    pub fn responding(text: impl Into<String>) -> Self {
        Self {
            behavior: Behavior::Respond(text.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Always fails with an API error whose message is `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            behavior: Behavior::Fail(message.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.prompts().len()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(&self, prompt: &str) -> Result<ProviderResponse, ProviderError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        match &self.behavior {
            Behavior::Respond(text) => Ok(ProviderResponse {
                text: text.clone(),
                input_tokens: Some(prompt.len() as i32 / 4),
                output_tokens: Some(text.len() as i32 / 4),
            }),
            Behavior::Fail(message) => Err(ProviderError::Api(message.clone())),
        }
    }

    fn model(&self) -> &str {
        "mock"
    }
}
