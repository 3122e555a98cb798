use serde::{Deserialize, Serialize};

/// Body of `POST /api/layout`. The prompt is free text and is not length-checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRequest {
    pub prompt: String,
}

/// Successful response: the generated paragraph, exactly as the model returned it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutResponse {
    pub paragraph: String,
}
