use crate::config::{PromptSettings, DEFAULT_WORD_LIMIT};

/// Instruction wrapped around the user's prompt before it is sent upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    word_limit: u32,
}

impl PromptTemplate {
    /// `word_limit` is taken as given; `LayoutConfig::load` rejects zero.
    pub fn new(word_limit: u32) -> Self {
        Self { word_limit }
    }

    pub fn word_limit(&self) -> u32 {
        self.word_limit
    }

    /// Embed `prompt` verbatim in the instruction. The prompt appears exactly once.
    pub fn render(&self, prompt: &str) -> String {
        format!(
            "Write a vivid <{}-word paragraph describing: {}",
            self.word_limit, prompt
        )
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_WORD_LIMIT)
    }
}

impl From<&PromptSettings> for PromptTemplate {
    fn from(settings: &PromptSettings) -> Self {
        Self::new(settings.word_limit)
    }
}
