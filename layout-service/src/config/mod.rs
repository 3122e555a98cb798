use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;

/// Gemini REST endpoint, overridable for tests and proxies.
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_WORD_LIMIT: u32 = 100;

#[derive(Debug, Clone)]
pub struct LayoutConfig {
    pub common: core_config::Config,
    pub gemini: GeminiSettings,
    pub prompt: PromptSettings,
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: Secret<String>,
    pub model: String,
    pub api_base: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct PromptSettings {
    /// Upper bound on the paragraph length requested from the model.
    pub word_limit: u32,
}

impl LayoutConfig {
    /// Load configuration from the environment (and `.env`, if present).
    ///
    /// Fails when `GEMINI_API_KEY` is missing or any numeric setting does not parse.
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        let word_limit: u32 = parse_env("LAYOUT_WORD_LIMIT", DEFAULT_WORD_LIMIT)?;
        if word_limit == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "LAYOUT_WORD_LIMIT must be at least 1"
            )));
        }

        Ok(LayoutConfig {
            common,
            gemini: GeminiSettings {
                api_key: Secret::new(require_env("GEMINI_API_KEY")?),
                model: env_or("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
                api_base: env_or("GEMINI_API_BASE", DEFAULT_GEMINI_API_BASE),
                timeout_secs: parse_env("GEMINI_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
            },
            prompt: PromptSettings { word_limit },
        })
    }
}

fn require_env(key: &str) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) if !val.trim().is_empty() => Ok(val),
        _ => Err(AppError::ConfigError(anyhow::anyhow!(
            "{} is required but not set",
            key
        ))),
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) if !raw.is_empty() => parse_value(key, &raw),
        _ => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!("{} has invalid value '{}': {}", key, raw, e))
    })
}
