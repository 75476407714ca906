//! LLM configuration parsed from environment variables.

use super::types::{LlmError, ReasoningEffort};
use crate::config::parse_or;
use wire::ModelType;

pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_FAST_MODEL: &str = "gpt-5-mini-2025-08-07";
pub const DEFAULT_ADVANCED_MODEL: &str = "gpt-5.2-2025-12-11";
pub const DEFAULT_SUGGEST_MODEL: &str = "gpt-5-nano-2025-08-07";
pub const DEFAULT_LLM_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_LLM_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LlmTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

/// Model names behind the `fast` / `advanced` passage settings, plus the
/// small model used for related-term suggestions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmModels {
    pub fast: String,
    pub advanced: String,
    pub suggest: String,
}

impl Default for LlmModels {
    fn default() -> Self {
        Self {
            fast: DEFAULT_FAST_MODEL.into(),
            advanced: DEFAULT_ADVANCED_MODEL.into(),
            suggest: DEFAULT_SUGGEST_MODEL.into(),
        }
    }
}

impl LlmModels {
    /// Model name and reasoning effort for a search setting.
    #[must_use]
    pub fn select(&self, model_type: ModelType) -> (&str, ReasoningEffort) {
        match model_type {
            ModelType::Fast => (&self.fast, ReasoningEffort::Low),
            ModelType::Advanced => (&self.advanced, ReasoningEffort::High),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmConfig {
    pub api_key: String,
    pub models: LlmModels,
    pub openai_base_url: String,
    pub timeouts: LlmTimeouts,
}

impl LlmConfig {
    /// Build typed LLM config from environment variables.
    ///
    /// - `LLM_API_KEY_ENV`: names the env var containing the key (default `OPENAI_API_KEY`)
    /// - `LLM_OPENAI_BASE_URL`: default OpenAI API base URL
    /// - `LLM_FAST_MODEL` / `LLM_ADVANCED_MODEL` / `LLM_SUGGEST_MODEL`
    /// - `LLM_REQUEST_TIMEOUT_SECS`: default 120
    /// - `LLM_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::MissingApiKey`] when the named key variable is unset or empty.
    pub fn from_env() -> Result<Self, LlmError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// [`Self::from_env`] over an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// See [`Self::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LlmError> {
        let key_var = lookup("LLM_API_KEY_ENV").unwrap_or_else(|| DEFAULT_API_KEY_ENV.to_string());
        let api_key = lookup(&key_var)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| LlmError::MissingApiKey { var: key_var.clone() })?;

        let models = LlmModels {
            fast: lookup("LLM_FAST_MODEL").unwrap_or_else(|| DEFAULT_FAST_MODEL.to_string()),
            advanced: lookup("LLM_ADVANCED_MODEL").unwrap_or_else(|| DEFAULT_ADVANCED_MODEL.to_string()),
            suggest: lookup("LLM_SUGGEST_MODEL").unwrap_or_else(|| DEFAULT_SUGGEST_MODEL.to_string()),
        };
        let openai_base_url = lookup("LLM_OPENAI_BASE_URL")
            .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let timeouts = LlmTimeouts {
            request_secs: parse_or(&lookup, "LLM_REQUEST_TIMEOUT_SECS", DEFAULT_LLM_REQUEST_TIMEOUT_SECS),
            connect_secs: parse_or(&lookup, "LLM_CONNECT_TIMEOUT_SECS", DEFAULT_LLM_CONNECT_TIMEOUT_SECS),
        };

        Ok(Self { api_key, models, openai_base_url, timeouts })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
