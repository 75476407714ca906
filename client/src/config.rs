//! Client configuration.
//!
//! Built explicitly by the embedding front end; the library never reads the
//! environment itself.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_SUGGEST_DEBOUNCE_MS: u64 = 500;

/// When the testimony surface asks the service for related terms.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SuggestMode {
    /// Fetch on every input change, debounced, so suggestions are visible
    /// before the user presses search.
    Eager,
    /// Fetch only when the user submits a search.
    #[default]
    OnSubmit,
}

impl FromStr for SuggestMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eager" => Ok(Self::Eager),
            "submit" | "on_submit" | "on-submit" => Ok(Self::OnSubmit),
            other => Err(format!("unknown suggest mode '{other}' (expected 'eager' or 'submit')")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Search service root, without a trailing slash.
    pub base_url: String,
    pub request_timeout: Duration,
    /// Quiet period before an eager suggestion fetch fires.
    pub suggest_debounce: Duration,
    pub suggest_mode: SuggestMode,
}

impl ClientConfig {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self { base_url: base_url.trim_end_matches('/').to_owned(), ..Self::default() }
    }

    #[must_use]
    pub fn with_suggest_mode(mut self, mode: SuggestMode) -> Self {
        self.suggest_mode = mode;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            suggest_debounce: Duration::from_millis(DEFAULT_SUGGEST_DEBOUNCE_MS),
            suggest_mode: SuggestMode::OnSubmit,
        }
    }
}
