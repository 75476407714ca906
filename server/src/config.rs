//! Server configuration parsed from environment variables.

use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_TESTIMONIES_PATH: &str = "testimonies.jsonl";
pub const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "https://marko-polo-cheno.github.io",
    "http://localhost:3000",
    "http://localhost:5173",
    "http://localhost:5174",
    "http://localhost:5175",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub testimonies_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|o| (*o).to_string()).collect(),
            testimonies_path: PathBuf::from(DEFAULT_TESTIMONIES_PATH),
        }
    }
}

impl ServerConfig {
    /// - `PORT`: default 8080
    /// - `CORS_ALLOWED_ORIGINS`: comma-separated origin allow-list
    /// - `TESTIMONIES_PATH`: JSONL corpus, default `testimonies.jsonl`
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let cors_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|raw| wire::split_terms(&raw))
            .filter(|origins| !origins.is_empty())
            .unwrap_or(defaults.cors_origins);
        let testimonies_path = lookup("TESTIMONIES_PATH")
            .filter(|p| !p.trim().is_empty())
            .map_or(defaults.testimonies_path, PathBuf::from);

        Self { port: parse_or(&lookup, "PORT", DEFAULT_PORT), cors_origins, testimonies_path }
    }
}

/// Parse `key` from `lookup`, falling back to `default` when absent or invalid.
pub(crate) fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    lookup(key)
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
