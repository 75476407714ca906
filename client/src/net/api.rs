//! HTTP client for the search service.
//!
//! ERROR HANDLING
//! ==============
//! Every call returns `Result<_, ApiError>`. Transport failures, non-2xx
//! statuses and undecodable bodies are distinct variants so surfaces can
//! word their inline notices; none of them panic. Callers of
//! [`SearchApi::suggest_terms`] treat any error as the empty result and fall
//! back to the raw typed input.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use wire::{ErrorBody, PassageResponse, TermSuggestResult, TestimonySearchResponse};

use crate::config::ClientConfig;
use crate::state::bible::BibleSearchSettings;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, timeout, ...).
    #[error("request failed: {0}")]
    Transport(String),
    /// The service answered with a non-success status.
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
    /// The body could not be decoded into the expected shape.
    #[error("invalid response body: {0}")]
    Decode(String),
}

/// The search service as seen by a surface. Implemented over HTTP by
/// [`HttpSearchApi`]; tests substitute in-memory fakes.
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
pub trait SearchApi {
    /// `GET /search`.
    async fn search_passages(
        &self,
        query: &str,
        settings: &BibleSearchSettings,
    ) -> Result<PassageResponse, ApiError>;

    /// `GET /testimonies-suggest`: the user's terms with derivatives plus
    /// AI-suggested related terms.
    async fn suggest_terms(&self, query: &str) -> Result<TermSuggestResult, ApiError>;

    /// `GET /testimonies-search` with the assembled term list.
    async fn search_testimonies(&self, terms: &[String]) -> Result<TestimonySearchResponse, ApiError>;

    /// `GET /` liveness probe.
    async fn health(&self) -> Result<(), ApiError>;
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim_end_matches('/'))
}

/// Comma-join terms for the `terms` query parameter.
fn join_terms(terms: &[String]) -> String {
    terms.join(",")
}

fn status_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error,
        Err(_) if body.trim().is_empty() => format!("HTTP {status}"),
        Err(_) => body.trim().to_owned(),
    }
}

pub struct HttpSearchApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpSearchApi {
    /// Build a client for `config.base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(config.request_timeout);
        let http = builder
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self { http, base_url: config.base_url.trim_end_matches('/').to_owned() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T, ApiError> {
        let url = endpoint(&self.base_url, path);
        debug!(%url, "api: GET");
        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        if !(200..300).contains(&status) {
            warn!(%url, status, "api: non-success status");
            return Err(ApiError::Status { status, message: status_message(status, &body) });
        }
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
impl SearchApi for HttpSearchApi {
    async fn search_passages(
        &self,
        query: &str,
        settings: &BibleSearchSettings,
    ) -> Result<PassageResponse, ApiError> {
        self.get_json(
            "/search",
            &[
                ("query", query),
                ("result_count", settings.result_count.as_str()),
                ("content_type", settings.content_type.as_str()),
                ("model_type", settings.model_type.as_str()),
            ],
        )
        .await
    }

    async fn suggest_terms(&self, query: &str) -> Result<TermSuggestResult, ApiError> {
        self.get_json("/testimonies-suggest", &[("query", query)])
            .await
    }

    async fn search_testimonies(&self, terms: &[String]) -> Result<TestimonySearchResponse, ApiError> {
        let joined = join_terms(terms);
        self.get_json("/testimonies-search", &[("terms", joined.as_str())])
            .await
    }

    async fn health(&self) -> Result<(), ApiError> {
        let _: serde_json::Value = self.get_json("/", &[]).await?;
        Ok(())
    }
}
