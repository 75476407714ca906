//! `GET /testimonies-suggest` and `GET /testimonies-search`.

use std::time::Instant;

use axum::extract::{Query, State};
use axum::response::Json;
use serde::Deserialize;
use tracing::info;
use wire::{TermSuggestResult, TestimonySearchResponse, split_terms};

use super::ApiError;
use crate::services::suggest;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SuggestParams {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct TermsParams {
    #[serde(default)]
    pub terms: String,
}

pub async fn suggest(
    State(state): State<AppState>,
    Query(params): Query<SuggestParams>,
) -> Result<Json<TermSuggestResult>, ApiError> {
    let query = params.query.trim();
    if query.is_empty() {
        return Err(ApiError::BadRequest("Missing query parameter".into()));
    }
    let llm = state.llm.as_deref().ok_or(ApiError::LlmUnavailable)?;

    let started = Instant::now();
    let result = suggest::suggest_terms(llm, &state.models, query).await?;
    info!(%query, suggestions = result.suggestions.len(), elapsed_ms = started.elapsed().as_millis(), "suggest: done");
    Ok(Json(result))
}

/// Keyword search over the corpus. No LLM involved.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<TermsParams>,
) -> Result<Json<TestimonySearchResponse>, ApiError> {
    if params.terms.is_empty() {
        return Err(ApiError::BadRequest("Missing terms parameter".into()));
    }
    let search_terms = split_terms(&params.terms);
    if search_terms.is_empty() {
        return Err(ApiError::BadRequest("No valid search terms".into()));
    }

    let results = state.corpus.search(&search_terms);
    info!(terms = search_terms.len(), hits = results.len(), "testimonies: search done");
    Ok(Json(TestimonySearchResponse { search_terms, results }))
}

#[cfg(test)]
#[path = "testimonies_test.rs"]
mod tests;
