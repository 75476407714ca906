//! `GET /search`: AI Bible passage search.

use std::str::FromStr;
use std::time::Instant;

use axum::extract::{Query, State};
use axum::response::Json;
use serde::Deserialize;
use tracing::info;
use wire::{ParseSettingError, PassageResponse};

use super::ApiError;
use crate::services::passages::{self, PassageQuery};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
    pub result_count: Option<String>,
    pub content_type: Option<String>,
    pub model_type: Option<String>,
}

/// Absent or empty parameters take the setting's default.
fn setting<T>(raw: Option<&str>) -> Result<T, ParseSettingError>
where
    T: FromStr<Err = ParseSettingError> + Default,
{
    match raw.map(str::trim) {
        None | Some("") => Ok(T::default()),
        Some(value) => value.parse(),
    }
}

impl SearchParams {
    fn settings(&self) -> Result<PassageQuery, ParseSettingError> {
        Ok(PassageQuery {
            result_count: setting(self.result_count.as_deref())?,
            content_type: setting(self.content_type.as_deref())?,
            model_type: setting(self.model_type.as_deref())?,
        })
    }
}

pub async fn search_passages(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<PassageResponse>, ApiError> {
    state.stats.record_search();
    let query = params.query.trim();
    if query.is_empty() {
        return Err(ApiError::BadRequest("Missing query parameter".into()));
    }
    let settings = params.settings()?;
    let llm = state.llm.as_deref().ok_or(ApiError::LlmUnavailable)?;

    let started = Instant::now();
    let result = passages::find_passages(llm, &state.models, query, settings).await?;
    info!(
        %query,
        model_type = settings.model_type.as_str(),
        passages = result.passages.len(),
        elapsed_ms = started.elapsed().as_millis(),
        "search: passages found"
    );
    Ok(Json(result))
}

#[cfg(test)]
#[path = "search_test.rs"]
mod tests;
