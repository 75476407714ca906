//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the public HTTP GET endpoints consumed by the search
//! clients. Every non-success response carries a JSON `{"error": ...}`
//! body. Requests are counted and logged by a middleware layer, traced by
//! `TraceLayer`, and filtered by a CORS origin allow-list.

pub mod health;
pub mod search;
pub mod testimonies;

use std::time::Instant;

use axum::Router;
use axum::extract::{Request, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use wire::{ErrorBody, ParseSettingError};

use crate::llm::LlmError;
use crate::state::AppState;

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("AI search is not configured on this server")]
    LlmUnavailable,
    #[error("{0}")]
    Llm(#[from] LlmError),
}

impl From<ParseSettingError> for ApiError {
    fn from(err: ParseSettingError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::LlmUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Llm(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Llm(e) => error!(error = %e, retryable = e.retryable(), "request failed"),
            Self::LlmUnavailable => warn!("request needs an LLM but none is configured"),
            Self::BadRequest(msg) => info!(%msg, "rejected request"),
        }
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

// =============================================================================
// ROUTER
// =============================================================================

/// Full application router.
pub fn app(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(health::health_check))
        .route("/analytics", get(health::analytics))
        .route("/search", get(search::search_passages))
        .route("/testimonies-suggest", get(testimonies::suggest))
        .route("/testimonies-search", get(testimonies::search))
        .layer(middleware::from_fn_with_state(state.clone(), count_requests))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "cors: ignoring invalid origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn count_requests(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let ordinal = state.stats.record_request();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let origin = request
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    info!(
        ordinal,
        %method,
        %path,
        %origin,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis(),
        "request served"
    );
    response
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub(crate) mod test_helpers {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::config::ServerConfig;
    use crate::state::AppState;

    /// Send one GET through the full router and decode the JSON body.
    pub async fn get_json(state: AppState, uri: &str) -> (StatusCode, Value) {
        let app = super::app(state, &ServerConfig::default().cors_origins);
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
