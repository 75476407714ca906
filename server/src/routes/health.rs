//! Liveness and usage endpoints.

use axum::extract::State;
use axum::response::Json;
use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::state::{AppState, UsageSnapshot};

const ANALYTICS_MESSAGE: &str = "Analytics endpoint - check logs for detailed usage tracking";

#[derive(Debug, Serialize)]
pub struct Analytics {
    pub message: &'static str,
    pub timestamp: String,
    pub usage_stats: UsageSnapshot,
}

pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn analytics(State(state): State<AppState>) -> Json<Analytics> {
    let timestamp = OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default();
    Json(Analytics { message: ANALYTICS_MESSAGE, timestamp, usage_stats: state.stats.snapshot() })
}
