//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the optional LLM client, the model roster, the read-only
//! testimony corpus and process-local usage counters. Every field is
//! cheap to clone.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::llm::{LlmChat, LlmModels};
use crate::services::testimonies::Corpus;

// =============================================================================
// USAGE STATS
// =============================================================================

#[derive(Debug, Default)]
pub struct UsageStats {
    total_requests: AtomicU64,
    search_requests: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UsageSnapshot {
    pub total_requests: u64,
    pub search_requests: u64,
}

impl UsageStats {
    /// Count one request; returns its 1-based ordinal.
    pub fn record_request(&self) -> u64 {
        self.total_requests.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn record_search(&self) {
        self.search_requests.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn snapshot(&self) -> UsageSnapshot {
        UsageSnapshot {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            search_requests: self.search_requests.load(Ordering::Relaxed),
        }
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state, injected into Axum handlers via State extractor.
#[derive(Clone)]
pub struct AppState {
    /// Optional LLM client. `None` if LLM env vars are not configured.
    pub llm: Option<Arc<dyn LlmChat>>,
    pub models: LlmModels,
    pub corpus: Arc<Corpus>,
    pub stats: Arc<UsageStats>,
}

impl AppState {
    #[must_use]
    pub fn new(llm: Option<Arc<dyn LlmChat>>, models: LlmModels, corpus: Corpus) -> Self {
        Self { llm, models, corpus: Arc::new(corpus), stats: Arc::new(UsageStats::default()) }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
