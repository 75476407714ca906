//! Bible search surface: passage lookup through the AI search endpoint.

#[cfg(test)]
#[path = "bible_test.rs"]
mod bible_test;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use wire::{ContentType, ModelType, PassageResponse, ResultCount};

use super::chat::{ChatSession, NewMessage, Surface};
use crate::net::api::{ApiError, SearchApi};

/// Search controls snapshotted onto each user message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BibleSearchSettings {
    pub result_count: ResultCount,
    pub content_type: ContentType,
    pub model_type: ModelType,
}

#[derive(Clone, Debug)]
pub struct BibleSearch {
    pub session: ChatSession,
    pub settings: BibleSearchSettings,
    searching: bool,
}

impl Default for BibleSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl BibleSearch {
    #[must_use]
    pub fn new() -> Self {
        Self { session: ChatSession::new(Surface::Bible), settings: BibleSearchSettings::default(), searching: false }
    }

    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.searching
    }

    /// Record the user turn. Returns the trimmed query to send, or `None`
    /// for blank input.
    pub fn begin_search(&mut self, query: &str) -> Option<String> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        self.session
            .add_message(NewMessage::user(query).with_settings(self.settings));
        self.searching = true;
        Some(query.to_owned())
    }

    /// Record the assistant turn for a finished search. Failures become an
    /// assistant message describing the error.
    pub fn finish_search(&mut self, outcome: Result<PassageResponse, ApiError>) {
        self.searching = false;
        match outcome {
            Ok(response) => {
                let text = describe_passages(&response);
                let payload = serde_json::to_value(&response).unwrap_or_default();
                self.session
                    .add_message(NewMessage::assistant(text).with_result(payload));
            }
            Err(e) => {
                warn!(error = %e, "bible: search failed");
                self.session
                    .add_message(NewMessage::assistant(format!("Search failed: {e}")));
            }
        }
    }

    /// Send `query` and append both turns to the session.
    pub async fn submit<A: SearchApi + ?Sized>(&mut self, api: &A, query: &str) {
        let Some(query) = self.begin_search(query) else {
            return;
        };
        info!(%query, result_count = self.settings.result_count.as_str(), "bible: search");
        let outcome = api.search_passages(&query, &self.settings).await;
        self.finish_search(outcome);
    }
}

/// One-line summary of a passage response for the assistant message.
#[must_use]
pub fn describe_passages(response: &PassageResponse) -> String {
    if response.passages.is_empty() && response.secondary_passages.is_empty() {
        return "No passages found.".to_owned();
    }
    if response.passages.is_empty() {
        return format!("No direct passages found (+{} related).", response.secondary_passages.len());
    }
    let labels = response
        .passages
        .iter()
        .map(wire::Passage::label)
        .collect::<Vec<_>>()
        .join(", ");
    let noun = if response.passages.len() == 1 { "passage" } else { "passages" };
    let mut text = format!("Found {} {noun}: {labels}", response.passages.len());
    if !response.secondary_passages.is_empty() {
        text.push_str(&format!(" (+{} related)", response.secondary_passages.len()));
    }
    text
}
