//! Testimony search surface: term enrichment, selection, and keyword search.
//!
//! DESIGN
//! ======
//! Enrichment requests are split into `begin_suggest` (tag + query) and
//! `apply_suggest` (guarded write) so a driver can keep several requests in
//! flight. Only the response carrying the latest tag is applied; anything
//! older is dropped. `SuggestMode` decides whether enrichment runs on input
//! change (debounced by the driver) or only at submit time.

#[cfg(test)]
#[path = "testimony_test.rs"]
mod testimony_test;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use wire::{EnrichedTerm, TermSuggestResult, TestimonySearchResponse};

use super::chat::{ChatSession, NewMessage, Surface};
use super::terms::{SelectionState, assemble};
use crate::config::SuggestMode;
use crate::net::api::{ApiError, SearchApi};
use crate::util::debounce::{DebounceTicket, Debouncer};
use crate::util::seq::RequestSeq;

pub const NO_TERMS_NOTICE: &str = "Enter at least one search term.";

/// Controls snapshotted onto each user message.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestimonySearchSettings {
    pub ai_suggestions: bool,
    pub include_derivatives: bool,
    /// The exact term list sent to the search endpoint.
    pub terms: Vec<String>,
}

/// What the driver should do after an input change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEffect {
    None,
    /// Eager mode: (re)schedule a debounced enrichment fetch.
    ScheduleSuggest,
}

/// A tagged enrichment request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SuggestTicket {
    pub seq: u64,
    pub query: String,
}

#[derive(Clone, Debug)]
pub struct TestimonySearch {
    pub session: ChatSession,
    mode: SuggestMode,
    input: String,
    ai_enabled: bool,
    include_derivatives: bool,
    query_terms: Vec<EnrichedTerm>,
    suggestions: Vec<EnrichedTerm>,
    selected: SelectionState,
    seq: RequestSeq,
    loading_suggestions: bool,
    searching: bool,
}

impl TestimonySearch {
    #[must_use]
    pub fn new(mode: SuggestMode) -> Self {
        Self {
            session: ChatSession::new(Surface::Testimony),
            mode,
            input: String::new(),
            ai_enabled: true,
            include_derivatives: false,
            query_terms: Vec::new(),
            suggestions: Vec::new(),
            selected: SelectionState::new(),
            seq: RequestSeq::default(),
            loading_suggestions: false,
            searching: false,
        }
    }

    #[must_use]
    pub fn mode(&self) -> SuggestMode {
        self.mode
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[must_use]
    pub fn ai_enabled(&self) -> bool {
        self.ai_enabled
    }

    #[must_use]
    pub fn include_derivatives(&self) -> bool {
        self.include_derivatives
    }

    #[must_use]
    pub fn query_terms(&self) -> &[EnrichedTerm] {
        &self.query_terms
    }

    #[must_use]
    pub fn suggestions(&self) -> &[EnrichedTerm] {
        &self.suggestions
    }

    #[must_use]
    pub fn selected(&self) -> &SelectionState {
        &self.selected
    }

    #[must_use]
    pub fn is_loading_suggestions(&self) -> bool {
        self.loading_suggestions
    }

    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.searching
    }

    /// Replace the input text. Loaded query terms and in-flight enrichment
    /// requests describe the previous input and are dropped; suggestions stay
    /// visible until new ones arrive.
    pub fn set_input(&mut self, text: &str) -> InputEffect {
        if text == self.input {
            return InputEffect::None;
        }
        self.input = text.to_owned();
        self.query_terms.clear();
        self.seq.invalidate();
        self.loading_suggestions = false;

        if text.trim().is_empty() {
            self.suggestions.clear();
            self.selected.clear();
            return InputEffect::None;
        }
        match self.mode {
            SuggestMode::Eager => InputEffect::ScheduleSuggest,
            SuggestMode::OnSubmit => InputEffect::None,
        }
    }

    /// Tag a new enrichment request for the current input. Any request
    /// already in flight becomes stale.
    pub fn begin_suggest(&mut self) -> Option<SuggestTicket> {
        let query = self.input.trim();
        if query.is_empty() {
            return None;
        }
        let query = query.to_owned();
        let seq = self.seq.issue();
        self.loading_suggestions = true;
        debug!(seq, %query, "testimony: suggest issued");
        Some(SuggestTicket { seq, query })
    }

    /// Apply an enrichment response. Returns `false` (and leaves state
    /// untouched) when `seq` is not the latest issued request.
    pub fn apply_suggest(&mut self, seq: u64, outcome: Result<TermSuggestResult, ApiError>) -> bool {
        if !self.seq.is_latest(seq) {
            debug!(seq, latest = self.seq.latest(), "testimony: discarding stale suggestions");
            return false;
        }
        self.loading_suggestions = false;
        let result = match outcome {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "testimony: suggest failed, using typed input only");
                self.session
                    .set_notice(format!("Could not load suggested terms: {e}"));
                TermSuggestResult::default()
            }
        };
        self.query_terms = result.query_terms;
        self.suggestions = result.suggestions;
        if self.ai_enabled {
            self.selected.select_all(&self.suggestions);
        } else {
            self.selected.clear();
        }
        true
    }

    /// Turning suggestions off clears the selection; turning them back on
    /// selects every loaded suggestion.
    pub fn set_ai_enabled(&mut self, enabled: bool) {
        self.ai_enabled = enabled;
        if enabled {
            self.selected.select_all(&self.suggestions);
        } else {
            self.selected.clear();
        }
    }

    pub fn set_include_derivatives(&mut self, include: bool) {
        self.include_derivatives = include;
    }

    /// Tick or untick one suggestion. Ignored while suggestions are off or
    /// when `term` is not a loaded suggestion.
    pub fn toggle_suggestion(&mut self, term: &str) -> bool {
        if !self.ai_enabled || !self.suggestions.iter().any(|s| s.term == term) {
            return false;
        }
        self.selected.toggle(term)
    }

    /// Drop a suggestion for the rest of this query cycle.
    pub fn remove_suggestion(&mut self, term: &str) {
        self.suggestions.retain(|s| s.term != term);
        self.selected.remove(term);
    }

    /// The term list a search submitted now would send.
    #[must_use]
    pub fn assembled_terms(&self) -> Vec<String> {
        let empty = SelectionState::new();
        let selected = if self.ai_enabled { &self.selected } else { &empty };
        assemble(&self.query_terms, &self.suggestions, selected, self.include_derivatives, &self.input)
    }

    /// Record the user turn. Returns the term list to send, or `None` (with
    /// a notice) when nothing would be searched.
    pub fn begin_search(&mut self) -> Option<Vec<String>> {
        let terms = self.assembled_terms();
        if terms.is_empty() {
            self.session.set_notice(NO_TERMS_NOTICE);
            return None;
        }
        let settings = TestimonySearchSettings {
            ai_suggestions: self.ai_enabled,
            include_derivatives: self.include_derivatives,
            terms: terms.clone(),
        };
        let query = self.input.trim().to_owned();
        self.session
            .add_message(NewMessage::user(query).with_settings(settings));
        self.searching = true;
        Some(terms)
    }

    /// Record the assistant turn for a finished search.
    pub fn finish_search(&mut self, outcome: Result<TestimonySearchResponse, ApiError>) {
        self.searching = false;
        match outcome {
            Ok(response) => {
                let text = describe_hits(&response);
                let payload = serde_json::to_value(&response).unwrap_or_default();
                self.session
                    .add_message(NewMessage::assistant(text).with_result(payload));
            }
            Err(e) => {
                warn!(error = %e, "testimony: search failed");
                self.session
                    .add_message(NewMessage::assistant(format!("Search failed: {e}")));
            }
        }
    }

    /// Fetch and apply enrichment for the current input.
    pub async fn refresh_suggestions<A: SearchApi + ?Sized>(&mut self, api: &A) -> bool {
        let Some(ticket) = self.begin_suggest() else {
            return false;
        };
        let outcome = api.suggest_terms(&ticket.query).await;
        self.apply_suggest(ticket.seq, outcome)
    }

    /// Eager mode: wait out the debounce window, then refresh if `ticket`
    /// is still the latest scheduled one.
    pub async fn refresh_when_settled<A: SearchApi + ?Sized>(
        &mut self,
        api: &A,
        debouncer: &Debouncer,
        ticket: DebounceTicket,
    ) -> bool {
        if !debouncer.settle(ticket).await {
            return false;
        }
        self.refresh_suggestions(api).await
    }

    /// Run a search for the current input. In `OnSubmit` mode enrichment is
    /// fetched first; in `Eager` mode whatever is loaded is used.
    pub async fn submit<A: SearchApi + ?Sized>(&mut self, api: &A) {
        if self.mode == SuggestMode::OnSubmit {
            self.refresh_suggestions(api).await;
        }
        let Some(terms) = self.begin_search() else {
            return;
        };
        info!(count = terms.len(), "testimony: search");
        let outcome = api.search_testimonies(&terms).await;
        self.finish_search(outcome);
    }
}

/// One-line summary of a testimony search for the assistant message.
#[must_use]
pub fn describe_hits(response: &TestimonySearchResponse) -> String {
    let terms = response.search_terms.len();
    let term_noun = if terms == 1 { "term" } else { "terms" };
    match response.results.len() {
        0 => format!("No testimonies matched {terms} {term_noun}."),
        1 => format!("Found 1 testimony matching {terms} {term_noun}."),
        n => format!("Found {n} testimonies matching {terms} {term_noun}."),
    }
}
