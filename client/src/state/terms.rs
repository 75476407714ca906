//! Search-term assembly for testimony search.
//!
//! DESIGN
//! ======
//! The assembled list is the literal term list sent to
//! `/testimonies-search`. It must be a pure function of UI state: the same
//! query terms, suggestions, selection and toggles always yield the same
//! ordered list. No two entries are equal case-insensitively; the first
//! occurrence wins and fixes both spelling and position.
//!
//! Selection invariant: while the AI-suggestions toggle is off the
//! selection is empty, so `assemble` needs no separate toggle argument.

#[cfg(test)]
#[path = "terms_test.rs"]
mod terms_test;

use std::collections::HashSet;

use wire::{EnrichedTerm, split_terms, term_key};

/// Ordered, case-insensitively unique term accumulator.
#[derive(Clone, Debug, Default)]
pub struct TermList {
    terms: Vec<String>,
    seen: HashSet<String>,
}

impl TermList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `term` unless an equal term (ignoring case) is already present.
    /// Returns whether it was added.
    pub fn push(&mut self, term: &str) -> bool {
        if term.is_empty() || !self.seen.insert(term_key(term)) {
            return false;
        }
        self.terms.push(term.to_owned());
        true
    }

    /// Append an enriched term and, optionally, its derivatives in order.
    pub fn push_enriched(&mut self, term: &EnrichedTerm, include_derivatives: bool) {
        self.push(&term.term);
        if include_derivatives {
            for derivative in &term.derivatives {
                self.push(derivative);
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.terms
    }
}

/// The set of suggestion terms the user currently has ticked.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: HashSet<String>,
}

impl SelectionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selection with every given suggestion ticked.
    #[must_use]
    pub fn all_of(suggestions: &[EnrichedTerm]) -> Self {
        let mut state = Self::new();
        state.select_all(suggestions);
        state
    }

    /// Replace the selection with every given suggestion.
    pub fn select_all(&mut self, suggestions: &[EnrichedTerm]) {
        self.selected = suggestions.iter().map(|s| s.term.clone()).collect();
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Flip membership of `term`; returns the new membership.
    pub fn toggle(&mut self, term: &str) -> bool {
        if self.selected.remove(term) {
            false
        } else {
            self.selected.insert(term.to_owned());
            true
        }
    }

    pub fn remove(&mut self, term: &str) {
        self.selected.remove(term);
    }

    #[must_use]
    pub fn contains(&self, term: &str) -> bool {
        self.selected.contains(term)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

/// Merge the user's terms, selected suggestions and optional derivatives
/// into the final term list.
///
/// 1. Each query term, then (if `include_derivatives`) its derivatives.
/// 2. If `query_terms` is empty, the comma-split `raw_query_fallback`.
/// 3. Each suggestion in `selected`, then its derivatives if enabled.
#[must_use]
pub fn assemble(
    query_terms: &[EnrichedTerm],
    suggestions: &[EnrichedTerm],
    selected: &SelectionState,
    include_derivatives: bool,
    raw_query_fallback: &str,
) -> Vec<String> {
    let mut list = TermList::new();

    for term in query_terms {
        list.push_enriched(term, include_derivatives);
    }

    if query_terms.is_empty() {
        for term in split_terms(raw_query_fallback) {
            list.push(&term);
        }
    }

    for suggestion in suggestions.iter().filter(|s| selected.contains(&s.term)) {
        list.push_enriched(suggestion, include_derivatives);
    }

    list.into_vec()
}
