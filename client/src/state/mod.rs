//! Per-surface client state.
//!
//! DESIGN
//! ======
//! Each chat surface owns its own `ChatSession`; nothing here is global.
//! `terms` is the pure assembly pipeline, `bible` and `testimony` drive a
//! surface from user input to appended chat messages.

pub mod bible;
pub mod chat;
pub mod terms;
pub mod testimony;

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub(crate) mod test_helpers {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use wire::{PassageResponse, TermSuggestResult, TestimonySearchResponse};

    use super::bible::BibleSearchSettings;
    use crate::net::api::{ApiError, SearchApi};

    /// Scripted `SearchApi`: each endpoint pops its next queued outcome and
    /// records the arguments it was called with.
    #[derive(Default)]
    pub struct FakeApi {
        pub passages: Mutex<VecDeque<Result<PassageResponse, ApiError>>>,
        pub suggestions: Mutex<VecDeque<Result<TermSuggestResult, ApiError>>>,
        pub testimonies: Mutex<VecDeque<Result<TestimonySearchResponse, ApiError>>>,
        pub suggest_calls: Mutex<Vec<String>>,
        pub search_calls: Mutex<Vec<Vec<String>>>,
    }

    impl FakeApi {
        pub fn push_passages(&self, outcome: Result<PassageResponse, ApiError>) {
            self.passages.lock().unwrap().push_back(outcome);
        }

        pub fn push_suggestions(&self, outcome: Result<TermSuggestResult, ApiError>) {
            self.suggestions.lock().unwrap().push_back(outcome);
        }

        pub fn push_testimonies(&self, outcome: Result<TestimonySearchResponse, ApiError>) {
            self.testimonies.lock().unwrap().push_back(outcome);
        }
    }

    #[async_trait::async_trait]
    impl SearchApi for FakeApi {
        async fn search_passages(
            &self,
            _query: &str,
            _settings: &BibleSearchSettings,
        ) -> Result<PassageResponse, ApiError> {
            self.passages
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(PassageResponse::default()))
        }

        async fn suggest_terms(&self, query: &str) -> Result<TermSuggestResult, ApiError> {
            self.suggest_calls.lock().unwrap().push(query.to_owned());
            self.suggestions
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(TermSuggestResult::default()))
        }

        async fn search_testimonies(&self, terms: &[String]) -> Result<TestimonySearchResponse, ApiError> {
            self.search_calls.lock().unwrap().push(terms.to_vec());
            self.testimonies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(TestimonySearchResponse { search_terms: terms.to_vec(), results: vec![] }))
        }

        async fn health(&self) -> Result<(), ApiError> {
            Ok(())
        }
    }
}
