//! Testimony corpus: JSONL loading and keyword hit counting.
//!
//! DESIGN
//! ======
//! The corpus is read once at start-up and held immutable behind an `Arc`
//! in `AppState`. Content is case-folded at load so a search only folds
//! the terms. Hit counts are non-overlapping substring occurrences summed
//! over all terms.

#[cfg(test)]
#[path = "testimonies_test.rs"]
mod tests;

use std::path::Path;

use tracing::{error, info, warn};
use wire::TestimonyHit;
pub use wire::Testimony;

#[derive(Debug, Clone)]
struct Entry {
    testimony: Testimony,
    folded: String,
}

#[derive(Debug, Clone, Default)]
pub struct Corpus {
    entries: Vec<Entry>,
}

impl Corpus {
    #[must_use]
    pub fn new(testimonies: Vec<Testimony>) -> Self {
        let entries = testimonies
            .into_iter()
            .map(|testimony| Entry { folded: testimony.content.to_lowercase(), testimony })
            .collect();
        Self { entries }
    }

    /// Parse JSONL text. Blank lines are skipped; malformed lines are
    /// skipped with a warning.
    #[must_use]
    pub fn parse_jsonl(text: &str) -> Self {
        let mut testimonies = Vec::new();
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<Testimony>(line) {
                Ok(testimony) => testimonies.push(testimony),
                Err(e) => warn!(line = index + 1, error = %e, "testimonies: skipping malformed line"),
            }
        }
        Self::new(testimonies)
    }

    /// Load the corpus file. An unreadable file yields an empty corpus.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let corpus = Self::parse_jsonl(&text);
                info!(path = %path.display(), count = corpus.len(), "testimonies: corpus loaded");
                corpus
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "testimonies: failed to read corpus, search disabled");
                Self::default()
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Testimonies with at least one hit, by hit count descending. Ties keep
    /// corpus order.
    #[must_use]
    pub fn search(&self, terms: &[String]) -> Vec<TestimonyHit> {
        let folded: Vec<String> = terms
            .iter()
            .map(|t| t.to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        let mut hits: Vec<TestimonyHit> = self
            .entries
            .iter()
            .filter_map(|entry| {
                let hit_count: usize = folded
                    .iter()
                    .map(|term| entry.folded.matches(term.as_str()).count())
                    .sum();
                (hit_count > 0).then(|| TestimonyHit {
                    filename: entry.testimony.filename.clone(),
                    link: entry.testimony.link.clone(),
                    hit_count: hit_count as u64,
                })
            })
            .collect();
        hits.sort_by(|a, b| b.hit_count.cmp(&a.hit_count));
        hits
    }
}
