//! Shared HTTP contract for the search client and the search service.
//!
//! This crate owns the JSON shapes exchanged over `/search`,
//! `/testimonies-suggest`, and `/testimonies-search`, so `server` and
//! `client` cannot drift apart. It performs no I/O.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a query-string setting does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {param}: {value}")]
pub struct ParseSettingError {
    /// Query parameter name (e.g. `result_count`).
    pub param: &'static str,
    /// The rejected raw value.
    pub value: String,
}

// =============================================================================
// SEARCH SETTINGS
// =============================================================================

/// How many primary passages the Bible search should aim for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultCount {
    One,
    #[default]
    Few,
    Many,
}

impl ResultCount {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::One => "one",
            Self::Few => "few",
            Self::Many => "many",
        }
    }
}

impl FromStr for ResultCount {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "one" => Ok(Self::One),
            "few" => Ok(Self::Few),
            "many" => Ok(Self::Many),
            other => Err(ParseSettingError { param: "result_count", value: other.to_owned() }),
        }
    }
}

/// Whether the Bible search prefers single verses, whole sections, or both.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    #[default]
    Verses,
    Passages,
    All,
}

impl ContentType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Verses => "verses",
            Self::Passages => "passages",
            Self::All => "all",
        }
    }
}

impl FromStr for ContentType {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "verses" => Ok(Self::Verses),
            "passages" => Ok(Self::Passages),
            "all" => Ok(Self::All),
            other => Err(ParseSettingError { param: "content_type", value: other.to_owned() }),
        }
    }
}

/// Model tier used by the Bible search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    #[default]
    Fast,
    Advanced,
}

impl ModelType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Advanced => "advanced",
        }
    }
}

impl FromStr for ModelType {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fast" => Ok(Self::Fast),
            "advanced" => Ok(Self::Advanced),
            other => Err(ParseSettingError { param: "model_type", value: other.to_owned() }),
        }
    }
}

// =============================================================================
// PASSAGES
// =============================================================================

/// A single verse or a verse range returned by the Bible search.
///
/// Untagged on the wire: the variant is recognised by its field set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Passage {
    Verse {
        book: String,
        chapter: u32,
        verse: u32,
    },
    VerseRange {
        book: String,
        start_chapter: u32,
        start_verse: u32,
        end_chapter: u32,
        end_verse: u32,
    },
}

impl Passage {
    #[must_use]
    pub fn book(&self) -> &str {
        match self {
            Self::Verse { book, .. } | Self::VerseRange { book, .. } => book,
        }
    }

    /// Human-readable reference such as `John 3:16` or `Jonah 2:1-3:4`.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Verse { book, chapter, verse } => format!("{book} {chapter}:{verse}"),
            Self::VerseRange { book, start_chapter, start_verse, end_chapter, end_verse } => {
                if start_chapter == end_chapter {
                    format!("{book} {start_chapter}:{start_verse}-{end_verse}")
                } else {
                    format!("{book} {start_chapter}:{start_verse}-{end_chapter}:{end_verse}")
                }
            }
        }
    }
}

impl fmt::Display for Passage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Response body of `GET /search`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassageResponse {
    /// Passages that directly answer the query.
    pub passages: Vec<Passage>,
    /// Related passages that are relevant but not a direct answer.
    #[serde(default)]
    pub secondary_passages: Vec<Passage>,
}

// =============================================================================
// TESTIMONIES
// =============================================================================

/// One line of the testimony corpus file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Testimony {
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub content: String,
    /// First link found in the content, or empty.
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub all_links: Vec<String>,
    /// Why the document could not be read; its content is then empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A testimony document matching at least one search term.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestimonyHit {
    pub filename: String,
    pub link: String,
    /// Total case-insensitive occurrences of all search terms in the document.
    #[serde(rename = "hitCount")]
    pub hit_count: u64,
}

/// Response body of `GET /testimonies-search`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestimonySearchResponse {
    /// The terms the service actually matched against, after splitting.
    #[serde(rename = "searchTerms")]
    pub search_terms: Vec<String>,
    /// Hits sorted by `hit_count` descending.
    pub results: Vec<TestimonyHit>,
}

/// A term plus its morphological variants.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedTerm {
    pub term: String,
    #[serde(default)]
    pub derivatives: Vec<String>,
}

impl EnrichedTerm {
    #[must_use]
    pub fn new(term: impl Into<String>, derivatives: Vec<String>) -> Self {
        Self { term: term.into(), derivatives }
    }
}

/// Response body of `GET /testimonies-suggest`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermSuggestResult {
    /// The caller's own comma-separated terms, input order preserved.
    #[serde(rename = "queryTerms", default)]
    pub query_terms: Vec<EnrichedTerm>,
    /// AI-proposed additional terms, order as returned by the service.
    #[serde(default)]
    pub suggestions: Vec<EnrichedTerm>,
}

impl TermSuggestResult {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.query_terms.is_empty() && self.suggestions.is_empty()
    }
}

/// JSON body of every non-success response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

// =============================================================================
// TERM HELPERS
// =============================================================================

/// Split a comma-separated term list, trimming whitespace and dropping
/// empty segments. `"joy, peace,, hope"` yields `["joy", "peace", "hope"]`.
#[must_use]
pub fn split_terms(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Key under which two terms are considered equal (case-insensitive).
#[must_use]
pub fn term_key(term: &str) -> String {
    term.to_lowercase()
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod lib_test;
