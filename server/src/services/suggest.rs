//! Related-term suggestions for testimony search.
//!
//! DESIGN
//! ======
//! The user's own comma-separated terms are echoed back as `queryTerms`
//! with derivatives; the LLM only proposes additions. Its list is cleaned
//! before it reaches the client: trimmed, empties dropped, case-insensitive
//! duplicates and echoes of the user's terms removed, then sorted
//! alphabetically ignoring case.

#[cfg(test)]
#[path = "suggest_test.rs"]
mod tests;

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::json;
use tracing::info;
use wire::{EnrichedTerm, TermSuggestResult, split_terms, term_key};

use super::derivatives::generate_derivatives;
use crate::llm::{ChatRequest, LlmChat, LlmError, LlmModels, ReasoningEffort, ResponseSchema};

const SUGGEST_PROMPT: &str = "\
You are an expert reader of Christian testimonies. Given a search term from the user:
1. Read the user's term (or comma-separated terms).
2. Propose three to five similar or related terms that would help find relevant testimonies.

Examples:
- \"leukemia\" -> [\"blood cancer\", \"bone marrow\", \"leukemic\"]
- \"argentena\" -> [\"argentina\", \"south america\", \"spanish\"]
- \"car accident\" -> [\"crash\", \"accident\", \"vehicle\", \"car\", \"drive\"]

Reply with a JSON object {\"terms\": [...]} holding only the related terms.";

#[derive(Deserialize)]
struct SuggestReply {
    terms: Vec<String>,
}

#[must_use]
pub fn enrich(term: &str) -> EnrichedTerm {
    EnrichedTerm::new(term, generate_derivatives(term))
}

#[must_use]
pub fn suggest_schema() -> ResponseSchema {
    ResponseSchema {
        name: "related_terms".into(),
        schema: json!({
            "type": "object",
            "additionalProperties": false,
            "required": ["terms"],
            "properties": { "terms": { "type": "array", "items": { "type": "string" } } }
        }),
    }
}

#[must_use]
pub fn build_request(models: &LlmModels, query: &str) -> ChatRequest {
    ChatRequest {
        model: models.suggest.clone(),
        reasoning_effort: Some(ReasoningEffort::Low),
        system: SUGGEST_PROMPT.to_string(),
        user: query.to_string(),
        schema: Some(suggest_schema()),
    }
}

/// Normalize raw model output against the user's own terms.
#[must_use]
pub fn clean_suggestions(raw: Vec<String>, user_terms: &[String]) -> Vec<String> {
    let mut seen: HashSet<String> = user_terms.iter().map(|t| term_key(t)).collect();
    let mut cleaned: Vec<String> = raw
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty() && seen.insert(term_key(t)))
        .collect();
    cleaned.sort_by_key(|t| term_key(t));
    cleaned
}

/// # Errors
///
/// Returns the provider error, or [`LlmError::ApiParse`] if the reply is
/// not a `{"terms": [...]}` object.
pub async fn suggest_terms(llm: &dyn LlmChat, models: &LlmModels, query: &str) -> Result<TermSuggestResult, LlmError> {
    let user_terms = split_terms(query);
    let response = llm.chat(&build_request(models, query)).await?;
    let reply: SuggestReply = response.parse_json()?;
    let suggestions = clean_suggestions(reply.terms, &user_terms);
    info!(query_terms = user_terms.len(), suggestions = suggestions.len(), "suggest: terms ready");

    Ok(TermSuggestResult {
        query_terms: user_terms.iter().map(|t| enrich(t)).collect(),
        suggestions: suggestions.iter().map(|t| enrich(t)).collect(),
    })
}
