//! Bible passage search: query and settings in, structured LLM reply out.

#[cfg(test)]
#[path = "passages_test.rs"]
mod tests;

use serde_json::{Value, json};
use tracing::info;
use wire::{ContentType, ModelType, PassageResponse, ResultCount};

use crate::llm::{ChatRequest, LlmChat, LlmError, LlmModels, ResponseSchema};

const SYSTEM_PROMPT: &str = "\
You are a Bible scholar and an expert at locating passages. The Bible is long, so specific verses are hard to find.
The user gives a prompt or question; you find the verses it refers to.

Reply with a JSON object holding:
  - `passages`: the primary list of verses or verse ranges
  - `secondary_passages`: verses or verse ranges that are related or similar but not a direct answer

A single verse is {\"book\", \"chapter\", \"verse\"}. A range is
{\"book\", \"start_chapter\", \"start_verse\", \"end_chapter\", \"end_verse\"}.

Steps:
1. Work out what the user is looking for.
2. Decide which parts of the Bible are relevant.
3. Use standard capitalized book names (\"gen\" -> \"Genesis\").
4. Return the passages.

Example: \"where does esther become queen\"
{\"passages\": [{\"book\": \"Esther\", \"start_chapter\": 2, \"start_verse\": 1, \"end_chapter\": 2, \"end_verse\": 18}], \"secondary_passages\": []}

Example: \"where does jonah pray and preach at nineveh?\"
{\"passages\": [{\"book\": \"Jonah\", \"start_chapter\": 2, \"start_verse\": 1, \"end_chapter\": 3, \"end_verse\": 4}], \"secondary_passages\": []}

Example: \"You shall not commit adultery, You shall not murder, You shall not steal, You shall not covet\"
{\"passages\": [{\"book\": \"Exodus\", \"start_chapter\": 20, \"start_verse\": 13, \"end_chapter\": 20, \"end_verse\": 17},
               {\"book\": \"Deuteronomy\", \"start_chapter\": 5, \"start_verse\": 17, \"end_chapter\": 5, \"end_verse\": 21},
               {\"book\": \"Romans\", \"chapter\": 13, \"verse\": 9}],
 \"secondary_passages\": [{\"book\": \"Matthew\", \"start_chapter\": 19, \"start_verse\": 18, \"end_chapter\": 19, \"end_verse\": 19},
                          {\"book\": \"Mark\", \"chapter\": 10, \"verse\": 19},
                          {\"book\": \"Luke\", \"chapter\": 18, \"verse\": 20}]}";

/// Settings for one `/search` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassageQuery {
    pub result_count: ResultCount,
    pub content_type: ContentType,
    pub model_type: ModelType,
}

#[must_use]
pub fn system_prompt(content_type: ContentType) -> String {
    let focus = match content_type {
        ContentType::Verses => "\n\nFocus on finding individual verses rather than long passages.",
        ContentType::Passages => "\n\nFocus on finding complete sections or chapters rather than individual verses.",
        ContentType::All => "",
    };
    format!("{SYSTEM_PROMPT}{focus}")
}

#[must_use]
pub fn user_prompt(query: &str, result_count: ResultCount) -> String {
    let suffix = match result_count {
        ResultCount::One => "Return only the most relevant single result in the passages list.",
        ResultCount::Few => "Return a small number (2-5) of the most relevant results in the passages list.",
        ResultCount::Many => "Return a comprehensive list of relevant results in the passages list.",
    };
    format!("{query}\n\n{suffix}")
}

/// Strict JSON schema matching `PassageResponse`.
#[must_use]
pub fn passage_schema() -> ResponseSchema {
    let integer = json!({ "type": "integer" });
    let verse = json!({
        "type": "object",
        "additionalProperties": false,
        "required": ["book", "chapter", "verse"],
        "properties": { "book": { "type": "string" }, "chapter": integer, "verse": integer }
    });
    let range = json!({
        "type": "object",
        "additionalProperties": false,
        "required": ["book", "start_chapter", "start_verse", "end_chapter", "end_verse"],
        "properties": {
            "book": { "type": "string" },
            "start_chapter": integer,
            "start_verse": integer,
            "end_chapter": integer,
            "end_verse": integer
        }
    });
    let list: Value = json!({ "type": "array", "items": { "anyOf": [verse, range] } });
    ResponseSchema {
        name: "passage_query".into(),
        schema: json!({
            "type": "object",
            "additionalProperties": false,
            "required": ["passages", "secondary_passages"],
            "properties": { "passages": list, "secondary_passages": list }
        }),
    }
}

#[must_use]
pub fn build_request(models: &LlmModels, query: &str, settings: PassageQuery) -> ChatRequest {
    let (model, effort) = models.select(settings.model_type);
    ChatRequest {
        model: model.to_string(),
        reasoning_effort: Some(effort),
        system: system_prompt(settings.content_type),
        user: user_prompt(query, settings.result_count),
        schema: Some(passage_schema()),
    }
}

/// # Errors
///
/// Returns the provider error, or [`LlmError::ApiParse`] if the reply does
/// not match the passage schema.
pub async fn find_passages(
    llm: &dyn LlmChat,
    models: &LlmModels,
    query: &str,
    settings: PassageQuery,
) -> Result<PassageResponse, LlmError> {
    let request = build_request(models, query, settings);
    info!(
        model = %request.model,
        result_count = settings.result_count.as_str(),
        content_type = settings.content_type.as_str(),
        "passages: llm request"
    );
    let response = llm.chat(&request).await?;
    let passages: PassageResponse = response.parse_json()?;
    info!(
        passages = passages.passages.len(),
        secondary = passages.secondary_passages.len(),
        input_tokens = response.input_tokens,
        output_tokens = response.output_tokens,
        "passages: llm reply"
    );
    Ok(passages)
}
