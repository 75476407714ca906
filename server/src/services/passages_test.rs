use super::*;
use crate::llm::ReasoningEffort;
use crate::state::test_helpers::MockLlm;
use wire::Passage;

// =========================================================================
// prompts
// =========================================================================

#[test]
fn system_prompt_focus_by_content_type() {
    assert!(system_prompt(ContentType::Verses).ends_with("individual verses rather than long passages."));
    assert!(system_prompt(ContentType::Passages).ends_with("rather than individual verses."));
    assert_eq!(system_prompt(ContentType::All), SYSTEM_PROMPT);
}

#[test]
fn user_prompt_appends_result_count_instruction() {
    assert_eq!(
        user_prompt("love", ResultCount::One),
        "love\n\nReturn only the most relevant single result in the passages list."
    );
    assert!(user_prompt("love", ResultCount::Few).contains("(2-5)"));
    assert!(user_prompt("love", ResultCount::Many).contains("comprehensive"));
}

#[test]
fn build_request_selects_model_and_effort() {
    let models = LlmModels::default();
    let fast = build_request(&models, "q", PassageQuery::default());
    assert_eq!(fast.model, models.fast);
    assert_eq!(fast.reasoning_effort, Some(ReasoningEffort::Low));

    let advanced = build_request(&models, "q", PassageQuery { model_type: ModelType::Advanced, ..PassageQuery::default() });
    assert_eq!(advanced.model, models.advanced);
    assert_eq!(advanced.reasoning_effort, Some(ReasoningEffort::High));
    assert_eq!(advanced.schema.unwrap().name, "passage_query");
}

#[test]
fn schema_requires_both_lists() {
    let schema = passage_schema().schema;
    assert_eq!(schema["required"], json!(["passages", "secondary_passages"]));
    assert_eq!(schema["properties"]["passages"]["items"]["anyOf"].as_array().unwrap().len(), 2);
}

// =========================================================================
// find_passages (with MockLlm)
// =========================================================================

#[tokio::test]
async fn find_passages_parses_structured_reply() {
    let llm = MockLlm::replying(vec![
        r#"{"passages":[{"book":"Esther","start_chapter":2,"start_verse":1,"end_chapter":2,"end_verse":18}],
            "secondary_passages":[{"book":"Mark","chapter":10,"verse":19}]}"#,
    ]);
    let result = find_passages(&llm, &LlmModels::default(), "where does esther become queen", PassageQuery::default())
        .await
        .unwrap();
    assert_eq!(result.passages[0].label(), "Esther 2:1-18");
    assert_eq!(result.secondary_passages[0], Passage::Verse { book: "Mark".into(), chapter: 10, verse: 19 });

    let sent = llm.requests();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].user.starts_with("where does esther become queen\n\n"));
}

#[tokio::test]
async fn find_passages_rejects_malformed_reply() {
    let llm = MockLlm::replying(vec![r#"{"verses": []}"#]);
    let err = find_passages(&llm, &LlmModels::default(), "q", PassageQuery::default())
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::ApiParse(_)));
}

#[tokio::test]
async fn find_passages_propagates_provider_error() {
    let llm = MockLlm::failing(LlmError::ApiResponse { status: 500, body: "boom".into() });
    let err = find_passages(&llm, &LlmModels::default(), "q", PassageQuery::default())
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::ApiResponse { status: 500, .. }));
}
