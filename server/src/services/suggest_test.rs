use super::*;
use crate::state::test_helpers::MockLlm;

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|t| (*t).to_string()).collect()
}

#[test]
fn clean_drops_blanks_duplicates_and_echoes() {
    let cleaned = clean_suggestions(
        owned(&["  Vehicle ", "crash", "", "Crash", "car accident", "drive"]),
        &owned(&["Car Accident"]),
    );
    assert_eq!(cleaned, vec!["crash", "drive", "Vehicle"]);
}

#[test]
fn clean_sorts_ignoring_case() {
    assert_eq!(clean_suggestions(owned(&["beta", "Alpha", "gamma"]), &[]), vec!["Alpha", "beta", "gamma"]);
}

#[test]
fn request_uses_suggest_model_and_schema() {
    let models = LlmModels::default();
    let request = build_request(&models, "leukemia");
    assert_eq!(request.model, models.suggest);
    assert_eq!(request.reasoning_effort, Some(ReasoningEffort::Low));
    assert_eq!(request.user, "leukemia");
    assert!(request.system.contains("three to five"));
    assert_eq!(request.schema.unwrap().schema["required"], json!(["terms"]));
}

#[tokio::test]
async fn suggest_terms_enriches_query_and_suggestions() {
    let llm = MockLlm::replying(vec![r#"{"terms":["crash","car accident","vehicle"]}"#]);
    let result = suggest_terms(&llm, &LlmModels::default(), "car accident, run").await.unwrap();

    let query: Vec<&str> = result.query_terms.iter().map(|t| t.term.as_str()).collect();
    assert_eq!(query, vec!["car accident", "run"]);
    assert_eq!(result.query_terms[1].derivatives, vec!["runs", "running", "ran"]);

    let suggested: Vec<&str> = result.suggestions.iter().map(|t| t.term.as_str()).collect();
    assert_eq!(suggested, vec!["crash", "vehicle"]);
    assert_eq!(result.suggestions[0].derivatives, generate_derivatives("crash"));
}

#[tokio::test]
async fn suggest_terms_fails_on_unexpected_reply() {
    let llm = MockLlm::replying(vec![r#"["crash"]"#]);
    let err = suggest_terms(&llm, &LlmModels::default(), "x").await.unwrap_err();
    assert!(matches!(err, LlmError::ApiParse(_)));
}
