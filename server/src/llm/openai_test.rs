use super::*;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn timeouts() -> LlmTimeouts {
    LlmTimeouts { request_secs: 5, connect_secs: 1 }
}

fn structured_request() -> ChatRequest {
    ChatRequest {
        model: "gpt-5-nano-2025-08-07".into(),
        reasoning_effort: Some(ReasoningEffort::Low),
        system: "system text".into(),
        user: "user text".into(),
        schema: Some(ResponseSchema { name: "terms".into(), schema: json!({"type": "object"}) }),
    }
}

// ===== parsing =====

#[test]
fn cc_parse_text_response() {
    let json = json!({
        "model": "gpt-5-nano",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": "{\"terms\":[]}" },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 10, "completion_tokens": 5 }
    })
    .to_string();
    let resp = parse_chat_completions_response(&json).unwrap();
    assert_eq!(resp.content, "{\"terms\":[]}");
    assert_eq!(resp.input_tokens, 10);
    assert_eq!(resp.output_tokens, 5);
}

#[test]
fn cc_parse_length_finish_is_truncation_error() {
    let json = json!({
        "choices": [{ "message": { "content": "{" }, "finish_reason": "length" }]
    })
    .to_string();
    let err = parse_chat_completions_response(&json).unwrap_err();
    assert!(matches!(err, LlmError::ApiParse(msg) if msg == "reply truncated"));
}

#[test]
fn cc_parse_missing_choices() {
    let json = json!({ "model": "gpt-5", "choices": [] }).to_string();
    assert!(parse_chat_completions_response(&json).is_err());
}

#[test]
fn cc_parse_refusal_is_error() {
    let json = json!({
        "choices": [{ "message": { "content": null, "refusal": "cannot help" } }]
    })
    .to_string();
    let err = parse_chat_completions_response(&json).unwrap_err();
    assert!(err.to_string().contains("cannot help"));
}

#[test]
fn cc_parse_empty_content_is_error() {
    let json = json!({ "choices": [{ "message": { "content": "" } }] }).to_string();
    assert!(matches!(parse_chat_completions_response(&json), Err(LlmError::ApiParse(_))));
}

#[test]
fn request_body_carries_schema_and_effort() {
    let request = structured_request();
    let body = serde_json::to_value(CcRequest::from(&request)).unwrap();
    assert_eq!(body["reasoning_effort"], "low");
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][1]["content"], "user text");
    assert_eq!(body["response_format"]["type"], "json_schema");
    assert_eq!(body["response_format"]["json_schema"]["name"], "terms");
    assert_eq!(body["response_format"]["json_schema"]["strict"], true);
}

#[test]
fn request_body_omits_unset_options() {
    let mut request = structured_request();
    request.reasoning_effort = None;
    request.schema = None;
    let body = serde_json::to_value(CcRequest::from(&request)).unwrap();
    assert!(body.get("reasoning_effort").is_none());
    assert!(body.get("response_format").is_none());
}

// ===== HTTP =====

#[tokio::test]
async fn chat_posts_to_chat_completions() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({ "model": "gpt-5-nano-2025-08-07", "reasoning_effort": "low" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "gpt-5-nano-2025-08-07",
            "choices": [{ "message": { "content": "{\"terms\":[\"crash\"]}" }, "finish_reason": "stop" }],
            "usage": { "prompt_tokens": 3, "completion_tokens": 4 }
        })))
        .mount(&server)
        .await;

    let client = OpenAiClient::new("sk-test".into(), &server.uri(), timeouts()).unwrap();
    let resp = client.chat(&structured_request()).await.unwrap();
    assert_eq!(resp.content, "{\"terms\":[\"crash\"]}");
    assert_eq!(resp.output_tokens, 4);
}

#[tokio::test]
async fn chat_surfaces_non_success_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&server)
        .await;

    let client = OpenAiClient::new("sk-test".into(), &format!("{}/", server.uri()), timeouts()).unwrap();
    let err = client.chat(&structured_request()).await.unwrap_err();
    assert!(matches!(err, LlmError::ApiResponse { status: 429, ref body } if body == "slow down"));
    assert!(err.retryable());
}
