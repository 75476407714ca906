use axum::body::Body;
use tower::ServiceExt;

use super::test_helpers::get_json;
use super::*;
use crate::state::test_helpers::test_app_state;

#[test]
fn api_error_status_mapping() {
    assert_eq!(ApiError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
    assert_eq!(ApiError::LlmUnavailable.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(ApiError::Llm(LlmError::ApiParse("x".into())).status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn parse_setting_error_becomes_bad_request() {
    let err = ApiError::from(ParseSettingError { param: "model_type", value: "turbo".into() });
    assert!(matches!(err, ApiError::BadRequest(ref msg) if msg == "invalid model_type: turbo"));
}

#[tokio::test]
async fn health_check_reports_ok() {
    let (status, body) = get_json(test_app_state(), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "status": "ok" }));
}

#[tokio::test]
async fn analytics_counts_requests_and_searches() {
    let state = test_app_state();
    get_json(state.clone(), "/").await;
    get_json(state.clone(), "/search?query=love").await;

    let (status, body) = get_json(state, "/analytics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["usage_stats"]["total_requests"], 3);
    assert_eq!(body["usage_stats"]["search_requests"], 1);
    assert!(body["message"].as_str().unwrap().starts_with("Analytics endpoint"));
    assert!(body["timestamp"].as_str().unwrap().contains('T'));
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let (status, _) = get_json(test_app_state(), "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cors_allows_listed_origin_only() {
    let origins = vec!["http://localhost:5173".to_string()];
    let request = |origin: &str| {
        axum::http::Request::builder()
            .uri("/")
            .header(header::ORIGIN, origin)
            .body(Body::empty())
            .unwrap()
    };

    let allowed = app(test_app_state(), &origins)
        .oneshot(request("http://localhost:5173"))
        .await
        .unwrap();
    assert_eq!(
        allowed.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:5173"
    );

    let denied = app(test_app_state(), &origins)
        .oneshot(request("https://evil.test"))
        .await
        .unwrap();
    assert!(denied.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}
