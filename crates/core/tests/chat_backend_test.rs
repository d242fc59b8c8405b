use std::time::Duration;

use serde_json::json;
use vidsight_core::{
    AnalysisContext, AnalysisError, Analyzer, Backend, BackendConfig, BackendError, ChatBackend,
    ChatRequest,
};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend_for(server: &MockServer) -> ChatBackend {
    ChatBackend::new(BackendConfig::new(format!("{}/v1", server.uri()), "test-model"))
}

fn completion(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }]
    }))
}

#[tokio::test]
async fn test_probe_reports_available_on_200() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;

    assert!(backend_for(&server).is_available().await);
}

#[tokio::test]
async fn test_probe_reports_unavailable_on_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    assert!(!backend_for(&server).is_available().await);
}

#[tokio::test]
async fn test_probe_times_out_as_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": [] }))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let config = BackendConfig::new(format!("{}/v1", server.uri()), "m")
        .with_timeouts(Duration::from_secs(5), Duration::from_millis(50));

    assert!(!ChatBackend::new(config).is_available().await);
}

#[tokio::test]
async fn test_complete_posts_chat_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({
            "model": "test-model",
            "messages": [{ "role": "user", "content": "hello" }],
            "max_tokens": 1000
        })))
        .respond_with(completion("  hi there \n"))
        .expect(1)
        .mount(&server)
        .await;

    let reply = backend_for(&server)
        .complete(&ChatRequest::user("test-model", "hello".to_string()))
        .await
        .unwrap();

    assert_eq!(reply, "hi there");
}

#[tokio::test]
async fn test_complete_sends_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(completion("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = BackendConfig::new(format!("{}/v1", server.uri()), "m");
    config.api_key = Some("sk-test".to_string());

    let reply = ChatBackend::new(config)
        .complete(&ChatRequest::user("m", "x".to_string()))
        .await
        .unwrap();
    assert_eq!(reply, "ok");
}

#[tokio::test]
async fn test_complete_non_200_is_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model crashed"))
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .complete(&ChatRequest::user("m", "x".to_string()))
        .await
        .unwrap_err();

    match err {
        BackendError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "model crashed");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_complete_empty_choices() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .complete(&ChatRequest::user("m", "x".to_string()))
        .await
        .unwrap_err();

    assert!(matches!(err, BackendError::EmptyChoices));
}

#[tokio::test]
async fn test_complete_choice_without_content_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "choices": [{ "message": {} }] })),
        )
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .complete(&ChatRequest::user("m", "x".to_string()))
        .await
        .unwrap_err();

    assert!(matches!(err, BackendError::InvalidResponse { .. }));
}

#[tokio::test]
async fn test_complete_malformed_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .complete(&ChatRequest::user("m", "x".to_string()))
        .await
        .unwrap_err();

    assert!(matches!(err, BackendError::InvalidResponse { .. }));
}

#[tokio::test]
async fn test_complete_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(completion("late").set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let config = BackendConfig::new(format!("{}/v1", server.uri()), "m")
        .with_timeouts(Duration::from_millis(50), Duration::from_millis(50));

    let err = ChatBackend::new(config)
        .complete(&ChatRequest::user("m", "x".to_string()))
        .await
        .unwrap_err();

    assert!(matches!(err, BackendError::Timeout));
}

#[tokio::test]
async fn test_unreachable_backend_fails_analysis() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(completion("never"))
        .expect(0)
        .mount(&server)
        .await;

    let analyzer = Analyzer::new(backend_for(&server));
    let markup = "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nhello\n";

    let err = analyzer
        .analyze(markup, &AnalysisContext::default())
        .await
        .unwrap_err();

    assert!(matches!(err, AnalysisError::BackendUnavailable { .. }));
}
