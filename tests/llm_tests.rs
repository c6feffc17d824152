use serde_json::json;
use std::time::{Duration, Instant};
use triangulate::llm::openai::OpenAIClient;
use triangulate::llm::{GenerationParams, LLMClient, Provider};
use triangulate::types::AppError;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer, params: GenerationParams) -> OpenAIClient {
    OpenAIClient::new(
        Some("sk-test".to_string()),
        format!("{}/v1/", server.uri()),
        "gpt-4o-mini".to_string(),
        params,
    )
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "created": 1700000000,
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 200, "completion_tokens": 50, "total_tokens": 250}
    })
}

#[tokio::test]
async fn test_generate_with_system_sends_both_messages() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "max_tokens": 1500,
            "messages": [
                {"role": "system", "content": "Cite your sources."},
                {"role": "user", "content": "QUESTION: What is Rust?"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Rust is a language [1].")))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server, GenerationParams::default())
        .generate_with_system("Cite your sources.", "QUESTION: What is Rust?")
        .await
        .unwrap();

    assert_eq!(response.content, "Rust is a language [1].");
    assert_eq!(response.tokens_used, 250);
    assert_eq!(response.finish_reason, "stop");
}

#[tokio::test]
async fn test_missing_usage_reports_zero_tokens() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-124",
            "object": "chat.completion",
            "created": 1700000000,
            "model": "gpt-4o-mini",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "hi"},
                "finish_reason": null
            }]
        })))
        .mount(&server)
        .await;

    let response = client(&server, GenerationParams::default())
        .generate("hello")
        .await
        .unwrap();
    assert_eq!(response.tokens_used, 0);
    assert_eq!(response.finish_reason, "unknown");
}

#[tokio::test]
async fn test_sampling_params_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"max_tokens": 64, "temperature": 0.25})))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
        .expect(1)
        .mount(&server)
        .await;

    let params = GenerationParams {
        max_tokens: 64,
        temperature: 0.25,
        ..GenerationParams::default()
    };
    let response = client(&server, params).generate("hello").await.unwrap();
    assert_eq!(response.content, "ok");
}

#[tokio::test]
async fn test_http_error_is_llm_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {
                "message": "Incorrect API key provided",
                "type": "invalid_request_error",
                "param": null,
                "code": "invalid_api_key"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server, GenerationParams::default())
        .generate("hello")
        .await
        .unwrap_err();

    match err {
        AppError::LLM(msg) => assert!(msg.contains("Incorrect API key provided")),
        other => panic!("Expected LLM error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_rate_limit_fails_within_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {"message": "Rate limit reached", "type": "requests", "param": null, "code": null}
        })))
        .mount(&server)
        .await;

    let params = GenerationParams {
        timeout: Duration::from_millis(300),
        ..GenerationParams::default()
    };
    let started = Instant::now();
    let err = client(&server, params).generate("hello").await.unwrap_err();

    assert!(started.elapsed() < Duration::from_secs(2));
    match err {
        AppError::LLM(msg) => {
            assert!(msg.contains("timed out") || msg.contains("Rate limit reached"))
        }
        other => panic!("Expected LLM error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_completion_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("   ")))
        .mount(&server)
        .await;

    let result = client(&server, GenerationParams::default())
        .generate("hello")
        .await;
    assert!(matches!(result, Err(AppError::LLM(_))));
}

#[tokio::test]
async fn test_request_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("late"))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let params = GenerationParams {
        timeout: Duration::from_millis(200),
        ..GenerationParams::default()
    };
    let result = client(&server, params).generate("hello").await;
    assert!(matches!(result, Err(AppError::LLM(_))));
}

#[test]
fn test_provider_creates_openai_client() {
    let provider = Provider::OpenAI {
        api_key: Some("sk-test".to_string()),
        api_base: "https://api.openai.com/v1".to_string(),
        model: "gpt-3.5-turbo".to_string(),
    };
    let client = provider.create_client(GenerationParams::default()).unwrap();
    assert_eq!(client.model_name(), "gpt-3.5-turbo");
}

#[cfg(not(feature = "ollama"))]
#[test]
fn test_ollama_requires_feature() {
    let provider = Provider::Ollama {
        base_url: "http://localhost:11434".to_string(),
        model: "llama3.2".to_string(),
    };
    assert!(matches!(
        provider.create_client(GenerationParams::default()),
        Err(AppError::Config(_))
    ));
}
