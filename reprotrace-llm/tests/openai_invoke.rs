use std::time::Duration;

use httpmock::prelude::*;
use reprotrace_core::{FailureKind, InvocationRequest, RetryPolicy};
use reprotrace_llm::{Invoker, OpenAiClient, OpenAiConfig, Provider, ProviderError};
use secrecy::SecretString;
use serde_json::{json, Value};

fn client(base_url: String) -> OpenAiClient {
    let config = OpenAiConfig::new(SecretString::new("test-key".to_string()))
        .with_base_url(&base_url)
        .expect("valid base url");
    OpenAiClient::new(config).expect("valid config")
}

fn fast_policy() -> RetryPolicy {
    RetryPolicy::new(3, Duration::from_millis(5), Duration::ZERO)
}

fn request() -> InvocationRequest {
    InvocationRequest::new("hi", "m", 0.2, 10).with_timeout_ms(5000)
}

#[tokio::test]
async fn responses_call_maps_text_and_metadata() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/responses")
            .header("Authorization", "Bearer test-key")
            .json_body(json!({
                "model": "m",
                "input": "hi",
                "temperature": 0.2,
                "max_output_tokens": 10
            }));
        then.status(200)
            .header("content-type", "application/json")
            .header("x-request-id", "req_123")
            .json_body(json!({
                "id": "resp_abc",
                "object": "response",
                "model": "m-2025",
                "output": [
                    {
                        "type": "message",
                        "role": "assistant",
                        "content": [{"type": "output_text", "text": "hello"}]
                    }
                ],
                "usage": {"input_tokens": 3, "output_tokens": 1, "total_tokens": 4}
            }));
    });

    let client = client(server.base_url());
    let outcome = Invoker::new(&client).invoke(&request()).await;

    let success = outcome.as_success().expect("success");
    assert_eq!(success.output_text, "hello");
    assert_eq!(success.provider_meta.response_id.as_deref(), Some("resp_abc"));
    assert_eq!(success.provider_meta.request_id.as_deref(), Some("req_123"));
    assert_eq!(success.provider_meta.model, "m");
    assert_eq!(success.provider_meta.attempts, 1);
    assert_eq!(
        success.provider_meta.usage,
        Some(json!({"input_tokens": 3, "output_tokens": 1, "total_tokens": 4}))
    );
    mock.assert();
}

#[tokio::test]
async fn base_url_path_prefix_is_kept() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/proxy/v1/responses");
        then.status(200).json_body(json!({"id": "resp_1", "output_text": "hello"}));
    });

    let client = client(format!("{}/proxy", server.base_url()));
    let outcome = Invoker::new(&client).invoke(&request()).await;

    assert!(outcome.is_success());
    mock.assert();
}

#[tokio::test]
async fn server_errors_are_retried_three_times() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/v1/responses");
        then.status(500)
            .json_body(json!({"error": {"message": "The server had an error", "type": "server_error"}}));
    });

    let client = client(server.base_url());
    let outcome = Invoker::new(&client)
        .with_policy(fast_policy())
        .invoke(&request())
        .await;

    let failure = outcome.as_failure().expect("failure");
    assert_eq!(failure.kind, FailureKind::ProviderError);
    assert_eq!(failure.provider_status_code, Some(500));
    assert_eq!(
        failure.message,
        "provider returned HTTP 500: The server had an error"
    );
    assert_eq!(
        failure.provider_error_body,
        Some(json!({"error": {"message": "The server had an error", "type": "server_error"}}))
    );
    mock.assert_hits(3);
}

#[tokio::test]
async fn bad_request_is_not_retried() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/v1/responses");
        then.status(400).json_body(json!({
            "error": {"message": "Unsupported parameter: 'temperature'", "type": "invalid_request_error"}
        }));
    });

    let client = client(server.base_url());
    let outcome = Invoker::new(&client)
        .with_policy(fast_policy())
        .invoke(&request())
        .await;

    let failure = outcome.as_failure().expect("failure");
    assert_eq!(failure.kind, FailureKind::Unknown);
    assert_eq!(failure.provider_status_code, Some(400));
    mock.assert_hits(1);
}

#[tokio::test]
async fn empty_output_is_reported_once() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/v1/responses");
        then.status(200).json_body(json!({
            "id": "resp_empty",
            "output": [{"type": "message", "content": [{"type": "output_text", "text": " "}]}]
        }));
    });

    let client = client(server.base_url());
    let outcome = Invoker::new(&client)
        .with_policy(fast_policy())
        .invoke(&request())
        .await;

    let failure = outcome.as_failure().expect("failure");
    assert_eq!(failure.kind, FailureKind::EmptyOutput);
    assert_eq!(
        failure.provider_error_body,
        Some(json!({"responseId": "resp_empty"}))
    );
    mock.assert_hits(1);
}

#[tokio::test]
async fn slow_responses_hit_the_deadline() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/responses");
        then.status(200)
            .delay(Duration::from_millis(500))
            .json_body(json!({"id": "resp_slow", "output_text": "too late"}));
    });

    let client = client(server.base_url());
    let request = InvocationRequest::new("hi", "m", 0.2, 10).with_timeout_ms(50);
    let outcome = Invoker::new(&client)
        .with_policy(fast_policy())
        .invoke(&request)
        .await;

    let failure = outcome.as_failure().expect("failure");
    assert_eq!(failure.kind, FailureKind::Timeout);
    assert!(failure.latency_ms >= 150, "latency {}", failure.latency_ms);
}

#[tokio::test]
async fn undecodable_success_body_is_kept_raw() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/responses");
        then.status(200).body("<html>gateway</html>");
    });

    let client = client(server.base_url());
    let err = client.complete(&request()).await.unwrap_err();

    match err {
        ProviderError::Decode { body, .. } => {
            assert_eq!(body, Some(Value::String("<html>gateway</html>".to_string())));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_provider_is_unknown() {
    let client = client("http://127.0.0.1:9".to_string());
    let outcome = Invoker::new(&client)
        .with_policy(fast_policy())
        .invoke(&request())
        .await;

    assert_eq!(outcome.failure_kind(), Some(FailureKind::Unknown));
}

#[test]
fn missing_key_fails_fast_at_construction() {
    let config = OpenAiConfig::new(SecretString::new(String::new()));
    assert!(OpenAiClient::new(config).is_err());
}
