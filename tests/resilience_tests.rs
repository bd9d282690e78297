//! Integration tests for retry behaviour, standalone and through services.

use bytes::Bytes;
use futures::StreamExt;
use gemini_sdk::error::{ConfigurationError, GeminiError, NetworkError, ServerError};
use gemini_sdk::mocks::MockHttpTransport;
use gemini_sdk::resilience::{RetryConfig, RetryExecutor};
use gemini_sdk::services::{ContentService, ContentServiceImpl, ModelsService, ModelsServiceImpl};
use gemini_sdk::transport::TransportError;
use gemini_sdk::types::GenerateContentRequest;
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn fast_retry(max_retries: u32) -> RetryConfig {
    RetryConfig {
        max_retries,
        initial_delay: Duration::from_millis(1),
        multiplier: 2.0,
        max_delay: Duration::from_millis(5),
        enable_jitter: false,
    }
}

const UNAVAILABLE: &str = r#"{"error": {"code": 503, "message": "try again", "status": "UNAVAILABLE"}}"#;

#[tokio::test]
async fn test_retry_success_after_failures() {
    // Arrange
    let executor = RetryExecutor::new(fast_retry(3));
    let attempts = Arc::new(AtomicU32::new(0));

    // Act - fail twice, then succeed
    let result = executor
        .execute(|| {
            let attempts = Arc::clone(&attempts);
            async move {
                if attempts.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(GeminiError::Network(NetworkError::Timeout {
                        duration: Duration::from_secs(10),
                    }))
                } else {
                    Ok("success")
                }
            }
        })
        .await;

    // Assert
    assert_eq!(result.unwrap(), "success");
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_retry_exhausted_returns_last_error() {
    let executor = RetryExecutor::new(fast_retry(2));
    let attempts = Arc::new(AtomicU32::new(0));

    let result = executor
        .execute(|| {
            let attempts = Arc::clone(&attempts);
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(GeminiError::Network(NetworkError::ConnectionFailed {
                    message: "refused".to_string(),
                }))
            }
        })
        .await;

    assert!(matches!(
        result,
        Err(GeminiError::Network(NetworkError::ConnectionFailed { .. }))
    ));
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_non_retryable_error_fails_fast() {
    let executor = RetryExecutor::new(fast_retry(5));
    let attempts = Arc::new(AtomicU32::new(0));

    let result = executor
        .execute(|| {
            let attempts = Arc::clone(&attempts);
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(GeminiError::Configuration(ConfigurationError::MissingApiKey))
            }
        })
        .await;

    assert!(result.is_err());
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

#[test]
fn test_exponential_backoff_is_capped() {
    let config = RetryConfig {
        max_retries: 10,
        initial_delay: Duration::from_millis(100),
        multiplier: 2.0,
        max_delay: Duration::from_millis(500),
        enable_jitter: false,
    };

    let delays: Vec<_> = (0..5)
        .map(|attempt| config.delay_for(attempt).as_millis())
        .collect();

    assert_eq!(delays, vec![100, 200, 400, 500, 500]);
}

#[test]
fn test_presets() {
    assert_eq!(RetryConfig::no_retry().max_retries, 0);
    assert_eq!(RetryConfig::default().max_retries, 3);
    assert!(RetryConfig::aggressive().max_retries > RetryConfig::default().max_retries);
}

#[tokio::test]
async fn test_service_retries_unavailable_then_succeeds() {
    // Arrange
    let transport = MockHttpTransport::new();
    transport.enqueue_json_response(503, UNAVAILABLE);
    transport.enqueue_error(TransportError::Timeout);
    transport.enqueue_json_response(200, r#"{"models": []}"#);
    let service = ModelsServiceImpl::new(transport.context_with_retry(fast_retry(3)));

    // Act
    let page = service.list(None).await.unwrap();

    // Assert
    assert!(page.models.is_empty());
    transport.verify_request_count(3);
}

#[tokio::test]
async fn test_service_gives_up_after_budget() {
    let transport = MockHttpTransport::new();
    for _ in 0..3 {
        transport.enqueue_json_response(503, UNAVAILABLE);
    }
    let service = ModelsServiceImpl::new(transport.context_with_retry(fast_retry(2)));

    let err = service.list(None).await.unwrap_err();

    assert!(matches!(err, GeminiError::Server(ServerError::ServiceUnavailable { .. })));
    transport.verify_request_count(3);
}

#[tokio::test]
async fn test_service_does_not_retry_client_errors() {
    let transport = MockHttpTransport::new();
    transport.enqueue_json_response(
        400,
        r#"{"error": {"code": 400, "message": "bad field", "status": "INVALID_ARGUMENT"}}"#,
    );
    let service = ModelsServiceImpl::new(transport.context_with_retry(fast_retry(3)));

    let result = service.list(None).await;

    assert!(matches!(result, Err(GeminiError::Request(_))));
    transport.verify_request_count(1);
}

#[tokio::test]
async fn test_retry_after_header_replaces_backoff() {
    // Arrange
    let transport = MockHttpTransport::new();
    transport.enqueue_with_headers(
        429,
        r#"{"error": {"code": 429, "message": "slow down", "status": "RESOURCE_EXHAUSTED"}}"#,
        &[("Retry-After", "0")],
    );
    transport.enqueue_json_response(200, r#"{"models": []}"#);
    let config = RetryConfig {
        initial_delay: Duration::from_secs(30),
        max_delay: Duration::from_secs(30),
        ..fast_retry(1)
    };
    let service = ModelsServiceImpl::new(transport.context_with_retry(config));
    let started = Instant::now();

    // Act
    service.list(None).await.unwrap();

    // Assert
    assert!(started.elapsed() < Duration::from_secs(5));
    transport.verify_request_count(2);
}

#[tokio::test]
async fn test_stream_open_is_retried() {
    // Arrange
    let transport = MockHttpTransport::new();
    transport.enqueue_streaming_error(TransportError::Connection("reset".to_string()));
    transport.enqueue_streaming_response(vec![Bytes::from_static(
        br#"[{"candidates":[{"content":{"role":"model","parts":[{"text":"ok"}]}}]}]"#,
    )]);
    let service = ContentServiceImpl::new(transport.context_with_retry(fast_retry(2)));

    // Act
    let stream = service
        .generate_content_stream("gemini-2.5-flash", GenerateContentRequest::from_text("hi"))
        .await
        .unwrap();
    let chunks: Vec<_> = stream.collect().await;

    // Assert
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].as_ref().unwrap().text(), "ok");
    transport.verify_request_count(2);
}
