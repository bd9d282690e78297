//! Test doubles for the transport, auth and logging seams.
//!
//! [`MockHttpTransport`] answers from queues and records every request, so a
//! service can be driven end to end without a network.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream;
use serde_json::Value;

use crate::auth::{AuthManager, API_KEY_HEADER, API_KEY_QUERY_PARAM};
use crate::config::{GeminiConfig, DEFAULT_API_VERSION};
use crate::observability::Logger;
use crate::resilience::RetryConfig;
use crate::services::context::ServiceContext;
use crate::transport::{
    ChunkedStream, HttpMethod, HttpRequest, HttpResponse, HttpTransport, RequestBuilder,
    TransportError,
};

/// Base URL used by [`MockHttpTransport::context`].
pub const MOCK_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// API key used by [`MockHttpTransport::context`].
pub const MOCK_API_KEY: &str = "test-api-key";

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Queue-driven [`HttpTransport`].
///
/// # Example
///
/// ```
/// use gemini_sdk::mocks::MockHttpTransport;
/// use gemini_sdk::transport::{HttpMethod, HttpRequest, HttpTransport};
/// use std::collections::HashMap;
///
/// # tokio_test::block_on(async {
/// let transport = MockHttpTransport::new();
/// transport.enqueue_json_response(200, r#"{"status": "ok"}"#);
///
/// let request = HttpRequest {
///     method: HttpMethod::Get,
///     url: "https://example.com".to_string(),
///     headers: HashMap::new(),
///     body: None,
/// };
/// let response = transport.send(request).await.unwrap();
///
/// assert_eq!(response.status, 200);
/// transport.verify_request_count(1);
/// # });
/// ```
#[derive(Clone, Default)]
pub struct MockHttpTransport {
    responses: Arc<Mutex<VecDeque<Result<HttpResponse, TransportError>>>>,
    streaming_responses: Arc<Mutex<VecDeque<Result<Vec<Bytes>, TransportError>>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl MockHttpTransport {
    /// Empty mock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Service context over this mock with header auth and retries off.
    pub fn context(&self) -> ServiceContext {
        self.context_with_retry(RetryConfig::no_retry())
    }

    /// Service context over this mock with the given retry policy.
    pub fn context_with_retry(&self, retry: RetryConfig) -> ServiceContext {
        self.context_with(retry, Arc::new(RecordingLogger::new()))
    }

    /// Service context over this mock with a chosen retry policy and logger.
    pub fn context_with(&self, retry: RetryConfig, logger: Arc<dyn Logger>) -> ServiceContext {
        let base = url::Url::parse(MOCK_BASE_URL).expect("mock base url");
        let upload = base.join("upload").expect("mock upload url");
        let builder = RequestBuilder::new(
            &base,
            &upload,
            DEFAULT_API_VERSION,
            Arc::new(MockAuthManager::new(MOCK_API_KEY)),
        );
        ServiceContext::new(Arc::new(self.clone()), builder, logger, retry)
    }

    /// Queues a response or error for the next [`send`](HttpTransport::send).
    pub fn enqueue_response(&self, response: Result<HttpResponse, TransportError>) {
        lock(&self.responses).push_back(response);
    }

    /// Queues a JSON response.
    pub fn enqueue_json_response(&self, status: u16, body: &str) {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        self.enqueue_response(Ok(HttpResponse {
            status,
            headers,
            body: Bytes::from(body.to_string()),
        }));
    }

    /// Queues a JSON response built from a value.
    pub fn enqueue_json(&self, status: u16, body: &Value) {
        self.enqueue_json_response(status, &body.to_string());
    }

    /// Queues a response with extra headers.
    pub fn enqueue_with_headers(&self, status: u16, body: &str, headers: &[(&str, &str)]) {
        let headers = headers
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        self.enqueue_response(Ok(HttpResponse {
            status,
            headers,
            body: Bytes::from(body.to_string()),
        }));
    }

    /// Queues a transport failure.
    pub fn enqueue_error(&self, error: TransportError) {
        self.enqueue_response(Err(error));
    }

    /// Queues a streaming body delivered as `chunks`.
    pub fn enqueue_streaming_response(&self, chunks: Vec<Bytes>) {
        lock(&self.streaming_responses).push_back(Ok(chunks));
    }

    /// Queues a streaming failure.
    pub fn enqueue_streaming_error(&self, error: TransportError) {
        lock(&self.streaming_responses).push_back(Err(error));
    }

    /// Every request so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        lock(&self.requests).clone()
    }

    /// Most recent request.
    pub fn last_request(&self) -> Option<HttpRequest> {
        lock(&self.requests).last().cloned()
    }

    /// Number of requests so far.
    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Asserts the number of requests.
    pub fn verify_request_count(&self, expected: usize) {
        let actual = self.request_count();
        assert_eq!(actual, expected, "Expected {expected} requests, got {actual}");
    }

    /// Asserts method and URL fragment of request `index`.
    pub fn verify_request(&self, index: usize, method: HttpMethod, url_contains: &str) {
        let requests = lock(&self.requests);
        let request = requests
            .get(index)
            .unwrap_or_else(|| panic!("No request at index {index}"));
        assert_eq!(request.method, method, "Unexpected method for request {index}");
        assert!(
            request.url.contains(url_contains),
            "Expected URL to contain '{url_contains}', got '{}'",
            request.url
        );
    }

    /// Asserts a header of request `index`.
    pub fn verify_header(&self, index: usize, name: &str, value: &str) {
        let requests = lock(&self.requests);
        let request = requests
            .get(index)
            .unwrap_or_else(|| panic!("No request at index {index}"));
        assert_eq!(request.header(name), Some(value), "Unexpected header '{name}'");
    }

    /// Forgets recorded requests.
    pub fn clear_requests(&self) {
        lock(&self.requests).clear();
    }
}

#[async_trait]
impl HttpTransport for MockHttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        lock(&self.requests).push(request);
        lock(&self.responses).pop_front().unwrap_or_else(|| {
            Err(TransportError::Connection(
                "No response configured in MockHttpTransport".to_string(),
            ))
        })
    }

    async fn send_streaming(&self, request: HttpRequest) -> Result<ChunkedStream, TransportError> {
        lock(&self.requests).push(request);
        let chunks = lock(&self.streaming_responses).pop_front().unwrap_or_else(|| {
            Err(TransportError::Connection(
                "No streaming response configured in MockHttpTransport".to_string(),
            ))
        })?;
        Ok(Box::pin(stream::iter(chunks.into_iter().map(Ok))))
    }
}

/// Fixed-key [`AuthManager`].
///
/// ```
/// use gemini_sdk::auth::AuthManager;
/// use gemini_sdk::mocks::MockAuthManager;
///
/// let auth = MockAuthManager::new("test-api-key");
/// assert_eq!(
///     auth.auth_header(),
///     Some(("x-goog-api-key".to_string(), "test-api-key".to_string()))
/// );
/// ```
#[derive(Debug, Clone)]
pub struct MockAuthManager {
    api_key: String,
    use_header: bool,
}

impl MockAuthManager {
    /// Header auth.
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            use_header: true,
        }
    }

    /// Query parameter auth.
    pub fn with_query_param(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            use_header: false,
        }
    }
}

impl AuthManager for MockAuthManager {
    fn auth_header(&self) -> Option<(String, String)> {
        self.use_header
            .then(|| (API_KEY_HEADER.to_string(), self.api_key.clone()))
    }

    fn auth_query_param(&self) -> Option<(String, String)> {
        (!self.use_header).then(|| (API_KEY_QUERY_PARAM.to_string(), self.api_key.clone()))
    }
}

/// One entry captured by [`RecordingLogger`].
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    /// `debug`, `info`, `warn` or `error`.
    pub level: &'static str,
    /// Message.
    pub message: String,
    /// Structured fields as passed in.
    pub fields: Value,
}

/// [`Logger`] that keeps every record in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingLogger {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl RecordingLogger {
    /// Empty logger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records so far.
    pub fn records(&self) -> Vec<LogRecord> {
        lock(&self.records).clone()
    }

    /// Records with `message`.
    pub fn find(&self, message: &str) -> Vec<LogRecord> {
        lock(&self.records)
            .iter()
            .filter(|r| r.message == message)
            .cloned()
            .collect()
    }

    fn push(&self, level: &'static str, message: &str, fields: Value) {
        lock(&self.records).push(LogRecord {
            level,
            message: message.to_string(),
            fields,
        });
    }
}

impl Logger for RecordingLogger {
    fn debug(&self, message: &str, fields: Value) {
        self.push("debug", message, fields);
    }

    fn info(&self, message: &str, fields: Value) {
        self.push("info", message, fields);
    }

    fn warn(&self, message: &str, fields: Value) {
        self.push("warn", message, fields);
    }

    fn error(&self, message: &str, fields: Value) {
        self.push("error", message, fields);
    }
}

/// Config pointing at `base_url` with a throwaway key, for wiremock tests.
pub fn test_config(base_url: &str) -> GeminiConfig {
    GeminiConfig::builder()
        .api_key(secrecy::SecretString::new(MOCK_API_KEY.to_string()))
        .base_url(base_url)
        .and_then(|b| b.max_retries(0).build())
        .unwrap_or_else(|e| panic!("invalid test config: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    fn get(url: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: url.to_string(),
            headers: HashMap::new(),
            body: None,
        }
    }

    #[tokio::test]
    async fn test_mock_transport_answers_in_order() {
        // Arrange
        let transport = MockHttpTransport::new();
        transport.enqueue_json_response(200, r#"{"id": 1}"#);
        transport.enqueue_json_response(201, r#"{"id": 2}"#);

        // Act
        let first = transport.send(get("https://example.com/1")).await.unwrap();
        let second = transport.send(get("https://example.com/2")).await.unwrap();
        let third = transport.send(get("https://example.com/3")).await;

        // Assert
        assert_eq!(first.status, 200);
        assert_eq!(second.status, 201);
        assert!(matches!(third, Err(TransportError::Connection(_))));
        transport.verify_request_count(3);
        transport.verify_request(1, HttpMethod::Get, "/2");
    }

    #[tokio::test]
    async fn test_mock_transport_streaming() {
        let transport = MockHttpTransport::new();
        transport.enqueue_streaming_response(vec![Bytes::from("a"), Bytes::from("b")]);

        let stream = transport.send_streaming(get("https://example.com/s")).await.unwrap();
        let chunks: Vec<_> = stream.map(Result::unwrap).collect().await;

        assert_eq!(chunks, vec![Bytes::from("a"), Bytes::from("b")]);
    }

    #[test]
    fn test_mock_auth_manager() {
        let header = MockAuthManager::new("k");
        assert!(header.auth_query_param().is_none());

        let query = MockAuthManager::with_query_param("k");
        assert_eq!(query.auth_query_param(), Some(("key".to_string(), "k".to_string())));
        assert!(query.auth_header().is_none());
    }

    #[test]
    fn test_recording_logger() {
        let logger = RecordingLogger::new();
        logger.info("hello", serde_json::json!({"a": 1}));
        logger.warn("hello", Value::Null);

        assert_eq!(logger.records().len(), 2);
        assert_eq!(logger.find("hello")[1].level, "warn");
    }
}
