//! Main client implementation for Gemini API.

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use serde_json::json;
use std::sync::Arc;

use crate::chat::{stream_to_result, ChatSession, GenerateRequestBuilder, GenerationResult};
use crate::config::GeminiConfig;
use crate::error::{ApiValidationResult, GeminiError};
use crate::resilience::RetryConfig;
use crate::services::{
    BatchesService, BatchesServiceImpl, CachedContentService, CachedContentServiceImpl,
    ContentService, ContentServiceImpl, EmbeddingsService, EmbeddingsServiceImpl, FilesService,
    FilesServiceImpl, ModelsService, ModelsServiceImpl, ServiceContext,
};
use crate::types::{GenerateContentRequest, ListModelsParams};

use super::builder::GeminiClientBuilder;
use super::traits::GeminiClient;

/// Implementation of the Gemini API client.
///
/// Services share one [`ServiceContext`] and are created on first access.
///
/// # Example
///
/// ```no_run
/// use gemini_sdk::{GeminiClient, GeminiClientImpl};
/// use secrecy::SecretString;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = GeminiClientImpl::builder()
///     .api_key(SecretString::new("your-api-key".into()))
///     .build()?;
///
/// let result = client.request().text("Hello").generate().await;
/// println!("{}", result.text());
/// # Ok(())
/// # }
/// ```
pub struct GeminiClientImpl {
    config: GeminiConfig,
    context: ServiceContext,

    // Lazy-initialized services
    content_service: OnceCell<Arc<ContentServiceImpl>>,
    models_service: OnceCell<ModelsServiceImpl>,
    files_service: OnceCell<FilesServiceImpl>,
    embeddings_service: OnceCell<EmbeddingsServiceImpl>,
    cached_content_service: OnceCell<CachedContentServiceImpl>,
    batches_service: OnceCell<BatchesServiceImpl>,
}

impl GeminiClientImpl {
    /// Creates a new client builder.
    pub fn builder() -> GeminiClientBuilder {
        GeminiClientBuilder::new()
    }

    /// Creates a client from environment variables.
    ///
    /// See [`GeminiConfig::from_env`] for the variables read.
    pub fn from_env() -> Result<Self, GeminiError> {
        Self::new(GeminiConfig::from_env()?)
    }

    /// Creates a client from a configuration object.
    pub fn new(config: GeminiConfig) -> Result<Self, GeminiError> {
        GeminiClientBuilder::from_config(config).build()
    }

    pub(super) fn from_parts(config: GeminiConfig, context: ServiceContext) -> Self {
        Self {
            config,
            context,
            content_service: OnceCell::new(),
            models_service: OnceCell::new(),
            files_service: OnceCell::new(),
            embeddings_service: OnceCell::new(),
            cached_content_service: OnceCell::new(),
            batches_service: OnceCell::new(),
        }
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn content_arc(&self) -> &Arc<ContentServiceImpl> {
        self.content_service
            .get_or_init(|| Arc::new(ContentServiceImpl::new(self.context.clone())))
    }

    /// Shared handle to the content service, for restoring sessions with
    /// [`ChatSession::load`].
    pub fn content_handle(&self) -> Arc<dyn ContentService> {
        self.content_arc().clone()
    }
}

#[async_trait]
impl GeminiClient for GeminiClientImpl {
    fn content(&self) -> &dyn ContentService {
        self.content_arc().as_ref()
    }

    fn models(&self) -> &dyn ModelsService {
        self.models_service
            .get_or_init(|| ModelsServiceImpl::new(self.context.clone()))
    }

    fn files(&self) -> &dyn FilesService {
        self.files_service
            .get_or_init(|| FilesServiceImpl::new(self.context.clone()))
    }

    fn embeddings(&self) -> &dyn EmbeddingsService {
        self.embeddings_service
            .get_or_init(|| EmbeddingsServiceImpl::new(self.context.clone()))
    }

    fn cached_content(&self) -> &dyn CachedContentService {
        self.cached_content_service
            .get_or_init(|| CachedContentServiceImpl::new(self.context.clone()))
    }

    fn batches(&self) -> &dyn BatchesService {
        self.batches_service
            .get_or_init(|| BatchesServiceImpl::new(self.context.clone()))
    }

    async fn generate(&self, model: &str, request: GenerateContentRequest) -> GenerationResult {
        GenerationResult::from_outcome(self.content().generate_content(model, request).await)
    }

    async fn stream(
        &self,
        model: &str,
        request: GenerateContentRequest,
        on_text: &mut (dyn for<'s> FnMut(&'s str) + Send),
    ) -> GenerationResult {
        stream_to_result(self.content(), model, request, on_text).await
    }

    async fn verify_api_key(&self) -> ApiValidationResult {
        let probe = ListModelsParams {
            page_size: Some(1),
            page_token: None,
        };
        match self.models().list(Some(probe)).await {
            Ok(_) => {
                self.context.logger().info("api key verified", json!({}));
                ApiValidationResult::valid()
            }
            Err(err) => {
                let verdict = ApiValidationResult::from_error(&err);
                self.context.logger().warn(
                    "api key rejected",
                    json!({"status": verdict.status_code, "reason": verdict.reason}),
                );
                verdict
            }
        }
    }

    fn request(&self) -> GenerateRequestBuilder {
        GenerateRequestBuilder::new(self.content_handle())
    }

    fn start_chat(&self, model: &str) -> ChatSession {
        ChatSession::new(self.content_handle(), model)
    }

    fn retry_config(&self) -> RetryConfig {
        self.context.retry_config()
    }

    fn set_retry_config(&self, config: RetryConfig) {
        self.context.set_retry_config(config);
    }
}

impl std::fmt::Debug for GeminiClientImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClientImpl")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Create a client from configuration.
pub fn create_client(config: GeminiConfig) -> Result<Arc<dyn GeminiClient>, GeminiError> {
    let client = GeminiClientImpl::new(config)?;
    Ok(Arc::new(client))
}

/// Create a client from environment variables.
pub fn create_client_from_env() -> Result<Arc<dyn GeminiClient>, GeminiError> {
    let config = GeminiConfig::from_env()?;
    create_client(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AuthMethod, DEFAULT_API_VERSION, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
    use crate::mocks::{MockHttpTransport, RecordingLogger};
    use crate::transport::HttpMethod;
    use pretty_assertions::assert_eq;
    use secrecy::SecretString;
    use std::time::Duration;

    fn mock_client(mock: &MockHttpTransport) -> GeminiClientImpl {
        GeminiClientBuilder::new()
            .api_key(SecretString::new("test-api-key".into()))
            .base_url("https://mock.test")
            .retry_config(RetryConfig::no_retry())
            .transport(Arc::new(mock.clone()))
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_with_api_key() {
        let client = GeminiClientBuilder::new()
            .api_key(SecretString::new("test-api-key".into()))
            .build()
            .unwrap();

        assert_eq!(client.config().api_version, DEFAULT_API_VERSION);
        assert_eq!(client.config().auth_method, AuthMethod::Header);
    }

    #[test]
    fn test_builder_custom_settings() {
        let client = GeminiClientBuilder::new()
            .api_key(SecretString::new("test-api-key".into()))
            .api_version("v1")
            .timeout(Duration::from_secs(60))
            .auth_method(AuthMethod::QueryParam)
            .build()
            .unwrap();

        assert_eq!(client.config().api_version, "v1");
        assert_eq!(client.config().timeout, Duration::from_secs(60));
        assert_eq!(client.config().auth_method, AuthMethod::QueryParam);
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let result = GeminiClientBuilder::new()
            .api_key(SecretString::new("k".into()))
            .base_url("not a url")
            .build();

        assert!(matches!(result, Err(GeminiError::Configuration(_))));
    }

    #[test]
    fn test_builder_from_config() {
        let config = GeminiConfig::builder()
            .api_key(SecretString::new("test-key".into()))
            .api_version("v1")
            .build()
            .unwrap();

        let client = GeminiClientBuilder::from_config(config).build().unwrap();

        assert_eq!(client.config().api_version, "v1");
    }

    #[test]
    fn test_default_values() {
        let client = GeminiClientBuilder::new()
            .api_key(SecretString::new("test-key".into()))
            .build()
            .unwrap();

        assert_eq!(client.config().base_url.as_str(), format!("{}/", DEFAULT_BASE_URL));
        assert_eq!(client.config().timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(client.retry_config(), RetryConfig::default());
    }

    #[tokio::test]
    async fn test_verify_api_key_valid() {
        // Arrange
        let mock = MockHttpTransport::new();
        mock.enqueue_json_response(200, r#"{"models": []}"#);
        let client = mock_client(&mock);

        // Act
        let verdict = client.verify_api_key().await;

        // Assert
        assert!(verdict.is_valid);
        assert_eq!(verdict.status_code, 200);
        mock.verify_request(0, HttpMethod::Get, "https://mock.test/v1beta/models?pageSize=1");
        mock.verify_header(0, "x-goog-api-key", "test-api-key");
    }

    #[tokio::test]
    async fn test_verify_api_key_rejected() {
        let mock = MockHttpTransport::new();
        mock.enqueue_json_response(
            400,
            r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#,
        );
        let client = mock_client(&mock);

        let verdict = client.verify_api_key().await;

        assert!(!verdict.is_valid);
        assert_eq!(verdict.status_code, 400);
        assert!(verdict.reason.contains("API key not valid"));
    }

    #[tokio::test]
    async fn test_retry_config_is_shared_by_services() {
        // Arrange
        let mock = MockHttpTransport::new();
        mock.enqueue_json_response(503, r#"{"error":{"code":503,"message":"busy","status":"UNAVAILABLE"}}"#);
        mock.enqueue_json_response(200, r#"{"models": []}"#);
        let client = mock_client(&mock);

        // Act
        client.set_retry_config(RetryConfig {
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
            enable_jitter: false,
            ..RetryConfig::default()
        });
        let verdict = client.verify_api_key().await;

        // Assert
        assert!(verdict.is_valid);
        mock.verify_request_count(2);
    }

    #[tokio::test]
    async fn test_generate_flattens_errors() {
        let mock = MockHttpTransport::new();
        mock.enqueue_json_response(
            429,
            r#"{"error":{"code":429,"message":"Resource has been exhausted","status":"RESOURCE_EXHAUSTED"}}"#,
        );
        let client = mock_client(&mock);

        let result = client
            .generate("gemini-2.5-flash", GenerateContentRequest::from_text("hi"))
            .await;

        assert!(!result.success);
        assert_eq!(result.status_code, 429);
    }

    #[tokio::test]
    async fn test_injected_logger_sees_requests() {
        let mock = MockHttpTransport::new();
        mock.enqueue_json_response(200, r#"{"models": []}"#);
        let logger = Arc::new(RecordingLogger::new());
        let client = GeminiClientBuilder::new()
            .api_key(SecretString::new("k".into()))
            .transport(Arc::new(mock.clone()))
            .logger(logger.clone())
            .build()
            .unwrap();

        client.verify_api_key().await;

        assert!(!logger.find("sending request").is_empty());
        assert!(!logger.find("api key verified").is_empty());
    }
}
