//! Client trait definitions for Gemini API.

use async_trait::async_trait;

use crate::chat::{ChatSession, GenerateRequestBuilder, GenerationResult};
use crate::error::ApiValidationResult;
use crate::resilience::RetryConfig;
use crate::services::{
    BatchesService, CachedContentService, ContentService, EmbeddingsService, FilesService,
    ModelsService,
};
use crate::types::GenerateContentRequest;

/// Main client for interacting with Google Gemini API.
#[async_trait]
pub trait GeminiClient: Send + Sync {
    /// Content generation and token counting.
    fn content(&self) -> &dyn ContentService;

    /// Model metadata and prediction.
    fn models(&self) -> &dyn ModelsService;

    /// File uploads.
    fn files(&self) -> &dyn FilesService;

    /// Embeddings.
    fn embeddings(&self) -> &dyn EmbeddingsService;

    /// Context caching.
    fn cached_content(&self) -> &dyn CachedContentService;

    /// Batch jobs.
    fn batches(&self) -> &dyn BatchesService;

    /// Generates and flattens the outcome; never returns `Err`.
    async fn generate(&self, model: &str, request: GenerateContentRequest) -> GenerationResult;

    /// Streams, handing each text delta to `on_text`, and returns the merged
    /// outcome.
    async fn stream(
        &self,
        model: &str,
        request: GenerateContentRequest,
        on_text: &mut (dyn for<'s> FnMut(&'s str) + Send),
    ) -> GenerationResult;

    /// Probes the API with the configured key.
    async fn verify_api_key(&self) -> ApiValidationResult;

    /// Fluent one-shot request.
    fn request(&self) -> GenerateRequestBuilder;

    /// New chat with `model`.
    fn start_chat(&self, model: &str) -> ChatSession;

    /// New chat with `model`, labelled `name`.
    fn start_named_chat(&self, model: &str, name: &str) -> ChatSession {
        let mut chat = self.start_chat(model);
        chat.set_name(name);
        chat
    }

    /// Retry policy applied to every request.
    fn retry_config(&self) -> RetryConfig;

    /// Replaces the retry policy for all services of this client.
    fn set_retry_config(&self, config: RetryConfig);
}
