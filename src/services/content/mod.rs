//! Content generation and token counting.

mod service;
mod validation;

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::error::GeminiResult;
use crate::types::{
    CountTokensRequest, CountTokensResponse, GenerateContentRequest, GenerateContentResponse,
};

pub use service::{check_safety, ContentServiceImpl};
pub use validation::{validate_count_tokens_request, validate_generate_request, validate_model_name};

/// Streamed `generateContent` chunks.
pub type ContentStream = Pin<Box<dyn Stream<Item = GeminiResult<GenerateContentResponse>> + Send>>;

/// `models/{model}:generateContent` and friends.
#[async_trait]
pub trait ContentService: Send + Sync {
    /// One-shot generation. Blocked prompts and candidates fail with
    /// [`ContentError`](crate::error::ContentError).
    async fn generate_content(
        &self,
        model: &str,
        request: GenerateContentRequest,
    ) -> GeminiResult<GenerateContentResponse>;

    /// Streaming generation.
    async fn generate_content_stream(
        &self,
        model: &str,
        request: GenerateContentRequest,
    ) -> GeminiResult<ContentStream>;

    /// Token count of a prompt.
    async fn count_tokens(
        &self,
        model: &str,
        request: CountTokensRequest,
    ) -> GeminiResult<CountTokensResponse>;
}
