//! Text embeddings.

mod service;
mod validation;

use async_trait::async_trait;

use crate::error::GeminiResult;
use crate::types::{BatchEmbedContentsResponse, EmbedContentRequest, EmbedContentResponse};

pub use service::{EmbeddingsServiceImpl, DEFAULT_EMBEDDING_MODEL};
pub use validation::{validate_batch_size, validate_embed_request, MAX_BATCH_SIZE};

/// `:embedContent` and `:batchEmbedContents`.
#[async_trait]
pub trait EmbeddingsService: Send + Sync {
    /// Embeds one content.
    async fn embed_content(
        &self,
        model: &str,
        request: EmbedContentRequest,
    ) -> GeminiResult<EmbedContentResponse>;

    /// Embeds several contents in one call; results keep request order.
    async fn batch_embed_contents(
        &self,
        model: &str,
        requests: Vec<EmbedContentRequest>,
    ) -> GeminiResult<BatchEmbedContentsResponse>;
}
