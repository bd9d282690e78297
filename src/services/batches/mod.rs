//! Asynchronous batch generation.

mod service;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::GeminiResult;
use crate::types::{
    EmbedContentBatch, GenerateContentBatch, ListOperationsParams, ListOperationsResponse,
    Operation, UpdateBatchParams,
};

pub use service::BatchesServiceImpl;

/// Submits and tracks batch jobs.
#[async_trait]
pub trait BatchesService: Send + Sync {
    /// Submits `batch` to `models/{model}:batchGenerateContent`.
    async fn create(&self, model: &str, batch: GenerateContentBatch) -> GeminiResult<Operation>;

    /// Current state of a batch.
    async fn get(&self, name: &str) -> GeminiResult<Operation>;

    /// One page of batch operations.
    async fn list(&self, params: Option<ListOperationsParams>) -> GeminiResult<ListOperationsResponse>;

    /// Requests cancellation; the batch ends up `BATCH_STATE_CANCELLED`.
    async fn cancel(&self, name: &str) -> GeminiResult<()>;

    /// Deletes a batch.
    async fn delete(&self, name: &str) -> GeminiResult<()>;

    /// Patches an embedding batch.
    async fn update_embed_batch(
        &self,
        name: &str,
        batch: EmbedContentBatch,
        params: UpdateBatchParams,
    ) -> GeminiResult<EmbedContentBatch>;

    /// Patches a generation batch.
    async fn update_generate_content_batch(
        &self,
        name: &str,
        batch: GenerateContentBatch,
        params: UpdateBatchParams,
    ) -> GeminiResult<GenerateContentBatch>;

    /// Polls [`get`](Self::get) until the operation is done.
    async fn wait_for_completion(
        &self,
        name: &str,
        timeout: Duration,
        poll_interval: Duration,
    ) -> GeminiResult<Operation>;
}
