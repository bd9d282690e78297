//! Model metadata and the `predict` endpoints.

mod service;

use async_trait::async_trait;

use crate::error::GeminiResult;
use crate::types::{
    ListModelsParams, ListModelsResponse, ModelInfo, Operation, PredictRequest, PredictResponse,
};

pub use service::ModelsServiceImpl;

/// Page size used by [`ModelsService::list_all`].
pub const LIST_ALL_PAGE_SIZE: i32 = 100;

/// Lists and describes models.
#[async_trait]
pub trait ModelsService: Send + Sync {
    /// One page of models.
    async fn list(&self, params: Option<ListModelsParams>) -> GeminiResult<ListModelsResponse>;

    /// Every model, following page tokens.
    async fn list_all(&self) -> GeminiResult<Vec<ModelInfo>> {
        let mut models = Vec::new();
        let mut page_token = None;
        loop {
            let page = self
                .list(Some(ListModelsParams {
                    page_size: Some(LIST_ALL_PAGE_SIZE),
                    page_token,
                }))
                .await?;
            models.extend(page.models);
            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => return Ok(models),
            }
        }
    }

    /// One model, with or without the `models/` prefix.
    async fn get(&self, model: &str) -> GeminiResult<ModelInfo>;

    /// `models/{model}:predict`.
    async fn predict(&self, model: &str, request: PredictRequest) -> GeminiResult<PredictResponse>;

    /// `models/{model}:predictLongRunning`.
    async fn predict_long_running(
        &self,
        model: &str,
        request: PredictRequest,
    ) -> GeminiResult<Operation>;
}
