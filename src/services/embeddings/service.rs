use async_trait::async_trait;
use serde_json::json;

use super::validation::{validate_batch, validate_embed_request};
use super::EmbeddingsService;
use crate::error::GeminiResult;
use crate::services::content::validate_model_name;
use crate::services::context::ServiceContext;
use crate::transport::{endpoints, HttpMethod};
use crate::types::{
    BatchEmbedContentsRequest, BatchEmbedContentsResponse, EmbedContentRequest,
    EmbedContentResponse,
};

/// Embedding model used when callers have no preference.
pub const DEFAULT_EMBEDDING_MODEL: &str = "gemini-embedding-001";

/// [`EmbeddingsService`] over the REST API.
#[derive(Clone)]
pub struct EmbeddingsServiceImpl {
    context: ServiceContext,
}

impl EmbeddingsServiceImpl {
    /// Service using `context`.
    pub fn new(context: ServiceContext) -> Self {
        Self { context }
    }
}

#[async_trait]
impl EmbeddingsService for EmbeddingsServiceImpl {
    async fn embed_content(
        &self,
        model: &str,
        request: EmbedContentRequest,
    ) -> GeminiResult<EmbedContentResponse> {
        validate_model_name(model)?;
        validate_embed_request(&request)?;
        let http = self.context.builder().json_request(
            HttpMethod::Post,
            &endpoints::embed_content(model),
            Some(&request),
        )?;
        let response: EmbedContentResponse = self.context.execute(http).await?;
        self.context.logger().debug(
            "content embedded",
            json!({"model": model, "dimensions": response.embedding.values.len()}),
        );
        Ok(response)
    }

    async fn batch_embed_contents(
        &self,
        model: &str,
        requests: Vec<EmbedContentRequest>,
    ) -> GeminiResult<BatchEmbedContentsResponse> {
        validate_model_name(model)?;
        validate_batch(&requests)?;

        // Each entry must name the model explicitly.
        let model_name = endpoints::model(model);
        let requests = requests
            .into_iter()
            .map(|mut r| {
                r.model.get_or_insert_with(|| model_name.clone());
                r
            })
            .collect();
        let body = BatchEmbedContentsRequest { requests };

        let http = self.context.builder().json_request(
            HttpMethod::Post,
            &endpoints::batch_embed_contents(model),
            Some(&body),
        )?;
        let response: BatchEmbedContentsResponse = self.context.execute(http).await?;
        self.context.logger().debug(
            "contents embedded",
            json!({"model": model, "count": response.embeddings.len()}),
        );
        Ok(response)
    }
}
