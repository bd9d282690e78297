use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;

use super::BatchesService;
use crate::error::{GeminiError, GeminiResult, NetworkError, ValidationDetail};
use crate::services::content::{validate_generate_request, validate_model_name};
use crate::services::context::{validation_failure, ServiceContext};
use crate::support::Url;
use crate::transport::{endpoints, HttpMethod};
use crate::types::{
    BatchGenerateContentRequest, EmbedContentBatch, GenerateContentBatch, ListOperationsParams,
    ListOperationsResponse, Operation, UpdateBatchParams,
};

/// [`BatchesService`] over the REST API.
#[derive(Clone)]
pub struct BatchesServiceImpl {
    context: ServiceContext,
}

fn validate_batch_name(name: &str) -> GeminiResult<()> {
    let id = name
        .strip_prefix("batches/")
        .or_else(|| name.strip_prefix("operations/"))
        .unwrap_or(name);
    let mut details = Vec::new();
    if id.trim().is_empty() {
        details.push(ValidationDetail::new("name", "Batch name must not be empty"));
    } else if id.contains('/') {
        details.push(ValidationDetail::new(
            "name",
            "Batch name must be a bare id or start with 'batches/'",
        ));
    }
    validation_failure("Invalid batch name", details)
}

fn validate_batch(batch: &GenerateContentBatch) -> GeminiResult<()> {
    let mut details = Vec::new();
    if batch.display_name.trim().is_empty() {
        details.push(ValidationDetail::new("batch.displayName", "Display name must not be empty"));
    }
    let config = &batch.input_config;
    match (&config.file_name, &config.requests) {
        (None, None) => details.push(ValidationDetail::new(
            "batch.inputConfig",
            "Either fileName or requests must be provided",
        )),
        (Some(_), Some(_)) => details.push(ValidationDetail::new(
            "batch.inputConfig",
            "Only one of fileName or requests may be provided",
        )),
        (None, Some(inline)) if inline.requests.is_empty() => details.push(ValidationDetail::new(
            "batch.inputConfig.requests",
            "Inline batch must contain at least one request",
        )),
        _ => {}
    }
    validation_failure("Invalid batch", details)?;

    if let Some(inline) = &config.requests {
        for entry in &inline.requests {
            validate_generate_request(&entry.request)?;
        }
    }
    Ok(())
}

impl BatchesServiceImpl {
    /// Service using `context`.
    pub fn new(context: ServiceContext) -> Self {
        Self { context }
    }

    async fn patch<B, R>(&self, url: Url, body: &B, params: &UpdateBatchParams) -> GeminiResult<R>
    where
        B: Serialize + Sync,
        R: serde::de::DeserializeOwned,
    {
        let url = if params.update_mask.is_empty() {
            url
        } else {
            url.add_query("updateMask", &params.update_mask.to_string())
        };
        let request = self
            .context
            .builder()
            .build_request(HttpMethod::Patch, url, Some(body))?;
        self.context.execute(request).await
    }
}

#[async_trait]
impl BatchesService for BatchesServiceImpl {
    async fn create(&self, model: &str, mut batch: GenerateContentBatch) -> GeminiResult<Operation> {
        validate_model_name(model)?;
        validate_batch(&batch)?;
        batch.model.get_or_insert_with(|| endpoints::model(model));

        let body = BatchGenerateContentRequest { batch };
        let http = self.context.builder().json_request(
            HttpMethod::Post,
            &endpoints::batch_generate_content(model),
            Some(&body),
        )?;
        let operation: Operation = self.context.execute(http).await?;
        self.context.logger().info(
            "batch created",
            json!({"model": model, "name": operation.name, "display_name": body.batch.display_name}),
        );
        Ok(operation)
    }

    async fn get(&self, name: &str) -> GeminiResult<Operation> {
        validate_batch_name(name)?;
        let url = self.context.builder().url(&endpoints::batch(name));
        let request = self.context.builder().empty_request(HttpMethod::Get, url);
        self.context.execute(request).await
    }

    async fn list(&self, params: Option<ListOperationsParams>) -> GeminiResult<ListOperationsResponse> {
        let params = params.unwrap_or_default();
        let url = self
            .context
            .builder()
            .url(endpoints::BATCHES)
            .add_optional_query("filter", params.filter)
            .add_optional_query("pageSize", params.page_size)
            .add_optional_query("pageToken", params.page_token);
        let request = self.context.builder().empty_request(HttpMethod::Get, url);
        self.context.execute(request).await
    }

    async fn cancel(&self, name: &str) -> GeminiResult<()> {
        validate_batch_name(name)?;
        let url = self.context.builder().url(&endpoints::cancel_batch(name));
        let request = self.context.builder().empty_request(HttpMethod::Post, url);
        self.context.execute_empty(request).await?;
        self.context
            .logger()
            .info("batch cancelled", json!({"name": endpoints::batch(name)}));
        Ok(())
    }

    async fn delete(&self, name: &str) -> GeminiResult<()> {
        validate_batch_name(name)?;
        let url = self.context.builder().url(&endpoints::batch(name));
        let request = self.context.builder().empty_request(HttpMethod::Delete, url);
        self.context.execute_empty(request).await?;
        self.context
            .logger()
            .info("batch deleted", json!({"name": endpoints::batch(name)}));
        Ok(())
    }

    async fn update_embed_batch(
        &self,
        name: &str,
        batch: EmbedContentBatch,
        params: UpdateBatchParams,
    ) -> GeminiResult<EmbedContentBatch> {
        validate_batch_name(name)?;
        let url = self
            .context
            .builder()
            .url(&endpoints::update_embed_content_batch(name));
        self.patch(url, &batch, &params).await
    }

    async fn update_generate_content_batch(
        &self,
        name: &str,
        batch: GenerateContentBatch,
        params: UpdateBatchParams,
    ) -> GeminiResult<GenerateContentBatch> {
        validate_batch_name(name)?;
        let url = self
            .context
            .builder()
            .url(&endpoints::update_generate_content_batch(name));
        self.patch(url, &batch, &params).await
    }

    async fn wait_for_completion(
        &self,
        name: &str,
        timeout: Duration,
        poll_interval: Duration,
    ) -> GeminiResult<Operation> {
        let started = Instant::now();
        loop {
            let operation = self.get(name).await?;
            if operation.done {
                return Ok(operation);
            }
            if started.elapsed() >= timeout {
                return Err(GeminiError::Network(NetworkError::Timeout { duration: timeout }));
            }
            tracing::debug!(batch = name, "waiting for batch to finish");
            tokio::time::sleep(poll_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{RequestError, ResourceError};
    use crate::mocks::MockHttpTransport;
    use crate::types::{BatchState, Content, GenerateContentRequest};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn inline_batch() -> GenerateContentBatch {
        GenerateContentBatch::inline(
            "nightly",
            vec![GenerateContentRequest::new(vec![Content::user_text("hi")])],
        )
    }

    #[tokio::test]
    async fn test_create_posts_wrapped_batch() {
        // Arrange
        let transport = MockHttpTransport::new();
        transport.enqueue_json(
            200,
            &json!({
                "name": "batches/b1",
                "metadata": {
                    "@type": "type.googleapis.com/google.ai.generativelanguage.v1main.GenerateContentBatch",
                    "displayName": "nightly",
                    "inputConfig": {},
                    "state": "BATCH_STATE_PENDING"
                }
            }),
        );
        let service = BatchesServiceImpl::new(transport.context());

        // Act
        let operation = service.create("gemini-2.5-flash", inline_batch()).await.unwrap();

        // Assert
        assert_eq!(operation.name, "batches/b1");
        assert_eq!(
            operation.batch().unwrap().unwrap().state,
            Some(BatchState::BatchStatePending)
        );
        let request = transport.last_request().unwrap();
        assert!(request.url.contains("models/gemini-2.5-flash:batchGenerateContent"));
        let body = request.json_body().unwrap();
        assert_eq!(body["batch"]["model"], json!("models/gemini-2.5-flash"));
        assert_eq!(
            body["batch"]["inputConfig"]["requests"]["requests"][0]["request"]["contents"][0]["parts"][0]["text"],
            json!("hi")
        );
    }

    #[tokio::test]
    async fn test_create_rejects_empty_input() {
        let transport = MockHttpTransport::new();
        let service = BatchesServiceImpl::new(transport.context());

        let err = service
            .create("gemini-2.5-flash", GenerateContentBatch::inline("empty", Vec::new()))
            .await
            .unwrap_err();

        assert!(matches!(err, GeminiError::Request(RequestError::ValidationError { .. })));
        transport.verify_request_count(0);
    }

    #[tokio::test]
    async fn test_cancel_and_missing_batch() {
        let transport = MockHttpTransport::new();
        transport.enqueue_json_response(200, "{}");
        transport.enqueue_json_response(
            404,
            r#"{"error": {"code": 404, "message": "Batch batches/gone not found", "status": "NOT_FOUND"}}"#,
        );
        let service = BatchesServiceImpl::new(transport.context());

        service.cancel("b1").await.unwrap();
        let err = service.get("batches/gone").await.unwrap_err();

        transport.verify_request(0, HttpMethod::Post, "/v1beta/batches/b1:cancel");
        assert!(matches!(err, GeminiError::Resource(ResourceError::BatchNotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_embed_batch_sends_mask() {
        let transport = MockHttpTransport::new();
        transport.enqueue_json_response(200, r#"{"name": "batches/e1", "priority": "5"}"#);
        let service = BatchesServiceImpl::new(transport.context());

        let updated = service
            .update_embed_batch(
                "e1",
                EmbedContentBatch {
                    priority: Some(5),
                    ..EmbedContentBatch::default()
                },
                UpdateBatchParams::fields(["priority"]),
            )
            .await
            .unwrap();

        assert_eq!(updated.priority, Some(5));
        transport.verify_request(
            0,
            HttpMethod::Patch,
            "/v1beta/batches/e1:updateEmbedContentBatch?updateMask=priority",
        );
    }

    #[tokio::test]
    async fn test_wait_for_completion() {
        let transport = MockHttpTransport::new();
        transport.enqueue_json_response(200, r#"{"name": "batches/b1"}"#);
        transport.enqueue_json_response(200, r#"{"name": "batches/b1", "done": true, "response": {"displayName": "x", "inputConfig": {}, "state": "BATCH_STATE_SUCCEEDED"}}"#);
        let service = BatchesServiceImpl::new(transport.context());

        let operation = service
            .wait_for_completion("b1", Duration::from_secs(5), Duration::from_millis(1))
            .await
            .unwrap();

        assert!(operation.done);
        assert_eq!(
            operation.batch().unwrap().unwrap().state,
            Some(BatchState::BatchStateSucceeded)
        );
    }
}
