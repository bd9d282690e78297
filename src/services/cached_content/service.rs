use async_trait::async_trait;
use serde_json::json;

use super::validation::{validate_cached_content_name, validate_create_request, validate_update_request};
use super::CachedContentService;
use crate::error::GeminiResult;
use crate::services::context::ServiceContext;
use crate::support::FieldMask;
use crate::transport::{endpoints, HttpMethod};
use crate::types::{
    CachedContent, CreateCachedContentRequest, ListCachedContentsParams,
    ListCachedContentsResponse, UpdateCachedContentRequest,
};

/// [`CachedContentService`] over the REST API.
#[derive(Clone)]
pub struct CachedContentServiceImpl {
    context: ServiceContext,
}

impl CachedContentServiceImpl {
    /// Service using `context`.
    pub fn new(context: ServiceContext) -> Self {
        Self { context }
    }
}

#[async_trait]
impl CachedContentService for CachedContentServiceImpl {
    async fn create(&self, mut request: CreateCachedContentRequest) -> GeminiResult<CachedContent> {
        validate_create_request(&request)?;
        request.model = endpoints::model(&request.model);
        let http = self.context.builder().json_request(
            HttpMethod::Post,
            endpoints::CACHED_CONTENTS,
            Some(&request),
        )?;
        let cached: CachedContent = self.context.execute(http).await?;
        self.context.logger().info(
            "cached content created",
            json!({
                "name": cached.name.as_ref().map(|n| n.as_str().to_string()),
                "model": request.model,
                "tokens": cached.usage_metadata.map(|u| u.total_token_count),
            }),
        );
        Ok(cached)
    }

    async fn get(&self, name: &str) -> GeminiResult<CachedContent> {
        validate_cached_content_name(name)?;
        let url = self.context.builder().url(&endpoints::cached_content(name));
        let request = self.context.builder().empty_request(HttpMethod::Get, url);
        self.context.execute(request).await
    }

    async fn list(
        &self,
        params: Option<ListCachedContentsParams>,
    ) -> GeminiResult<ListCachedContentsResponse> {
        let params = params.unwrap_or_default();
        let url = self
            .context
            .builder()
            .url(endpoints::CACHED_CONTENTS)
            .add_optional_query("pageSize", params.page_size)
            .add_optional_query("pageToken", params.page_token);
        let request = self.context.builder().empty_request(HttpMethod::Get, url);
        self.context.execute(request).await
    }

    async fn update(
        &self,
        name: &str,
        request: UpdateCachedContentRequest,
        update_mask: Option<FieldMask>,
    ) -> GeminiResult<CachedContent> {
        validate_cached_content_name(name)?;
        validate_update_request(&request)?;
        let mask = update_mask
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| request.update_mask());

        let url = self
            .context
            .builder()
            .url(&endpoints::cached_content(name))
            .add_query("updateMask", &mask.to_string());
        let http = self
            .context
            .builder()
            .build_request(HttpMethod::Patch, url, Some(&request))?;
        self.context.execute(http).await
    }

    async fn delete(&self, name: &str) -> GeminiResult<()> {
        validate_cached_content_name(name)?;
        let url = self.context.builder().url(&endpoints::cached_content(name));
        let request = self.context.builder().empty_request(HttpMethod::Delete, url);
        self.context.execute_empty(request).await?;
        self.context.logger().info(
            "cached content deleted",
            json!({"name": endpoints::cached_content(name)}),
        );
        Ok(())
    }
}
