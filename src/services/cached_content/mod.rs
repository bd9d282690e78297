//! Context caching.

mod service;
mod validation;

use async_trait::async_trait;

use crate::error::GeminiResult;
use crate::support::FieldMask;
use crate::types::{
    CachedContent, CreateCachedContentRequest, ListCachedContentsParams,
    ListCachedContentsResponse, UpdateCachedContentRequest,
};

pub use service::CachedContentServiceImpl;
pub use validation::{validate_cached_content_name, validate_create_request, validate_update_request};

/// Creates and manages cached prompt prefixes.
#[async_trait]
pub trait CachedContentService: Send + Sync {
    /// Creates a cache.
    async fn create(&self, request: CreateCachedContentRequest) -> GeminiResult<CachedContent>;

    /// One cache, with or without the `cachedContents/` prefix.
    async fn get(&self, name: &str) -> GeminiResult<CachedContent>;

    /// One page of caches.
    async fn list(
        &self,
        params: Option<ListCachedContentsParams>,
    ) -> GeminiResult<ListCachedContentsResponse>;

    /// Changes the expiry. Without an explicit mask the set fields of
    /// `request` are updated.
    async fn update(
        &self,
        name: &str,
        request: UpdateCachedContentRequest,
        update_mask: Option<FieldMask>,
    ) -> GeminiResult<CachedContent>;

    /// Deletes a cache.
    async fn delete(&self, name: &str) -> GeminiResult<()>;
}
