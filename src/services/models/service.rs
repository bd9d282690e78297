use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::json;

use super::ModelsService;
use crate::error::GeminiResult;
use crate::services::content::validate_model_name;
use crate::services::context::ServiceContext;
use crate::transport::{endpoints, HttpMethod};
use crate::types::{
    ListModelsParams, ListModelsResponse, ModelInfo, Operation, PredictRequest, PredictResponse,
};

/// How long model metadata stays cached.
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
struct CacheEntry {
    model: ModelInfo,
    expires_at: Instant,
}

#[derive(Debug, Clone)]
struct ModelsCache {
    entries: Arc<Mutex<HashMap<String, CacheEntry>>>,
    ttl: Duration,
}

impl ModelsCache {
    fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn get(&self, name: &str) -> Option<ModelInfo> {
        let mut entries = self.entries();
        match entries.get(name) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.model.clone()),
            Some(_) => {
                entries.remove(name);
                None
            }
            None => None,
        }
    }

    fn insert(&self, name: String, model: ModelInfo) {
        self.entries().insert(
            name,
            CacheEntry {
                model,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    fn clear(&self) {
        self.entries().clear();
    }
}

/// [`ModelsService`] over the REST API, caching `get` results.
#[derive(Clone)]
pub struct ModelsServiceImpl {
    context: ServiceContext,
    cache: Option<ModelsCache>,
}

impl ModelsServiceImpl {
    /// Service with a five minute metadata cache.
    pub fn new(context: ServiceContext) -> Self {
        Self::with_cache_ttl(context, DEFAULT_CACHE_TTL)
    }

    /// Service caching `get` results for `ttl`.
    pub fn with_cache_ttl(context: ServiceContext, ttl: Duration) -> Self {
        Self {
            context,
            cache: Some(ModelsCache::new(ttl)),
        }
    }

    /// Service that always asks the server.
    pub fn without_cache(context: ServiceContext) -> Self {
        Self {
            context,
            cache: None,
        }
    }

    /// Drops cached metadata.
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }
}

#[async_trait]
impl ModelsService for ModelsServiceImpl {
    async fn list(&self, params: Option<ListModelsParams>) -> GeminiResult<ListModelsResponse> {
        let params = params.unwrap_or_default();
        let url = self
            .context
            .builder()
            .url(endpoints::MODELS)
            .add_optional_query("pageSize", params.page_size)
            .add_optional_query("pageToken", params.page_token);
        let request = self.context.builder().empty_request(HttpMethod::Get, url);
        self.context.execute(request).await
    }

    async fn get(&self, model: &str) -> GeminiResult<ModelInfo> {
        validate_model_name(model)?;
        let name = endpoints::model(model);

        if let Some(cached) = self.cache.as_ref().and_then(|c| c.get(&name)) {
            tracing::debug!(model = %name, "model metadata cache hit");
            return Ok(cached);
        }

        let url = self.context.builder().url(&name);
        let request = self.context.builder().empty_request(HttpMethod::Get, url);
        let info: ModelInfo = self.context.execute(request).await?;

        if let Some(cache) = &self.cache {
            cache.insert(name, info.clone());
        }
        Ok(info)
    }

    async fn predict(&self, model: &str, request: PredictRequest) -> GeminiResult<PredictResponse> {
        validate_model_name(model)?;
        let http = self.context.builder().json_request(
            HttpMethod::Post,
            &endpoints::predict(model),
            Some(&request),
        )?;
        self.context.execute(http).await
    }

    async fn predict_long_running(
        &self,
        model: &str,
        request: PredictRequest,
    ) -> GeminiResult<Operation> {
        validate_model_name(model)?;
        let http = self.context.builder().json_request(
            HttpMethod::Post,
            &endpoints::predict_long_running(model),
            Some(&request),
        )?;
        let operation: Operation = self.context.execute(http).await?;
        self.context.logger().info(
            "long-running prediction started",
            json!({"model": model, "operation": operation.name}),
        );
        Ok(operation)
    }
}
