//! Endpoint paths, relative to `{base}/{version}/`.
//!
//! Every helper accepts names with or without their collection prefix.

use crate::support::{ResourceName, ResourceType};

/// Models collection.
pub const MODELS: &str = "models";

/// Files collection.
pub const FILES: &str = "files";

/// Cached contents collection.
pub const CACHED_CONTENTS: &str = "cachedContents";

/// Batches collection.
pub const BATCHES: &str = "batches";

/// Operations collection.
pub const OPERATIONS: &str = "operations";

fn qualify(kind: ResourceType, name: &str) -> String {
    let name = name.trim_matches('/');
    if ResourceType::of(name).is_some() {
        name.to_string()
    } else {
        ResourceName::new(kind, name).as_str().to_string()
    }
}

/// `models/{model}`.
///
/// ```
/// use gemini_sdk::transport::endpoints;
///
/// assert_eq!(endpoints::model("gemini-2.5-flash"), "models/gemini-2.5-flash");
/// assert_eq!(endpoints::model("models/gemini-2.5-flash"), "models/gemini-2.5-flash");
/// ```
pub fn model(name: &str) -> String {
    qualify(ResourceType::Models, name)
}

/// `models/{model}:generateContent`.
pub fn generate_content(model_name: &str) -> String {
    format!("{}:generateContent", model(model_name))
}

/// `models/{model}:streamGenerateContent`.
pub fn stream_generate_content(model_name: &str) -> String {
    format!("{}:streamGenerateContent", model(model_name))
}

/// `models/{model}:countTokens`.
pub fn count_tokens(model_name: &str) -> String {
    format!("{}:countTokens", model(model_name))
}

/// `models/{model}:embedContent`.
pub fn embed_content(model_name: &str) -> String {
    format!("{}:embedContent", model(model_name))
}

/// `models/{model}:batchEmbedContents`.
pub fn batch_embed_contents(model_name: &str) -> String {
    format!("{}:batchEmbedContents", model(model_name))
}

/// `models/{model}:predict`.
pub fn predict(model_name: &str) -> String {
    format!("{}:predict", model(model_name))
}

/// `models/{model}:predictLongRunning`.
pub fn predict_long_running(model_name: &str) -> String {
    format!("{}:predictLongRunning", model(model_name))
}

/// `models/{model}:batchGenerateContent`.
pub fn batch_generate_content(model_name: &str) -> String {
    format!("{}:batchGenerateContent", model(model_name))
}

/// `files/{file}`.
pub fn file(name: &str) -> String {
    qualify(ResourceType::Files, name)
}

/// `cachedContents/{id}`.
pub fn cached_content(name: &str) -> String {
    qualify(ResourceType::CachedContents, name)
}

/// `batches/{id}`; `operations/{id}` names pass through.
pub fn batch(name: &str) -> String {
    qualify(ResourceType::Batches, name)
}

/// `batches/{id}:cancel`.
pub fn cancel_batch(name: &str) -> String {
    format!("{}:cancel", batch(name))
}

/// `batches/{id}:updateEmbedContentBatch`.
pub fn update_embed_content_batch(name: &str) -> String {
    format!("{}:updateEmbedContentBatch", batch(name))
}

/// `batches/{id}:updateGenerateContentBatch`.
pub fn update_generate_content_batch(name: &str) -> String {
    format!("{}:updateGenerateContentBatch", batch(name))
}

/// `operations/{id}`.
pub fn operation(name: &str) -> String {
    qualify(ResourceType::Operations, name)
}
