//! `countTokens` types.

use serde::{Deserialize, Serialize};

use super::content::Content;
use super::generation::{GenerateContentRequest, ModalityTokenCount};

/// Body of `models/{model}:countTokens`. Set one of the two fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CountTokensRequest {
    /// Bare contents.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contents: Vec<Content>,
    /// A full request, counting tools and system instruction too.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generate_content_request: Option<Box<GenerateContentRequest>>,
}

impl CountTokensRequest {
    /// Counts a single user text.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            contents: vec![Content::user_text(text)],
            generate_content_request: None,
        }
    }
}

/// Response of `:countTokens`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CountTokensResponse {
    /// Prompt tokens.
    #[serde(default)]
    pub total_tokens: i32,
    /// Tokens in the referenced cache.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached_content_token_count: Option<i32>,
    /// Prompt tokens per modality.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prompt_tokens_details: Vec<ModalityTokenCount>,
    /// Cached tokens per modality.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cache_tokens_details: Vec<ModalityTokenCount>,
}
