//! Models API types.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::support::GenerationMethod;

/// Description of a model as returned by `models.get` / `models.list`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    /// `models/{id}`.
    pub name: String,
    /// Base model id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_model_id: Option<String>,
    /// Version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Context window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_token_limit: Option<i32>,
    /// Output cap.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_token_limit: Option<i32>,
    /// Supported API methods.
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
    /// Supports thinking.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking: Option<bool>,
    /// Default temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Maximum temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_temperature: Option<f32>,
    /// Default top-p.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    /// Default top-k.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<i32>,
}

impl ModelInfo {
    /// Model id without the `models/` prefix.
    pub fn short_name(&self) -> &str {
        self.name.strip_prefix("models/").unwrap_or(&self.name)
    }

    /// Supported methods as a flag set.
    pub fn generation_methods(&self) -> GenerationMethod {
        GenerationMethod::from_names(&self.supported_generation_methods)
    }

    /// True if `method` is supported.
    pub fn supports(&self, method: GenerationMethod) -> bool {
        self.generation_methods().contains(method)
    }
}

impl fmt::Display for ModelInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let limit = |l: Option<i32>| l.map_or_else(|| "?".to_string(), |v| v.to_string());
        writeln!(
            f,
            "Model: {} ({})",
            self.display_name.as_deref().unwrap_or(self.short_name()),
            self.name
        )?;
        writeln!(f, "Desc: {}", self.description.as_deref().unwrap_or(""))?;
        writeln!(
            f,
            "Tokens: In={}, Out={}",
            limit(self.input_token_limit),
            limit(self.output_token_limit)
        )?;
        write!(f, "Methods: {}", self.generation_methods())
    }
}

/// Paging for `models.list`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListModelsParams {
    /// Maximum models per page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<i32>,
    /// Token from a previous page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
}

/// A page of models.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListModelsResponse {
    /// Models.
    #[serde(default)]
    pub models: Vec<ModelInfo>,
    /// Token for the next page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// Body of `models/{model}:predict` and `:predictLongRunning`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PredictRequest {
    /// Model-specific inputs.
    pub instances: Vec<Value>,
    /// Model-specific parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
}

/// Response of `:predict`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PredictResponse {
    /// Model-specific outputs.
    #[serde(default)]
    pub predictions: Vec<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flash() -> ModelInfo {
        serde_json::from_value(json!({
            "name": "models/gemini-2.5-flash",
            "displayName": "Gemini 2.5 Flash",
            "description": "Fast",
            "inputTokenLimit": 1048576,
            "outputTokenLimit": 65536,
            "supportedGenerationMethods": ["generateContent", "countTokens", "createCachedContent"],
            "thinking": true
        }))
        .unwrap()
    }

    #[test]
    fn test_supports() {
        let model = flash();
        assert!(model.supports(GenerationMethod::GENERATE_CONTENT));
        assert!(!model.supports(GenerationMethod::EMBED_CONTENT));
        assert_eq!(model.short_name(), "gemini-2.5-flash");
    }

    #[test]
    fn test_display_summary() {
        assert_eq!(
            flash().to_string(),
            "Model: Gemini 2.5 Flash (models/gemini-2.5-flash)\n\
             Desc: Fast\n\
             Tokens: In=1048576, Out=65536\n\
             Methods: [countTokens, generateContent]"
        );
    }
}
