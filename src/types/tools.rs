//! Tools the model may use and how it may use them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A tool offered to the model. Built-in tools are enabled by presence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    /// Client-side functions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub function_declarations: Vec<FunctionDeclaration>,
    /// Google Search grounding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_search: Option<GoogleSearch>,
    /// Legacy search retrieval for 1.5 models.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_search_retrieval: Option<GoogleSearchRetrieval>,
    /// Server-side Python execution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_execution: Option<CodeExecution>,
    /// Google Maps grounding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_maps: Option<GoogleMaps>,
    /// Fetching URLs mentioned in the prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_context: Option<UrlContext>,
}

impl Tool {
    /// Tool declaring client-side functions.
    pub fn functions(declarations: Vec<FunctionDeclaration>) -> Self {
        Self {
            function_declarations: declarations,
            ..Self::default()
        }
    }

    /// Google Search grounding.
    pub fn google_search() -> Self {
        Self {
            google_search: Some(GoogleSearch {}),
            ..Self::default()
        }
    }

    /// Code execution.
    pub fn code_execution() -> Self {
        Self {
            code_execution: Some(CodeExecution {}),
            ..Self::default()
        }
    }

    /// Google Maps grounding, optionally returning a widget token.
    pub fn google_maps(enable_widget: bool) -> Self {
        Self {
            google_maps: Some(GoogleMaps {
                enable_widget: enable_widget.then_some(true),
            }),
            ..Self::default()
        }
    }

    /// URL context.
    pub fn url_context() -> Self {
        Self {
            url_context: Some(UrlContext {}),
            ..Self::default()
        }
    }
}

/// Schema of a client-side function.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FunctionDeclaration {
    /// Function name, `[a-zA-Z0-9_-]{1,64}`.
    pub name: String,
    /// What the function does.
    #[serde(default)]
    pub description: String,
    /// Parameters object schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
}

/// Enables Google Search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct GoogleSearch {}

/// Enables code execution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CodeExecution {}

/// Enables URL context.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct UrlContext {}

/// Enables Google Maps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GoogleMaps {
    /// Return a context token for the Maps widget.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_widget: Option<bool>,
}

/// Legacy Google Search retrieval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GoogleSearchRetrieval {
    /// When to search.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic_retrieval_config: Option<DynamicRetrievalConfig>,
}

/// Threshold-based search triggering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DynamicRetrievalConfig {
    /// Mode.
    pub mode: DynamicRetrievalMode,
    /// Minimum predicted benefit to trigger a search.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic_threshold: Option<f32>,
}

/// Dynamic retrieval mode.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DynamicRetrievalMode {
    /// Always search.
    ModeUnspecified,
    /// Search only above the threshold.
    ModeDynamic,
}

/// Tool usage settings shared by all tools in the request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ToolConfig {
    /// Function calling behaviour.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_calling_config: Option<FunctionCallingConfig>,
    /// Location and language hints for retrieval tools.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrieval_config: Option<RetrievalConfig>,
}

/// Function calling behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FunctionCallingConfig {
    /// Mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<FunctionCallingMode>,
    /// Restricts `ANY`/`VALIDATED` to these functions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_function_names: Vec<String>,
}

/// Function calling mode.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FunctionCallingMode {
    /// Unset, behaves as `AUTO`.
    ModeUnspecified,
    /// Model decides.
    Auto,
    /// Model must call a function.
    Any,
    /// Function calling disabled.
    None,
    /// Model decides, calls are schema-validated.
    Validated,
}

/// Location and language hints for retrieval tools.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalConfig {
    /// User location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat_lng: Option<LatLng>,
    /// User language, BCP-47.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
}

/// WGS84 coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LatLng {
    /// Degrees, `-90.0..=90.0`.
    pub latitude: f64,
    /// Degrees, `-180.0..=180.0`.
    pub longitude: f64,
}
