//! Conversation content: roles, parts and the payloads a part can carry.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GeminiResult, ResourceError};
use crate::support::{mime_type_for_path, Base64String, Duration};

/// Author of a [`Content`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// End user.
    User,
    /// The model.
    Model,
    /// Function results sent back to the model.
    Function,
    /// System instruction author.
    System,
}

/// A message: a role and an ordered list of parts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    /// Author, omitted for system instructions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Message parts.
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// Empty content with the given role.
    pub fn new(role: Role) -> Self {
        Self {
            role: Some(role),
            parts: Vec::new(),
        }
    }

    /// Empty user content.
    pub fn user() -> Self {
        Self::new(Role::User)
    }

    /// Empty model content.
    pub fn model() -> Self {
        Self::new(Role::Model)
    }

    /// Empty function-result content.
    pub fn function() -> Self {
        Self::new(Role::Function)
    }

    /// User content holding a single text part.
    pub fn user_text(text: impl Into<String>) -> Self {
        Self::user().with_text(text)
    }

    /// Role-less content holding a single text part, as used for system instructions.
    pub fn system_text(text: impl Into<String>) -> Self {
        Self {
            role: None,
            parts: vec![Part::text(text)],
        }
    }

    /// Appends a part.
    #[must_use]
    pub fn with_part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    /// Appends a text part.
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_part(Part::text(text))
    }

    /// Appends inline media.
    #[must_use]
    pub fn with_inline_data(self, blob: Blob) -> Self {
        self.with_part(Part::new(PartData::InlineData(blob)))
    }

    /// Appends a reference to an uploaded file.
    #[must_use]
    pub fn with_file_uri(self, file_uri: impl Into<String>, mime_type: Option<String>) -> Self {
        self.with_part(Part::new(PartData::FileData(FileData {
            mime_type,
            file_uri: file_uri.into(),
        })))
    }

    /// Reads a local file and appends it as inline media.
    pub fn with_media_path(self, path: impl AsRef<Path>) -> GeminiResult<Self> {
        Ok(self.with_inline_data(Blob::from_path(path)?))
    }

    /// Appends a function call.
    #[must_use]
    pub fn with_function_call(self, call: FunctionCall) -> Self {
        self.with_part(Part::new(PartData::FunctionCall(call)))
    }

    /// Appends a function result.
    #[must_use]
    pub fn with_function_response(self, name: impl Into<String>, response: Value) -> Self {
        self.with_part(Part::new(PartData::FunctionResponse(FunctionResponse::new(
            name, response,
        ))))
    }

    /// Concatenation of all text parts, skipping thoughts.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter(|p| !p.is_thought())
            .filter_map(Part::as_text)
            .collect()
    }

    /// Function calls requested in this content.
    pub fn function_calls(&self) -> Vec<&FunctionCall> {
        self.parts
            .iter()
            .filter_map(|p| match &p.data {
                PartData::FunctionCall(call) => Some(call),
                _ => None,
            })
            .collect()
    }

    /// Inline blobs in order of appearance.
    pub fn inline_blobs(&self) -> Vec<&Blob> {
        self.parts
            .iter()
            .filter_map(|p| match &p.data {
                PartData::InlineData(blob) => Some(blob),
                _ => None,
            })
            .collect()
    }
}

/// One piece of a [`Content`]: a payload plus optional metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    /// The payload.
    #[serde(flatten)]
    pub data: PartData,
    /// Marks model reasoning rather than answer text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thought: Option<bool>,
    /// Opaque signature that must be echoed back with thoughts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thought_signature: Option<String>,
    /// Caller-defined metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_metadata: Option<Value>,
    /// Clip selection for video payloads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_metadata: Option<VideoMetadata>,
}

impl Part {
    /// Part with no metadata.
    pub fn new(data: PartData) -> Self {
        Self {
            data,
            thought: None,
            thought_signature: None,
            part_metadata: None,
            video_metadata: None,
        }
    }

    /// Text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(PartData::Text(text.into()))
    }

    /// Text payload, if this is a text part.
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            PartData::Text(text) => Some(text),
            _ => None,
        }
    }

    /// True for reasoning parts.
    pub fn is_thought(&self) -> bool {
        self.thought == Some(true)
    }
}

impl From<PartData> for Part {
    fn from(data: PartData) -> Self {
        Self::new(data)
    }
}

/// Payload of a [`Part`]; exactly one key appears on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum PartData {
    /// `text`
    Text(String),
    /// `inlineData`
    InlineData(Blob),
    /// `fileData`
    FileData(FileData),
    /// `functionCall`
    FunctionCall(FunctionCall),
    /// `functionResponse`
    FunctionResponse(FunctionResponse),
    /// `executableCode`
    ExecutableCode(ExecutableCode),
    /// `codeExecutionResult`
    CodeExecutionResult(CodeExecutionResult),
}

/// Inline bytes with their MIME type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    /// MIME type, e.g. `image/png`.
    pub mime_type: String,
    /// Base64 payload.
    pub data: Base64String,
}

impl Blob {
    /// Encodes `bytes`.
    pub fn new(mime_type: impl Into<String>, bytes: impl AsRef<[u8]>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: Base64String::encode(bytes),
        }
    }

    /// Reads a local file, guessing its MIME type from the extension.
    pub fn from_path(path: impl AsRef<Path>) -> GeminiResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ResourceError::FileNotFound {
                file_name: path.display().to_string(),
            }
            .into());
        }
        let bytes = std::fs::read(path)?;
        Ok(Self::new(mime_type_for_path(path), bytes))
    }

    /// Decoded bytes.
    pub fn bytes(&self) -> GeminiResult<Vec<u8>> {
        self.data.decode()
    }
}

/// Reference to an uploaded file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileData {
    /// MIME type of the file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// URI returned by the Files API.
    pub file_uri: String,
}

/// Function invocation requested by the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FunctionCall {
    /// Call id to echo in the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Declared function name.
    pub name: String,
    /// Arguments object.
    #[serde(default)]
    pub args: Value,
}

/// Result of a function call sent back to the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponse {
    /// Id of the call being answered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Function name.
    pub name: String,
    /// Result object.
    pub response: Value,
    /// Media produced by the function.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parts: Vec<FunctionResponsePart>,
    /// More responses for this call will follow.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub will_continue: Option<bool>,
    /// How a non-blocking response is delivered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduling: Option<Scheduling>,
}

impl FunctionResponse {
    /// Response with only a name and a result object.
    pub fn new(name: impl Into<String>, response: Value) -> Self {
        Self {
            id: None,
            name: name.into(),
            response,
            parts: Vec::new(),
            will_continue: None,
            scheduling: None,
        }
    }
}

/// Media attached to a [`FunctionResponse`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponsePart {
    /// Inline payload.
    pub inline_data: FunctionResponseBlob,
}

/// Inline payload of a [`FunctionResponsePart`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponseBlob {
    /// MIME type.
    pub mime_type: String,
    /// Base64 payload.
    pub data: Base64String,
}

/// Delivery of a non-blocking function response.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Scheduling {
    /// Unset.
    SchedulingUnspecified,
    /// Add to context without triggering generation.
    Silent,
    /// Generate once the model is idle.
    WhenIdle,
    /// Interrupt the current generation.
    Interrupt,
}

/// Code produced by the code-execution tool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExecutableCode {
    /// Programming language.
    pub language: Language,
    /// Source text.
    pub code: String,
}

/// Language of [`ExecutableCode`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Language {
    /// Unset.
    LanguageUnspecified,
    /// Python 3.
    Python,
}

/// Result of running [`ExecutableCode`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CodeExecutionResult {
    /// How execution ended.
    pub outcome: Outcome,
    /// stdout, or the error text on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

/// Outcome of code execution.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    /// Unset.
    OutcomeUnspecified,
    /// Completed successfully.
    OutcomeOk,
    /// Completed with an error.
    OutcomeFailed,
    /// Ran too long and was cancelled.
    OutcomeDeadlineExceeded,
}

/// Clip selection for a video part.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct VideoMetadata {
    /// Start of the clip.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_offset: Option<Duration>,
    /// End of the clip.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_offset: Option<Duration>,
    /// Sampling rate in frames per second.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fps: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_part_wire_shape() {
        let content = Content::user_text("hi").with_inline_data(Blob::new("image/png", b"x"));
        assert_eq!(
            serde_json::to_value(&content).unwrap(),
            json!({
                "role": "user",
                "parts": [
                    {"text": "hi"},
                    {"inlineData": {"mimeType": "image/png", "data": "eA=="}}
                ]
            })
        );
    }

    #[test]
    fn test_part_metadata_is_flattened_alongside_payload() {
        let part: Part = serde_json::from_value(json!({
            "text": "thinking...",
            "thought": true,
            "thoughtSignature": "sig"
        }))
        .unwrap();
        assert!(part.is_thought());
        assert_eq!(part.as_text(), Some("thinking..."));
        assert_eq!(part.thought_signature.as_deref(), Some("sig"));
    }

    #[test]
    fn test_text_skips_thoughts_and_non_text() {
        let mut thought = Part::text("hmm ");
        thought.thought = Some(true);
        let content = Content::model()
            .with_part(thought)
            .with_text("Hello, ")
            .with_function_call(FunctionCall {
                id: None,
                name: "f".into(),
                args: json!({}),
            })
            .with_text("world");
        assert_eq!(content.text(), "Hello, world");
        assert_eq!(content.function_calls().len(), 1);
    }

    #[test]
    fn test_function_call_parses_without_args() {
        let part: Part = serde_json::from_value(json!({"functionCall": {"name": "now"}})).unwrap();
        match part.data {
            PartData::FunctionCall(call) => {
                assert_eq!(call.name, "now");
                assert_eq!(call.args, Value::Null);
            }
            other => panic!("unexpected part {other:?}"),
        }
    }

    #[test]
    fn test_code_execution_parts() {
        let content: Content = serde_json::from_value(json!({
            "role": "model",
            "parts": [
                {"executableCode": {"language": "PYTHON", "code": "print(1)"}},
                {"codeExecutionResult": {"outcome": "OUTCOME_OK", "output": "1\n"}}
            ]
        }))
        .unwrap();
        assert!(matches!(
            &content.parts[1].data,
            PartData::CodeExecutionResult(CodeExecutionResult { outcome: Outcome::OutcomeOk, .. })
        ));
    }

    #[test]
    fn test_blob_from_missing_path() {
        let err = Blob::from_path("/definitely/not/here.png").unwrap_err();
        assert_eq!(err.to_string(), "File not found: /definitely/not/here.png");
    }
}
