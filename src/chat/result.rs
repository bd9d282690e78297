use std::path::Path;

use serde_json::Value;

use crate::error::{GeminiError, GeminiResult};
use crate::support::extension_for_mime_type;
use crate::types::{
    Blob, Content, FinishReason, FunctionCall, GenerateContentResponse, GroundingMetadata,
};

/// Flattened outcome of a generation call.
///
/// Failures are values rather than errors so a chat loop can inspect them;
/// use [`into_result`](Self::into_result) to get a `Result` back.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GenerationResult {
    /// The call produced content.
    pub success: bool,
    /// First candidate's content.
    pub content: Content,
    /// Reason for failure, empty on success.
    pub error_message: String,
    /// HTTP status, 0 when no response arrived.
    pub status_code: u16,
    /// Prompt tokens.
    pub input_tokens: i32,
    /// Generated tokens.
    pub output_tokens: i32,
    /// Billed tokens.
    pub total_tokens: i32,
    /// Why the first candidate stopped.
    pub finish_reason: Option<FinishReason>,
    /// Search grounding of the first candidate.
    pub grounding_metadata: Option<GroundingMetadata>,
    /// The full response, when there was one.
    pub raw: Option<GenerateContentResponse>,
}

impl GenerationResult {
    /// Successful result holding `content`.
    pub fn success(content: Content, status_code: u16) -> Self {
        Self {
            success: true,
            content,
            status_code,
            ..Self::default()
        }
    }

    /// Failed result.
    pub fn failure(error_message: impl Into<String>, status_code: u16) -> Self {
        Self {
            success: false,
            error_message: error_message.into(),
            status_code,
            ..Self::default()
        }
    }

    /// Reads the first candidate of a 200 response.
    pub fn from_response(response: GenerateContentResponse) -> Self {
        let Some(candidate) = response.candidates.first() else {
            let message = if response.prompt_feedback.is_some() {
                "Blocked by Safety Filter"
            } else {
                "No candidates returned"
            };
            return Self {
                raw: Some(response),
                ..Self::failure(message, 200)
            };
        };
        let Some(content) = candidate.content.clone() else {
            return Self {
                finish_reason: candidate.finish_reason,
                raw: Some(response),
                ..Self::failure("Candidate has no content", 200)
            };
        };

        let mut result = Self::success(content, 200);
        result.finish_reason = candidate.finish_reason;
        result.grounding_metadata = candidate.grounding_metadata.clone();
        if let Some(usage) = &response.usage_metadata {
            result.input_tokens = usage.prompt_token_count;
            result.output_tokens = usage.candidates_token_count.unwrap_or(0)
                + usage.thoughts_token_count.unwrap_or(0);
            result.total_tokens = if usage.total_token_count > 0 {
                usage.total_token_count
            } else {
                result.input_tokens + result.output_tokens
            };
        }
        result.raw = Some(response);
        result
    }

    /// Converts a service outcome; content-filter errors read as
    /// `Blocked by Safety Filter: ...`.
    pub fn from_outcome(outcome: GeminiResult<GenerateContentResponse>) -> Self {
        match outcome {
            Ok(response) => Self::from_response(response),
            Err(GeminiError::Content(err)) => {
                Self::failure(format!("Blocked by Safety Filter: {err}"), 200)
            }
            Err(err) => Self::failure(err.to_string(), err.status_code().unwrap_or(0)),
        }
    }

    /// `Ok(self)` on success, otherwise the message as a chat error.
    pub fn into_result(self) -> GeminiResult<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(crate::error::ChatError::InvalidResponse {
                message: self.error_message,
            }
            .into())
        }
    }

    /// Answer text, without thoughts.
    pub fn text(&self) -> String {
        self.content.text()
    }

    /// Function calls requested by the model.
    pub fn function_calls(&self) -> Vec<&FunctionCall> {
        self.content.function_calls()
    }

    /// Writes the `index`-th inline blob to `path`. Returns `false` when
    /// there is no such blob.
    pub fn save_file(&self, path: impl AsRef<Path>, index: usize) -> GeminiResult<bool> {
        match self.content.inline_blobs().get(index) {
            Some(blob) => {
                write_blob(blob, path.as_ref())?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Writes every inline blob to `{dir}/{prefix}_{i}{ext}`, creating `dir`.
    /// Returns how many files were written.
    pub fn save_all_files(&self, dir: impl AsRef<Path>, prefix: &str) -> GeminiResult<usize> {
        let dir = dir.as_ref();
        let blobs = self.content.inline_blobs();
        if blobs.is_empty() {
            return Ok(0);
        }
        std::fs::create_dir_all(dir)?;
        for (i, blob) in blobs.iter().enumerate() {
            let name = format!("{prefix}_{i}{}", extension_for_mime_type(&blob.mime_type));
            write_blob(blob, &dir.join(name))?;
        }
        Ok(blobs.len())
    }

    /// The text parsed as JSON, or the span from the first `{`/`[` to the
    /// last `}`/`]` when the model wrapped it in prose or fences.
    pub fn as_json(&self) -> Option<Value> {
        let text = self.text();
        if text.trim().is_empty() {
            return None;
        }
        if let Ok(value) = serde_json::from_str(&text) {
            return Some(value);
        }
        let start = text.find(['{', '['])?;
        let end = text.rfind(['}', ']'])?;
        if end <= start {
            return None;
        }
        serde_json::from_str(&text[start..=end]).ok()
    }
}

fn write_blob(blob: &Blob, path: &Path) -> GeminiResult<()> {
    std::fs::write(path, blob.bytes()?)?;
    Ok(())
}
