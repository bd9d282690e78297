//! Files API types.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GeminiError, GeminiResult};
use crate::support::{Base64String, Duration, ResourceName, Timestamp};

/// A file uploaded to the Files API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct File {
    /// `files/{id}`.
    pub name: ResourceName,
    /// Human-readable name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// MIME type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Size in bytes.
    #[serde(
        default,
        with = "super::int64::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub size_bytes: Option<i64>,
    /// Creation time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_time: Option<Timestamp>,
    /// Last update time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_time: Option<Timestamp>,
    /// Deletion time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<Timestamp>,
    /// SHA-256 of the content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256_hash: Option<Base64String>,
    /// URI for referencing the file in prompts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// URI for downloading generated files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_uri: Option<String>,
    /// Processing state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<FileState>,
    /// Origin.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<FileSource>,
    /// Processing error, when `state` is `FAILED`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Status>,
    /// Video details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_metadata: Option<VideoFileMetadata>,
}

impl File {
    /// Parses a file object, unwrapping a `{"file": {...}}` envelope if present.
    pub fn from_value(value: Value) -> GeminiResult<Self> {
        let inner = match value {
            Value::Object(mut map) if map.len() == 1 && map.contains_key("file") => {
                map.remove("file").unwrap_or(Value::Null)
            }
            other => other,
        };
        serde_json::from_value(inner).map_err(GeminiError::from)
    }

    /// True once the file can be referenced in prompts.
    pub fn is_active(&self) -> bool {
        self.state == Some(FileState::Active)
    }
}

/// Processing state of a file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileState {
    /// Unset.
    StateUnspecified,
    /// Being processed.
    Processing,
    /// Ready.
    Active,
    /// Processing failed.
    Failed,
}

/// Origin of a file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileSource {
    /// Unset.
    SourceUnspecified,
    /// Uploaded by the user.
    Uploaded,
    /// Generated by the model.
    Generated,
}

/// `google.rpc.Status`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    /// gRPC code.
    #[serde(default)]
    pub code: i32,
    /// Message.
    #[serde(default)]
    pub message: String,
    /// Typed details.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<Value>,
}

/// Video-specific file metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct VideoFileMetadata {
    /// Video length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_duration: Option<Duration>,
}

/// Bytes to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFileRequest {
    /// Human-readable name.
    pub display_name: Option<String>,
    /// Content.
    pub file_data: Bytes,
    /// MIME type.
    pub mime_type: String,
}

/// Response of a media upload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadFileResponse {
    /// The created file.
    pub file: File,
}

/// Paging for `files.list`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListFilesParams {
    /// Maximum files per page (max 100).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<i32>,
    /// Token from a previous page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
}

/// A page of files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListFilesResponse {
    /// Files.
    #[serde(default)]
    pub files: Vec<File>,
    /// Token for the next page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}
