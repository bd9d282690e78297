//! Batch API and long-running operation types.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::files::Status;
use super::generation::{GenerateContentRequest, GenerateContentResponse};
use crate::error::{GeminiError, GeminiResult};
use crate::support::{FieldMask, ResourceName, Timestamp};

/// Lifecycle state of a batch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatchState {
    /// Unset.
    BatchStateUnspecified,
    /// Queued.
    BatchStatePending,
    /// Running.
    BatchStateRunning,
    /// Finished.
    BatchStateSucceeded,
    /// Failed.
    BatchStateFailed,
    /// Cancelled.
    BatchStateCancelled,
    /// Expired before completion.
    BatchStateExpired,
}

impl BatchState {
    /// True once the batch will not change state again.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            BatchState::BatchStateSucceeded
                | BatchState::BatchStateFailed
                | BatchState::BatchStateCancelled
                | BatchState::BatchStateExpired
        )
    }
}

/// Request counters of a batch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct BatchStats {
    /// All requests.
    #[serde(default, with = "super::int64")]
    pub request_count: i64,
    /// Completed successfully.
    #[serde(default, with = "super::int64")]
    pub successful_request_count: i64,
    /// Failed.
    #[serde(default, with = "super::int64")]
    pub failed_request_count: i64,
    /// Not yet processed.
    #[serde(default, with = "super::int64")]
    pub pending_request_count: i64,
}

/// Batch input: an uploaded JSONL file or inline requests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct InputConfig {
    /// `files/{id}` of a JSONL file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// Inline requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requests: Option<InlinedRequests>,
}

impl InputConfig {
    /// Input from inline requests.
    pub fn inline(requests: Vec<InlinedRequest>) -> Self {
        Self {
            file_name: None,
            requests: Some(InlinedRequests { requests }),
        }
    }

    /// Input from an uploaded file.
    pub fn file(file_name: impl Into<String>) -> Self {
        Self {
            file_name: Some(file_name.into()),
            requests: None,
        }
    }
}

/// Inline batch requests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct InlinedRequests {
    /// Requests.
    #[serde(default)]
    pub requests: Vec<InlinedRequest>,
}

/// One inline batch request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct InlinedRequest {
    /// The request.
    pub request: GenerateContentRequest,
    /// Caller metadata echoed in the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

/// Batch output: a results file or inline responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentBatchOutput {
    /// `files/{id}` of the results JSONL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responses_file: Option<String>,
    /// Inline responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inlined_responses: Option<InlinedResponses>,
}

/// Inline batch responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct InlinedResponses {
    /// Responses in request order.
    #[serde(default)]
    pub inlined_responses: Vec<InlinedResponse>,
}

/// One inline batch response; either `response` or `error` is set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct InlinedResponse {
    /// Metadata from the request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    /// Failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Status>,
    /// Success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<GenerateContentResponse>,
}

/// A `generateContent` batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentBatch {
    /// `batches/{id}`, output only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<ResourceName>,
    /// `models/{id}`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Human-readable name.
    #[serde(default)]
    pub display_name: String,
    /// Input.
    pub input_config: InputConfig,
    /// Output, once finished.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<GenerateContentBatchOutput>,
    /// Creation time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_time: Option<Timestamp>,
    /// Completion time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<Timestamp>,
    /// Last update time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_time: Option<Timestamp>,
    /// Counters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_stats: Option<BatchStats>,
    /// State.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<BatchState>,
    /// Scheduling priority; higher runs first.
    #[serde(
        default,
        with = "super::int64::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub priority: Option<i64>,
}

impl GenerateContentBatch {
    /// Batch over inline requests.
    pub fn inline(display_name: impl Into<String>, requests: Vec<GenerateContentRequest>) -> Self {
        let requests = requests
            .into_iter()
            .map(|request| InlinedRequest {
                request,
                metadata: None,
            })
            .collect();
        Self {
            display_name: display_name.into(),
            input_config: InputConfig::inline(requests),
            ..Self::default()
        }
    }
}

/// An `embedContent` batch; only the fields that can be updated are modelled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct EmbedContentBatch {
    /// `batches/{id}`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<ResourceName>,
    /// `models/{id}`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Human-readable name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// State.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<BatchState>,
    /// Counters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_stats: Option<BatchStats>,
    /// Scheduling priority.
    #[serde(
        default,
        with = "super::int64::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub priority: Option<i64>,
}

/// Body of `models/{model}:batchGenerateContent`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct BatchGenerateContentRequest {
    /// The batch.
    pub batch: GenerateContentBatch,
}

/// Query parameters of a batch `PATCH`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdateBatchParams {
    /// Fields to overwrite; empty means every field present in the body.
    pub update_mask: FieldMask,
}

impl UpdateBatchParams {
    /// Params touching the given fields.
    pub fn fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let update_mask = fields
            .into_iter()
            .fold(FieldMask::new(), |mask, field| mask.add(field.as_ref()));
        Self { update_mask }
    }
}

/// Long-running operation.
///
/// For batches, `metadata` holds the [`GenerateContentBatch`] and `response`
/// holds the finished batch once `done` is true.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// `batches/{id}` or `operations/{id}`.
    pub name: String,
    /// Progress metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    /// True once finished.
    #[serde(default)]
    pub done: bool,
    /// Failure, if finished unsuccessfully.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Status>,
    /// Result, if finished successfully.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
}

impl Operation {
    /// Decodes `metadata` as `T`; `@type` keys are ignored.
    pub fn metadata_as<T: DeserializeOwned>(&self) -> GeminiResult<Option<T>> {
        decode_optional(self.metadata.as_ref())
    }

    /// Decodes `response` as `T`.
    pub fn response_as<T: DeserializeOwned>(&self) -> GeminiResult<Option<T>> {
        decode_optional(self.response.as_ref())
    }

    /// The batch this operation tracks, from `response` when done, else `metadata`.
    pub fn batch(&self) -> GeminiResult<Option<GenerateContentBatch>> {
        match self.response_as::<GenerateContentBatch>()? {
            Some(batch) => Ok(Some(batch)),
            None => self.metadata_as(),
        }
    }
}

fn decode_optional<T: DeserializeOwned>(value: Option<&Value>) -> GeminiResult<Option<T>> {
    value
        .map(|v| T::deserialize(v).map_err(GeminiError::from))
        .transpose()
}

/// Paging and filtering for operation listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListOperationsParams {
    /// Filter expression.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    /// Maximum entries per page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<i32>,
    /// Token from a previous page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
}

/// A page of operations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListOperationsResponse {
    /// Operations.
    #[serde(default)]
    pub operations: Vec<Operation>,
    /// Token for the next page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_inline_batch_shape() {
        let batch = GenerateContentBatch::inline(
            "nightly",
            vec![GenerateContentRequest::from_text("one")],
        );
        let body = serde_json::to_value(BatchGenerateContentRequest { batch }).unwrap();
        assert_eq!(
            body,
            json!({"batch": {
                "displayName": "nightly",
                "inputConfig": {"requests": {"requests": [
                    {"request": {"contents": [{"role": "user", "parts": [{"text": "one"}]}]}}
                ]}}
            }})
        );
    }

    #[test]
    fn test_operation_batch_metadata() {
        let op: Operation = serde_json::from_value(json!({
            "name": "batches/123",
            "metadata": {
                "@type": "type.googleapis.com/google.ai.generativelanguage.v1main.GenerateContentBatch",
                "model": "models/gemini-2.5-flash",
                "displayName": "nightly",
                "inputConfig": {},
                "state": "BATCH_STATE_RUNNING",
                "batchStats": {"requestCount": "2", "pendingRequestCount": "2"}
            }
        }))
        .unwrap();
        assert!(!op.done);
        let batch = op.batch().unwrap().unwrap();
        assert_eq!(batch.state, Some(BatchState::BatchStateRunning));
        assert!(!batch.state.unwrap().is_terminal());
        assert_eq!(batch.batch_stats.unwrap().pending_request_count, 2);
    }
}
