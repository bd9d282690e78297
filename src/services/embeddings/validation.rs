use crate::error::{GeminiResult, ValidationDetail};
use crate::services::context::validation_failure;
use crate::types::{EmbedContentRequest, PartData, TaskType};

const MIN_OUTPUT_DIMENSIONALITY: i32 = 1;
const MAX_OUTPUT_DIMENSIONALITY: i32 = 3072;

/// Most requests accepted by one `batchEmbedContents` call.
pub const MAX_BATCH_SIZE: usize = 100;

/// Embeddings take non-empty text parts only.
pub fn validate_embed_request(request: &EmbedContentRequest) -> GeminiResult<()> {
    let mut details = Vec::new();
    collect(request, "", &mut details);
    validation_failure("Invalid embed content request", details)
}

fn collect(request: &EmbedContentRequest, prefix: &str, details: &mut Vec<ValidationDetail>) {
    if request.content.parts.is_empty() {
        details.push(ValidationDetail::new(
            format!("{prefix}content.parts"),
            "Content must have at least one part",
        ));
    }
    for (i, part) in request.content.parts.iter().enumerate() {
        match &part.data {
            PartData::Text(text) if text.trim().is_empty() => details.push(ValidationDetail::new(
                format!("{prefix}content.parts[{i}].text"),
                "Text cannot be empty",
            )),
            PartData::Text(_) => {}
            _ => details.push(ValidationDetail::new(
                format!("{prefix}content.parts[{i}]"),
                "Only text parts can be embedded",
            )),
        }
    }
    if let Some(dim) = request.output_dimensionality {
        if !(MIN_OUTPUT_DIMENSIONALITY..=MAX_OUTPUT_DIMENSIONALITY).contains(&dim) {
            details.push(ValidationDetail::new(
                format!("{prefix}outputDimensionality"),
                format!(
                    "Output dimensionality must be between {MIN_OUTPUT_DIMENSIONALITY} and {MAX_OUTPUT_DIMENSIONALITY}"
                ),
            ));
        }
    }
    if request.title.is_some() && request.task_type != Some(TaskType::RetrievalDocument) {
        details.push(ValidationDetail::new(
            format!("{prefix}title"),
            "Title can only be provided for RETRIEVAL_DOCUMENT task type",
        ));
    }
}

/// Validates every entry of a batch plus its size.
pub(crate) fn validate_batch(requests: &[EmbedContentRequest]) -> GeminiResult<()> {
    validate_batch_size(requests.len())?;
    let mut details = Vec::new();
    for (i, request) in requests.iter().enumerate() {
        collect(request, &format!("requests[{i}]."), &mut details);
    }
    validation_failure("Invalid batch embed request", details)
}

/// 1 to [`MAX_BATCH_SIZE`] requests.
pub fn validate_batch_size(batch_size: usize) -> GeminiResult<()> {
    let mut details = Vec::new();
    if batch_size == 0 {
        details.push(ValidationDetail::new("requests", "Batch must contain at least one request"));
    } else if batch_size > MAX_BATCH_SIZE {
        details.push(ValidationDetail::new(
            "requests",
            format!("Batch size {batch_size} exceeds maximum of {MAX_BATCH_SIZE}"),
        ));
    }
    validation_failure("Invalid batch size", details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GeminiError, RequestError};
    use crate::types::{Blob, Content, Part};

    fn fields(result: GeminiResult<()>) -> Vec<String> {
        match result {
            Err(GeminiError::Request(RequestError::ValidationError { details, .. })) => {
                details.into_iter().map(|d| d.field).collect()
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_text_request_is_valid() {
        let request = EmbedContentRequest::from_text("hello")
            .with_task_type(TaskType::RetrievalDocument);
        assert!(validate_embed_request(&request).is_ok());
    }

    #[test]
    fn test_rejects_non_text_and_bad_options() {
        let mut request = EmbedContentRequest::from_text("");
        request.content = Content::user()
            .with_part(Part::text(""))
            .with_inline_data(Blob::new("image/png", b"x"));
        request.output_dimensionality = Some(0);
        request.title = Some("doc".to_string());

        assert_eq!(
            fields(validate_embed_request(&request)),
            vec![
                "content.parts[0].text",
                "content.parts[1]",
                "outputDimensionality",
                "title"
            ]
        );
    }

    #[test]
    fn test_batch_limits() {
        assert!(validate_batch_size(1).is_ok());
        assert!(validate_batch_size(MAX_BATCH_SIZE).is_ok());
        assert_eq!(fields(validate_batch_size(0)), vec!["requests"]);
        assert_eq!(fields(validate_batch_size(MAX_BATCH_SIZE + 1)), vec!["requests"]);
    }

    #[test]
    fn test_batch_entries_are_prefixed() {
        let requests = vec![
            EmbedContentRequest::from_text("ok"),
            EmbedContentRequest::from_text(" "),
        ];
        assert_eq!(fields(validate_batch(&requests)), vec!["requests[1].content.parts[0].text"]);
    }
}
