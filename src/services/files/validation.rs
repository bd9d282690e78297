use crate::error::{GeminiResult, ValidationDetail};
use crate::services::context::validation_failure;
use crate::types::UploadFileRequest;

/// Largest accepted upload (2 GiB).
pub const MAX_FILE_SIZE: usize = 2 * 1024 * 1024 * 1024;

const MAX_DISPLAY_NAME_LENGTH: usize = 512;

/// Checks an upload before any bytes are sent.
pub fn validate_upload_request(request: &UploadFileRequest) -> GeminiResult<()> {
    let mut details = Vec::new();

    if request.mime_type.trim().is_empty() {
        details.push(ValidationDetail::new("mimeType", "MIME type must not be empty"));
    } else if request.mime_type.parse::<mime::Mime>().is_err() {
        details.push(ValidationDetail::new(
            "mimeType",
            format!("'{}' is not a valid MIME type", request.mime_type),
        ));
    }

    if request.file_data.is_empty() {
        details.push(ValidationDetail::new("fileData", "File data must not be empty"));
    } else if request.file_data.len() > MAX_FILE_SIZE {
        details.push(ValidationDetail::new(
            "fileData",
            format!(
                "File size {} bytes exceeds maximum of {MAX_FILE_SIZE} bytes",
                request.file_data.len()
            ),
        ));
    }

    if let Some(display_name) = &request.display_name {
        if display_name.trim().is_empty() {
            details.push(ValidationDetail::new(
                "displayName",
                "Display name must not be empty if provided",
            ));
        } else if display_name.chars().count() > MAX_DISPLAY_NAME_LENGTH {
            details.push(ValidationDetail::new(
                "displayName",
                format!("Display name exceeds {MAX_DISPLAY_NAME_LENGTH} characters"),
            ));
        }
    }

    validation_failure("Invalid upload file request", details)
}

/// File names are `id` or `files/id`.
pub fn validate_file_name(name: &str) -> GeminiResult<()> {
    let id = name.strip_prefix("files/").unwrap_or(name);
    let mut details = Vec::new();
    if id.trim().is_empty() {
        details.push(ValidationDetail::new("name", "File name must not be empty"));
    } else if id.contains('/') {
        details.push(ValidationDetail::new(
            "name",
            "File name must be a bare id or start with 'files/'",
        ));
    }
    validation_failure("Invalid file name", details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GeminiError, RequestError};
    use bytes::Bytes;

    fn fields(result: GeminiResult<()>) -> Vec<String> {
        match result {
            Err(GeminiError::Request(RequestError::ValidationError { details, .. })) => {
                details.into_iter().map(|d| d.field).collect()
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_upload() {
        let request = UploadFileRequest {
            display_name: Some("notes.txt".to_string()),
            file_data: Bytes::from_static(b"hello"),
            mime_type: "text/plain".to_string(),
        };
        assert!(validate_upload_request(&request).is_ok());
    }

    #[test]
    fn test_invalid_upload_collects_every_problem() {
        let request = UploadFileRequest {
            display_name: Some("  ".to_string()),
            file_data: Bytes::new(),
            mime_type: String::new(),
        };
        assert_eq!(
            fields(validate_upload_request(&request)),
            vec!["mimeType", "fileData", "displayName"]
        );
    }

    #[test]
    fn test_file_names() {
        assert!(validate_file_name("files/abc-123").is_ok());
        assert!(validate_file_name("abc-123").is_ok());
        assert_eq!(fields(validate_file_name("files/")), vec!["name"]);
        assert_eq!(fields(validate_file_name("cachedContents/x/y")), vec!["name"]);
    }
}
