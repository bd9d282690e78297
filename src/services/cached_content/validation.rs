use crate::error::{GeminiResult, ValidationDetail};
use crate::services::context::validation_failure;
use crate::support::Duration;
use crate::types::{CreateCachedContentRequest, UpdateCachedContentRequest};

/// Model is required; `ttl` and `expireTime` are mutually exclusive.
pub fn validate_create_request(request: &CreateCachedContentRequest) -> GeminiResult<()> {
    let mut details = Vec::new();

    let model = request.model.strip_prefix("models/").unwrap_or(&request.model);
    if model.trim().is_empty() {
        details.push(ValidationDetail::new("model", "Model must not be empty"));
    }
    if request.contents.is_empty() && request.system_instruction.is_none() {
        details.push(ValidationDetail::new(
            "contents",
            "Either contents or systemInstruction must be provided",
        ));
    }
    check_expiry(request.ttl.as_ref(), request.expire_time.is_some(), &mut details);

    validation_failure("Invalid create cached content request", details)
}

/// Exactly one of `ttl` and `expireTime`.
pub fn validate_update_request(request: &UpdateCachedContentRequest) -> GeminiResult<()> {
    let mut details = Vec::new();
    if request.ttl.is_none() && request.expire_time.is_none() {
        details.push(ValidationDetail::new(
            "ttl",
            "Either ttl or expireTime must be provided",
        ));
    }
    check_expiry(request.ttl.as_ref(), request.expire_time.is_some(), &mut details);
    validation_failure("Invalid update cached content request", details)
}

fn check_expiry(ttl: Option<&Duration>, has_expire_time: bool, details: &mut Vec<ValidationDetail>) {
    if ttl.is_some() && has_expire_time {
        details.push(ValidationDetail::new(
            "ttl",
            "Only one of ttl or expireTime may be provided",
        ));
    }
    if let Some(ttl) = ttl {
        if ttl.as_nanos() <= 0 {
            details.push(ValidationDetail::new("ttl", "TTL must be positive"));
        }
    }
}

/// Names are `id` or `cachedContents/id`.
pub fn validate_cached_content_name(name: &str) -> GeminiResult<()> {
    let id = name.strip_prefix("cachedContents/").unwrap_or(name);
    let mut details = Vec::new();
    if id.trim().is_empty() {
        details.push(ValidationDetail::new("name", "Cached content name must not be empty"));
    } else if id.contains('/') {
        details.push(ValidationDetail::new(
            "name",
            "Cached content name must be a bare id or start with 'cachedContents/'",
        ));
    }
    validation_failure("Invalid cached content name", details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GeminiError, RequestError};
    use crate::support::Timestamp;
    use crate::types::Content;

    fn fields(result: GeminiResult<()>) -> Vec<String> {
        match result {
            Err(GeminiError::Request(RequestError::ValidationError { details, .. })) => {
                details.into_iter().map(|d| d.field).collect()
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    fn create() -> CreateCachedContentRequest {
        CreateCachedContentRequest {
            model: "models/gemini-2.5-flash".to_string(),
            contents: vec![Content::user_text("a long document")],
            ttl: Some(Duration::from_secs(300)),
            ..CreateCachedContentRequest::default()
        }
    }

    #[test]
    fn test_create_valid() {
        assert!(validate_create_request(&create()).is_ok());
    }

    #[test]
    fn test_create_rejects_conflicting_expiry() {
        let mut request = create();
        request.expire_time = Some(Timestamp::now());
        assert_eq!(fields(validate_create_request(&request)), vec!["ttl"]);
    }

    #[test]
    fn test_create_requires_model_and_content() {
        let request = CreateCachedContentRequest {
            model: "models/".to_string(),
            ..CreateCachedContentRequest::default()
        };
        assert_eq!(fields(validate_create_request(&request)), vec!["model", "contents"]);
    }

    #[test]
    fn test_update_needs_one_field() {
        assert_eq!(
            fields(validate_update_request(&UpdateCachedContentRequest::default())),
            vec!["ttl"]
        );
        let request = UpdateCachedContentRequest {
            ttl: Some(Duration::from_secs(60)),
            expire_time: None,
        };
        assert!(validate_update_request(&request).is_ok());
    }

    #[test]
    fn test_names() {
        assert!(validate_cached_content_name("cachedContents/abc").is_ok());
        assert!(validate_cached_content_name("abc").is_ok());
        assert_eq!(fields(validate_cached_content_name("")), vec!["name"]);
    }
}
