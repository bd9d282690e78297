//! Mapping of HTTP statuses and Google error envelopes onto [`GeminiError`].

use std::time::Duration;

use serde::Deserialize;

use super::categories::*;
use super::types::GeminiError;

/// Google API error envelope: `{"error": {...}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    /// Error payload.
    pub error: ApiErrorDetail,
}

/// Payload of the Google API error envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    /// HTTP status repeated in the body.
    #[serde(default)]
    pub code: i32,
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
    /// gRPC status name, e.g. `INVALID_ARGUMENT`.
    #[serde(default)]
    pub status: String,
    /// Typed detail objects.
    #[serde(default)]
    pub details: Vec<serde_json::Value>,
}

/// Extracts the human-readable message from an error body.
///
/// Falls back to the raw body text when it is not a Google error envelope.
pub fn extract_error_message(body: &[u8]) -> String {
    if let Ok(parsed) = serde_json::from_slice::<ApiErrorResponse>(body) {
        if !parsed.error.message.is_empty() {
            return parsed.error.message;
        }
    }
    String::from_utf8_lossy(body).into_owned()
}

/// Maps an HTTP status and its response body to the most specific error.
pub fn map_http_status_with_body(status: u16, body: &[u8]) -> GeminiError {
    let envelope = serde_json::from_slice::<ApiErrorResponse>(body)
        .ok()
        .map(|r| r.error);
    let message = extract_error_message(body);
    let lowered = message.to_lowercase();

    match status {
        400 => {
            let details = envelope
                .as_ref()
                .map(|e| parse_validation_details(&e.details))
                .unwrap_or_default();
            GeminiError::Request(RequestError::ValidationError { message, details })
        }
        401 => GeminiError::Authentication(AuthenticationError::InvalidApiKey),
        403 => {
            let denied = envelope
                .as_ref()
                .is_some_and(|e| e.status.eq_ignore_ascii_case("PERMISSION_DENIED"));
            if denied || lowered.contains("quota") {
                GeminiError::Authentication(AuthenticationError::QuotaExceeded)
            } else {
                GeminiError::Authentication(AuthenticationError::InvalidApiKey)
            }
        }
        404 => not_found(&lowered, extract_resource_name(&message)),
        413 => {
            let (size, max_size) = extract_size_info(&message);
            GeminiError::Request(RequestError::PayloadTooLarge { size, max_size })
        }
        415 => GeminiError::Request(RequestError::UnsupportedMediaType {
            mime_type: extract_mime_type(&message),
        }),
        // retry_after is filled in from headers by the response parser
        429 => GeminiError::RateLimit(RateLimitError::TooManyRequests { retry_after: None }),
        500 => GeminiError::Server(ServerError::InternalError { message }),
        503 if lowered.contains("overload") => GeminiError::Server(ServerError::ModelOverloaded {
            model: extract_resource_name(&message),
        }),
        503 => GeminiError::Server(ServerError::ServiceUnavailable { retry_after: None }),
        _ => GeminiError::Server(ServerError::InternalError {
            message: format!("HTTP {status}: {message}"),
        }),
    }
}

/// Maps a status with a plain message body.
pub fn map_http_status(status: u16, message: &str) -> GeminiError {
    map_http_status_with_body(status, message.as_bytes())
}

fn not_found(lowered: &str, name: String) -> GeminiError {
    if lowered.contains("cached") {
        GeminiError::Resource(ResourceError::CachedContentNotFound { name })
    } else if lowered.contains("batch") || lowered.contains("operation") {
        GeminiError::Resource(ResourceError::BatchNotFound { name })
    } else if lowered.contains("file") {
        GeminiError::Resource(ResourceError::FileNotFound { file_name: name })
    } else {
        GeminiError::Resource(ResourceError::ModelNotFound { model: name })
    }
}

/// Pulls a resource identifier out of a message: a `collection/id` token,
/// then the first single- or double-quoted span, else `unknown`.
fn extract_resource_name(message: &str) -> String {
    const PREFIXES: [&str; 5] = ["models/", "files/", "cachedContents/", "batches/", "operations/"];

    let token = message
        .split_whitespace()
        .find(|word| PREFIXES.iter().any(|p| word.trim_start_matches(['\'', '"']).starts_with(p)));
    if let Some(token) = token {
        return token
            .trim_matches(|c: char| !c.is_alphanumeric() && !matches!(c, '/' | '-' | '_' | '.'))
            .to_string();
    }

    for quote in ['\'', '"'] {
        if let Some(quoted) = message.split(quote).nth(1) {
            if message.matches(quote).count() >= 2 {
                return quoted.to_string();
            }
        }
    }

    "unknown".to_string()
}

/// First two integers in the message, read as (size, max size).
fn extract_size_info(message: &str) -> (usize, usize) {
    let mut numbers = message
        .split_whitespace()
        .filter_map(|word| word.trim_matches(|c: char| !c.is_ascii_digit()).parse().ok());
    let size = numbers.next().unwrap_or(0);
    let max_size = numbers.next().unwrap_or(0);
    (size, max_size)
}

fn extract_mime_type(message: &str) -> String {
    const TOP_LEVEL: [&str; 5] = ["image/", "video/", "audio/", "application/", "text/"];

    message
        .split_whitespace()
        .find(|word| TOP_LEVEL.iter().any(|t| word.starts_with(t)))
        .map_or_else(
            || "unknown".to_string(),
            |word| {
                word.trim_end_matches(|c: char| !c.is_alphanumeric())
                    .to_string()
            },
        )
}

/// Reads `{field|fieldPath, description|message}` objects out of `details`.
fn parse_validation_details(details: &[serde_json::Value]) -> Vec<ValidationDetail> {
    details
        .iter()
        .filter_map(|detail| {
            let obj = detail.as_object()?;
            let field = obj
                .get("field")
                .or_else(|| obj.get("fieldPath"))
                .and_then(|v| v.as_str())
                .unwrap_or("unknown");
            let description = obj
                .get("description")
                .or_else(|| obj.get("message"))
                .and_then(|v| v.as_str())
                .filter(|d| !d.is_empty())?;
            Some(ValidationDetail::new(field, description))
        })
        .collect()
}

/// Maps a gRPC status name from an error envelope.
pub fn map_api_error(status: &str, message: String) -> GeminiError {
    match status {
        "INVALID_ARGUMENT" | "FAILED_PRECONDITION" => {
            GeminiError::Request(RequestError::ValidationError {
                message,
                details: vec![],
            })
        }
        "OUT_OF_RANGE" => GeminiError::Request(RequestError::InvalidParameter {
            parameter: "unknown".to_string(),
            message,
        }),
        "UNIMPLEMENTED" => GeminiError::Request(RequestError::InvalidModel {
            model: extract_resource_name(&message),
        }),
        "UNAUTHENTICATED" => GeminiError::Authentication(AuthenticationError::InvalidApiKey),
        "PERMISSION_DENIED" => GeminiError::Authentication(AuthenticationError::QuotaExceeded),
        "NOT_FOUND" => {
            let name = extract_resource_name(&message);
            not_found(&message.to_lowercase(), name)
        }
        "RESOURCE_EXHAUSTED" => GeminiError::RateLimit(RateLimitError::QuotaExceeded {
            retry_after: Some(Duration::from_secs(60)),
        }),
        "UNAVAILABLE" => GeminiError::Server(ServerError::ServiceUnavailable {
            retry_after: Some(Duration::from_secs(30)),
        }),
        "DEADLINE_EXCEEDED" => GeminiError::Network(NetworkError::Timeout {
            duration: Duration::from_secs(30),
        }),
        "ABORTED" | "INTERNAL" => GeminiError::Server(ServerError::InternalError { message }),
        _ => GeminiError::Server(ServerError::InternalError {
            message: format!("{status}: {message}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_http_status_401() {
        let error = map_http_status(401, "API key not valid");
        assert!(matches!(
            error,
            GeminiError::Authentication(AuthenticationError::InvalidApiKey)
        ));
    }

    #[test]
    fn test_map_http_status_403_permission_denied() {
        let body = r#"{"error":{"code":403,"message":"Caller lacks access","status":"PERMISSION_DENIED"}}"#;
        let error = map_http_status_with_body(403, body.as_bytes());
        assert!(matches!(
            error,
            GeminiError::Authentication(AuthenticationError::QuotaExceeded)
        ));
    }

    #[test]
    fn test_map_http_status_503_variants() {
        assert!(matches!(
            map_http_status(503, "Service unavailable"),
            GeminiError::Server(ServerError::ServiceUnavailable { .. })
        ));
        assert!(matches!(
            map_http_status(503, "The model is overloaded"),
            GeminiError::Server(ServerError::ModelOverloaded { .. })
        ));
    }

    #[test]
    fn test_map_http_status_400_collects_details() {
        let body = r#"{"error":{"code":400,"message":"Invalid value","status":"INVALID_ARGUMENT",
            "details":[{"field":"generationConfig.temperature","description":"out of range"},{"note":"ignored"}]}}"#;
        let error = map_http_status_with_body(400, body.as_bytes());
        match error {
            GeminiError::Request(RequestError::ValidationError { message, details }) => {
                assert_eq!(message, "Invalid value");
                assert_eq!(details.len(), 1);
                assert_eq!(details[0].field, "generationConfig.temperature");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_map_http_status_404_resources() {
        let model = map_http_status_with_body(
            404,
            br#"{"error":{"message":"models/gemini-9 is not found for API version v1beta"}}"#,
        );
        assert_eq!(
            model,
            GeminiError::Resource(ResourceError::ModelNotFound {
                model: "models/gemini-9".into()
            })
        );

        let file = map_http_status(404, "File 'files/abc' does not exist");
        assert_eq!(
            file,
            GeminiError::Resource(ResourceError::FileNotFound {
                file_name: "files/abc".into()
            })
        );

        let cached = map_http_status(404, "Cached content not found");
        assert!(matches!(
            cached,
            GeminiError::Resource(ResourceError::CachedContentNotFound { .. })
        ));

        let batch = map_http_status(404, "Batch batches/123 not found");
        assert!(matches!(
            batch,
            GeminiError::Resource(ResourceError::BatchNotFound { .. })
        ));
    }

    #[test]
    fn test_map_http_status_413_and_415() {
        let error = map_http_status(413, "Payload size 1000000 exceeds maximum 500000");
        assert_eq!(
            error,
            GeminiError::Request(RequestError::PayloadTooLarge {
                size: 1_000_000,
                max_size: 500_000
            })
        );

        let error = map_http_status(415, "Unsupported media type: image/bmp.");
        assert_eq!(
            error,
            GeminiError::Request(RequestError::UnsupportedMediaType {
                mime_type: "image/bmp".into()
            })
        );
    }

    #[test]
    fn test_unmapped_status_keeps_code() {
        let error = map_http_status(418, "teapot");
        assert_eq!(
            error.to_string(),
            "Server error: Internal server error: HTTP 418: teapot"
        );
    }

    #[test]
    fn test_extract_resource_name() {
        assert_eq!(extract_resource_name("Model 'gemini-pro' not found"), "gemini-pro");
        assert_eq!(extract_resource_name("no identifiers here"), "unknown");
    }

    #[test]
    fn test_map_api_error() {
        assert!(matches!(
            map_api_error("RESOURCE_EXHAUSTED", "Quota exceeded".into()),
            GeminiError::RateLimit(RateLimitError::QuotaExceeded { .. })
        ));
        assert!(matches!(
            map_api_error("DEADLINE_EXCEEDED", "slow".into()),
            GeminiError::Network(NetworkError::Timeout { .. })
        ));
        assert!(matches!(
            map_api_error("SOMETHING_NEW", "?".into()),
            GeminiError::Server(ServerError::InternalError { .. })
        ));
    }
}
