//! Turns raw responses into typed values or typed errors.

use std::collections::HashMap;
use std::time::Duration;

use serde::de::DeserializeOwned;

use super::http::HttpResponse;
use crate::error::{map_http_status_with_body, GeminiError, RateLimitError, ServerError};

/// Header names that carry a request id, checked in order.
const REQUEST_ID_HEADERS: [&str; 3] = ["x-request-id", "x-goog-request-id", "request-id"];

/// Parser for API responses.
pub struct ResponseParser;

impl ResponseParser {
    /// Deserializes a 2xx body, or maps the error status.
    ///
    /// An empty 2xx body is read as `{}`.
    ///
    /// ```
    /// use gemini_sdk::transport::{HttpResponse, ResponseParser};
    /// use std::collections::HashMap;
    ///
    /// let response = HttpResponse {
    ///     status: 200,
    ///     headers: HashMap::new(),
    ///     body: r#"{"totalTokens": 5}"#.into(),
    /// };
    /// let value: serde_json::Value = ResponseParser::parse_response(response).unwrap();
    /// assert_eq!(value["totalTokens"], 5);
    /// ```
    pub fn parse_response<T: DeserializeOwned>(response: HttpResponse) -> Result<T, GeminiError> {
        if !response.is_success() {
            return Err(Self::parse_error_response(response));
        }
        if response.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::from_str("{}")?);
        }
        Ok(serde_json::from_slice(&response.body)?)
    }

    /// Maps a non-2xx response, filling `retry_after` from the headers.
    pub fn parse_error_response(response: HttpResponse) -> GeminiError {
        let retry_after = Self::parse_retry_after(&response.headers);
        let mut error = map_http_status_with_body(response.status, &response.body);

        match &mut error {
            GeminiError::RateLimit(
                RateLimitError::TooManyRequests { retry_after: slot }
                | RateLimitError::QuotaExceeded { retry_after: slot },
            )
            | GeminiError::Server(ServerError::ServiceUnavailable { retry_after: slot }) => {
                *slot = retry_after;
            }
            _ => {}
        }

        tracing::debug!(
            status = response.status,
            request_id = Self::extract_request_id(&response.headers).as_deref().unwrap_or("-"),
            error = %error,
            "API call failed"
        );
        error
    }

    /// `Retry-After` in whole seconds, case-insensitive.
    pub fn parse_retry_after(headers: &HashMap<String, String>) -> Option<Duration> {
        headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("retry-after"))
            .and_then(|(_, v)| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
    }

    /// First request-id style header present.
    pub fn extract_request_id(headers: &HashMap<String, String>) -> Option<String> {
        REQUEST_ID_HEADERS.iter().find_map(|name| {
            headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.clone())
        })
    }
}
