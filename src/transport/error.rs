//! Transport-level failures.

use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;

use crate::error::{GeminiError, NetworkError, ResponseError};

use super::http::HttpResponse;
use super::response::ResponseParser;

/// Failure below the API layer.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// Could not connect or the connection dropped.
    #[error("Connection error: {0}")]
    Connection(String),
    /// The request timed out.
    #[error("Timeout")]
    Timeout,
    /// The request could not be built or the body could not be read.
    #[error("Request error: {0}")]
    Request(String),
    /// The server answered a streaming call with a non-2xx status.
    #[error("HTTP {status}")]
    Status {
        /// Status code.
        status: u16,
        /// Response headers.
        headers: HashMap<String, String>,
        /// Response body.
        body: Bytes,
    },
}

impl From<TransportError> for GeminiError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Connection(message) => {
                NetworkError::ConnectionFailed { message }.into()
            }
            TransportError::Timeout => NetworkError::Timeout {
                duration: Duration::ZERO,
            }
            .into(),
            TransportError::Request(message) => ResponseError::StreamInterrupted { message }.into(),
            TransportError::Status {
                status,
                headers,
                body,
            } => ResponseParser::parse_error_response(HttpResponse {
                status,
                headers,
                body,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RateLimitError;

    #[test]
    fn test_status_maps_through_parser() {
        let mut headers = HashMap::new();
        headers.insert("Retry-After".to_string(), "7".to_string());
        let err: GeminiError = TransportError::Status {
            status: 429,
            headers,
            body: Bytes::from_static(br#"{"error":{"code":429,"message":"slow down"}}"#),
        }
        .into();

        assert_eq!(
            err,
            GeminiError::RateLimit(RateLimitError::TooManyRequests {
                retry_after: Some(Duration::from_secs(7))
            })
        );
    }

    #[test]
    fn test_connection_is_retryable() {
        let err: GeminiError = TransportError::Connection("reset".into()).into();
        assert!(err.is_retryable());
    }
}
