//! Top-level error type.

use std::time::Duration;

use thiserror::Error;

use super::categories::*;

/// Result type alias for SDK operations.
pub type GeminiResult<T> = Result<T, GeminiError>;

/// Top-level error type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeminiError {
    /// See [`ConfigurationError`].
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// See [`AuthenticationError`].
    #[error("Authentication error: {0}")]
    Authentication(#[from] AuthenticationError),

    /// See [`RequestError`].
    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    /// See [`RateLimitError`].
    #[error("Rate limit error: {0}")]
    RateLimit(#[from] RateLimitError),

    /// See [`NetworkError`].
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    /// See [`ServerError`].
    #[error("Server error: {0}")]
    Server(#[from] ServerError),

    /// See [`ResponseError`].
    #[error("Response error: {0}")]
    Response(#[from] ResponseError),

    /// See [`ContentError`].
    #[error("Content error: {0}")]
    Content(#[from] ContentError),

    /// See [`ResourceError`].
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// See [`StorageError`].
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// See [`ChatError`].
    #[error("Chat error: {0}")]
    Chat(#[from] ChatError),
}

impl GeminiError {
    /// Returns true if repeating the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GeminiError::RateLimit(_)
                | GeminiError::Network(
                    NetworkError::Timeout { .. } | NetworkError::ConnectionFailed { .. }
                )
                | GeminiError::Server(
                    ServerError::ServiceUnavailable { .. } | ServerError::ModelOverloaded { .. }
                )
        )
    }

    /// Returns the server's retry hint, if one was sent.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            GeminiError::RateLimit(e) => e.retry_after(),
            GeminiError::Server(ServerError::ServiceUnavailable { retry_after }) => *retry_after,
            _ => None,
        }
    }

    /// Best-effort HTTP status corresponding to this error.
    ///
    /// Local failures (configuration, network, decoding) report `None`.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            GeminiError::Authentication(AuthenticationError::QuotaExceeded) => Some(403),
            GeminiError::Authentication(_) => Some(401),
            GeminiError::Request(RequestError::PayloadTooLarge { .. }) => Some(413),
            GeminiError::Request(RequestError::UnsupportedMediaType { .. }) => Some(415),
            GeminiError::Request(_) => Some(400),
            GeminiError::RateLimit(_) => Some(429),
            GeminiError::Server(ServerError::InternalError { .. }) => Some(500),
            GeminiError::Server(_) => Some(503),
            GeminiError::Resource(
                ResourceError::FileNotFound { .. }
                | ResourceError::CachedContentNotFound { .. }
                | ResourceError::ModelNotFound { .. }
                | ResourceError::BatchNotFound { .. },
            ) => Some(404),
            GeminiError::Storage(StorageError::Remote { status, .. }) => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GeminiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GeminiError::Network(NetworkError::Timeout {
                duration: Duration::ZERO,
            })
        } else {
            GeminiError::Network(NetworkError::ConnectionFailed {
                message: err.to_string(),
            })
        }
    }
}

impl From<serde_json::Error> for GeminiError {
    fn from(err: serde_json::Error) -> Self {
        GeminiError::Response(ResponseError::DeserializationError {
            message: err.to_string(),
        })
    }
}

impl From<url::ParseError> for GeminiError {
    fn from(err: url::ParseError) -> Self {
        GeminiError::Configuration(ConfigurationError::InvalidBaseUrl {
            url: err.to_string(),
        })
    }
}

impl From<std::io::Error> for GeminiError {
    fn from(err: std::io::Error) -> Self {
        GeminiError::Storage(StorageError::Io {
            message: err.to_string(),
        })
    }
}

/// Outcome of probing the API with the configured key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiValidationResult {
    /// The key was accepted.
    pub is_valid: bool,
    /// Short verdict.
    pub message: String,
    /// Detail from the server or transport, empty when valid.
    pub reason: String,
    /// HTTP status of the probe, 0 when no response arrived.
    pub status_code: u16,
}

impl ApiValidationResult {
    /// A successful probe.
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            message: "API key is valid".to_string(),
            reason: String::new(),
            status_code: 200,
        }
    }

    /// Builds the verdict for a failed probe.
    pub fn from_error(error: &GeminiError) -> Self {
        let message = match error {
            GeminiError::Authentication(_) => "API key is invalid",
            GeminiError::Network(_) => "Could not reach the API",
            _ => "API key could not be verified",
        };
        Self {
            is_valid: false,
            message: message.to_string(),
            reason: error.to_string(),
            status_code: error.status_code().unwrap_or(0),
        }
    }
}
