//! Error categories.

use std::time::Duration;
use thiserror::Error;

/// Client configuration problems, detected before any request is sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// No API key was supplied and none was found in the environment.
    #[error("Missing API key")]
    MissingApiKey,

    /// A base URL could not be parsed.
    #[error("Invalid base URL: {url}")]
    InvalidBaseUrl {
        /// The rejected URL or parse message.
        url: String,
    },

    /// Any other invalid setting.
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        /// Human-readable reason.
        message: String,
    },
}

/// Credential errors reported by the API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationError {
    /// The key was rejected.
    #[error("Invalid API key")]
    InvalidApiKey,

    /// The key has expired.
    #[error("API key has expired")]
    ExpiredApiKey,

    /// The project behind the key is out of quota or lacks permission.
    #[error("Quota exceeded or permission denied for API key")]
    QuotaExceeded,
}

/// Problems with the request itself, either found locally or reported with a 4xx.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// One or more fields failed validation.
    #[error("Validation error: {message}")]
    ValidationError {
        /// Summary message.
        message: String,
        /// Per-field details.
        details: Vec<ValidationDetail>,
    },

    /// The model name is not usable for this call.
    #[error("Invalid model: {model}")]
    InvalidModel {
        /// Offending model name.
        model: String,
    },

    /// A single parameter is out of range or malformed.
    #[error("Invalid parameter: {parameter} - {message}")]
    InvalidParameter {
        /// Parameter name.
        parameter: String,
        /// Reason.
        message: String,
    },

    /// Request body exceeds what the endpoint accepts.
    #[error("Payload too large: {size} bytes (max: {max_size})")]
    PayloadTooLarge {
        /// Actual size in bytes.
        size: usize,
        /// Accepted maximum in bytes.
        max_size: usize,
    },

    /// MIME type not accepted by the endpoint.
    #[error("Unsupported media type: {mime_type}")]
    UnsupportedMediaType {
        /// Offending MIME type.
        mime_type: String,
    },
}

/// Field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDetail {
    /// Field path, e.g. `contents[0].parts`.
    pub field: String,
    /// What is wrong with it.
    pub description: String,
}

impl ValidationDetail {
    /// Creates a detail for `field`.
    pub fn new(field: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            description: description.into(),
        }
    }
}

/// Throttling errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RateLimitError {
    /// HTTP 429.
    #[error("Too many requests")]
    TooManyRequests {
        /// Server hint, if any.
        retry_after: Option<Duration>,
    },

    /// Token-per-minute limit reached.
    #[error("Token limit exceeded")]
    TokenLimitExceeded,

    /// `RESOURCE_EXHAUSTED`.
    #[error("Quota exceeded")]
    QuotaExceeded {
        /// Server hint, if any.
        retry_after: Option<Duration>,
    },
}

impl RateLimitError {
    /// Server-provided backoff hint.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            RateLimitError::TooManyRequests { retry_after }
            | RateLimitError::QuotaExceeded { retry_after } => *retry_after,
            RateLimitError::TokenLimitExceeded => None,
        }
    }
}

/// Transport-level failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// Could not connect or the connection dropped.
    #[error("Connection failed: {message}")]
    ConnectionFailed {
        /// Underlying error text.
        message: String,
    },

    /// No response within the configured timeout.
    #[error("Request timed out after {duration:?}")]
    Timeout {
        /// Elapsed time, zero when unknown.
        duration: Duration,
    },

    /// Host name could not be resolved.
    #[error("DNS resolution failed: {host}")]
    DnsResolutionFailed {
        /// Host that failed to resolve.
        host: String,
    },

    /// TLS handshake or certificate failure.
    #[error("TLS error: {message}")]
    TlsError {
        /// Underlying error text.
        message: String,
    },
}

/// 5xx responses.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServerError {
    /// HTTP 500 or an unmapped status.
    #[error("Internal server error: {message}")]
    InternalError {
        /// Message from the error envelope.
        message: String,
    },

    /// HTTP 503.
    #[error("Service unavailable")]
    ServiceUnavailable {
        /// Server hint, if any.
        retry_after: Option<Duration>,
    },

    /// HTTP 503 mentioning overload.
    #[error("Model overloaded: {model}")]
    ModelOverloaded {
        /// Model named in the message, or `unknown`.
        model: String,
    },
}

/// Failures decoding a response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResponseError {
    /// Body was not the expected JSON shape.
    #[error("Failed to deserialize response: {message}")]
    DeserializationError {
        /// serde_json message.
        message: String,
    },

    /// JSON was valid but semantically unexpected.
    #[error("Unexpected response format: {message}")]
    UnexpectedFormat {
        /// What was unexpected.
        message: String,
    },

    /// The stream ended early or errored.
    #[error("Stream interrupted: {message}")]
    StreamInterrupted {
        /// Reason.
        message: String,
    },

    /// A stream element could not be parsed.
    #[error("Malformed chunk: {message}")]
    MalformedChunk {
        /// Parser message.
        message: String,
    },
}

/// Generation refused or cut short by the content filters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    /// Safety filter blocked the prompt or candidate.
    #[error("Content blocked due to safety: {reason}")]
    SafetyBlocked {
        /// Block or finish reason reported by the API.
        reason: String,
        /// Ratings that triggered the block.
        safety_ratings: Vec<SafetyRatingInfo>,
    },

    /// Candidate stopped for reciting training data.
    #[error("Content blocked due to recitation")]
    RecitationBlocked {
        /// Ratings reported with the candidate.
        safety_ratings: Vec<SafetyRatingInfo>,
    },

    /// Prohibited or blocklisted content.
    #[error("Prohibited content detected")]
    ProhibitedContent,

    /// A part carries a MIME type the API cannot consume.
    #[error("Unsupported content type: {mime_type}")]
    UnsupportedContent {
        /// Offending MIME type.
        mime_type: String,
    },
}

/// Flattened safety rating carried inside [`ContentError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafetyRatingInfo {
    /// Harm category wire name.
    pub category: String,
    /// Probability wire name.
    pub probability: String,
}

/// Missing or failed resources.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// No such file, or a local path that does not exist.
    #[error("File not found: {file_name}")]
    FileNotFound {
        /// File name or path.
        file_name: String,
    },

    /// Server-side file processing ended in `FAILED`.
    #[error("File processing failed: {file_name} - {message}")]
    FileProcessingFailed {
        /// File resource name.
        file_name: String,
        /// Status message.
        message: String,
    },

    /// No such cached content.
    #[error("Cached content not found: {name}")]
    CachedContentNotFound {
        /// Resource name.
        name: String,
    },

    /// No such model.
    #[error("Model not found: {model}")]
    ModelNotFound {
        /// Model name.
        model: String,
    },

    /// No such batch or operation.
    #[error("Batch not found: {name}")]
    BatchNotFound {
        /// Resource name.
        name: String,
    },
}

/// Chat persistence failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Filesystem failure.
    #[error("I/O error: {message}")]
    Io {
        /// OS error text.
        message: String,
    },

    /// Session id cannot be used as a storage key.
    #[error("Invalid session id: {id}")]
    InvalidId {
        /// Rejected id.
        id: String,
    },

    /// Remote storage answered with a non-success status.
    #[error("Remote storage returned HTTP {status}: {message}")]
    Remote {
        /// HTTP status.
        status: u16,
        /// Response body.
        message: String,
    },
}

/// Failures in the chat function-calling loop.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// The model kept requesting function calls past the configured limit.
    #[error("Max function call turns exceeded")]
    MaxFunctionCallTurnsExceeded {
        /// Configured limit.
        limit: usize,
    },

    /// The model returned something unusable for the session.
    #[error("{message}")]
    InvalidResponse {
        /// Reason, e.g. `No candidates returned`.
        message: String,
    },
}
