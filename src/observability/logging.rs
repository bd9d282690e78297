//! Structured logging.

use serde_json::{Map, Value};

use crate::config::LogLevel;

/// Replacement for redacted values.
pub const REDACTED: &str = "***REDACTED***";

/// Keys whose values never reach the log, compared case-insensitively.
const SENSITIVE_KEYS: [&str; 10] = [
    "api_key",
    "apikey",
    "key",
    "token",
    "access_token",
    "accesstoken",
    "secret",
    "password",
    "authorization",
    "x-goog-api-key",
];

/// Sink for structured client diagnostics.
pub trait Logger: Send + Sync {
    /// Request-level detail.
    fn debug(&self, message: &str, fields: Value);

    /// Normal operation.
    fn info(&self, message: &str, fields: Value);

    /// Recoverable problems.
    fn warn(&self, message: &str, fields: Value);

    /// Failures.
    fn error(&self, message: &str, fields: Value);
}

/// Forwards to `tracing` after redacting credentials.
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    name: String,
    level: LogLevel,
}

impl StructuredLogger {
    /// Logger tagged with `name`, at [`LogLevel::Info`].
    ///
    /// ```
    /// use gemini_sdk::observability::{Logger, StructuredLogger};
    /// use serde_json::json;
    ///
    /// let logger = StructuredLogger::new("gemini.chat");
    /// logger.info("message sent", json!({"model": "gemini-2.5-flash", "api_key": "hidden"}));
    /// ```
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: LogLevel::Info,
        }
    }

    /// Sets the most verbose level emitted.
    #[must_use]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    fn enabled(&self, level: LogLevel) -> bool {
        level <= self.level
    }
}

/// Masks sensitive keys at any depth, including inside arrays.
pub fn redact(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| {
                    let lowered = k.to_ascii_lowercase();
                    if SENSITIVE_KEYS.contains(&lowered.as_str()) {
                        (k, Value::String(REDACTED.to_string()))
                    } else {
                        (k, redact(v))
                    }
                })
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(redact).collect()),
        other => other,
    }
}

impl Logger for StructuredLogger {
    fn debug(&self, message: &str, fields: Value) {
        if self.enabled(LogLevel::Debug) {
            tracing::debug!(logger = %self.name, fields = %redact(fields), "{message}");
        }
    }

    fn info(&self, message: &str, fields: Value) {
        if self.enabled(LogLevel::Info) {
            tracing::info!(logger = %self.name, fields = %redact(fields), "{message}");
        }
    }

    fn warn(&self, message: &str, fields: Value) {
        if self.enabled(LogLevel::Warn) {
            tracing::warn!(logger = %self.name, fields = %redact(fields), "{message}");
        }
    }

    fn error(&self, message: &str, fields: Value) {
        if self.enabled(LogLevel::Error) {
            tracing::error!(logger = %self.name, fields = %redact(fields), "{message}");
        }
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn debug(&self, _message: &str, _fields: Value) {}
    fn info(&self, _message: &str, _fields: Value) {}
    fn warn(&self, _message: &str, _fields: Value) {}
    fn error(&self, _message: &str, _fields: Value) {}
}
