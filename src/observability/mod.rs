//! Observability.
//!
//! Library internals emit `tracing` events directly. The [`Logger`] trait is
//! the injectable, structured sink the client uses for per-request logs.

pub mod logging;

pub use logging::{redact, Logger, NoopLogger, StructuredLogger, REDACTED};
