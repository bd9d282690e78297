//! Resilience primitives for API calls.
//!
//! Every request issued by the client is wrapped in a [`RetryExecutor`].

mod retry;

pub use retry::{RetryConfig, RetryExecutor};
