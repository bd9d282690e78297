//! Retry with exponential backoff.
//!
//! Only errors for which [`GeminiError::is_retryable`] holds are retried.
//! A server-provided `Retry-After` hint replaces the computed backoff for
//! that attempt.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::error::GeminiError;

/// Spread applied around each delay when jitter is enabled.
const JITTER_FRACTION: f64 = 0.25;

/// Backoff policy shared by every request a client sends.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Growth factor between consecutive delays.
    pub multiplier: f64,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
    /// Randomise each delay by up to ±25 %.
    pub enable_jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_secs(1),
            multiplier: 2.0,
            max_delay: Duration::from_secs(10),
            enable_jitter: true,
        }
    }
}

impl RetryConfig {
    /// Single attempt, no retries.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// More attempts with shorter initial waits.
    pub fn aggressive() -> Self {
        Self {
            max_retries: 5,
            initial_delay: Duration::from_millis(500),
            multiplier: 2.0,
            max_delay: Duration::from_secs(30),
            enable_jitter: true,
        }
    }

    /// Backoff before retry number `attempt` (zero based), without jitter.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let secs = self.initial_delay.as_secs_f64() * self.multiplier.powi(exponent);
        let capped = secs.min(self.max_delay.as_secs_f64());
        if capped.is_finite() && capped >= 0.0 {
            Duration::from_secs_f64(capped)
        } else {
            self.max_delay
        }
    }
}

/// Runs fallible async operations under a [`RetryConfig`].
#[derive(Debug, Clone, Default)]
pub struct RetryExecutor {
    config: RetryConfig,
}

impl RetryExecutor {
    /// Executor for `config`.
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// The policy in use.
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Calls `operation` until it succeeds, fails with a non-retryable
    /// error, or the retry budget is spent. The last error is returned.
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T, GeminiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, GeminiError>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(value) => {
                    if attempt > 0 {
                        debug!(retries = attempt, "request succeeded after retrying");
                    }
                    return Ok(value);
                }
                Err(err) if err.is_retryable() && attempt < self.config.max_retries => {
                    let wait = err
                        .retry_after()
                        .unwrap_or_else(|| self.jittered(self.config.delay_for(attempt)));
                    attempt += 1;
                    warn!(
                        attempt,
                        max_retries = self.config.max_retries,
                        wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "retrying request"
                    );
                    sleep(wait).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn jittered(&self, delay: Duration) -> Duration {
        if !self.config.enable_jitter {
            return delay;
        }
        // Uniform in [-1, 1) from the random bits of a v4 uuid.
        let bits = uuid::Uuid::new_v4().as_u128() as u32;
        let unit = f64::from(bits) / f64::from(u32::MAX) * 2.0 - 1.0;
        let secs = delay.as_secs_f64() * (1.0 + unit * JITTER_FRACTION);
        Duration::from_secs_f64(secs.max(0.0))
    }
}
