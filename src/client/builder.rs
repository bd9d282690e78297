//! Assembles a [`GeminiClientImpl`] from explicit settings, a config or the environment.

use secrecy::SecretString;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{AuthMethod, GeminiConfig, LogLevel};
use crate::error::{ConfigurationError, GeminiError, NetworkError};
use crate::observability::{Logger, StructuredLogger};
use crate::resilience::RetryConfig;
use crate::services::ServiceContext;
use crate::transport::{HttpTransport, ReqwestTransport, RequestBuilder};

use super::client::GeminiClientImpl;

/// Collects client settings; [`build`](Self::build) resolves them into a config.
///
/// Settings left unset fall back to the [`GeminiConfig`] defaults; the API
/// key falls back to `GEMINI_API_KEY`, then `GOOGLE_API_KEY`.
///
/// # Example
///
/// ```no_run
/// use gemini_sdk::GeminiClientBuilder;
/// use secrecy::SecretString;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = GeminiClientBuilder::new()
///     .api_key(SecretString::new("your-api-key".into()))
///     .timeout(Duration::from_secs(60))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct GeminiClientBuilder {
    api_key: Option<SecretString>,
    base_url: Option<String>,
    upload_base_url: Option<String>,
    api_version: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    max_retries: Option<u32>,
    retry_config: Option<RetryConfig>,
    auth_method: Option<AuthMethod>,
    log_level: Option<LogLevel>,
    config: Option<GeminiConfig>,

    // Injected in place of the reqwest transport and tracing logger.
    transport: Option<Arc<dyn HttpTransport>>,
    logger: Option<Arc<dyn Logger>>,
}

impl GeminiClientBuilder {
    /// Empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder from an existing configuration. Later setters still
    /// override its values.
    pub fn from_config(config: GeminiConfig) -> Self {
        Self {
            config: Some(config),
            ..Self::default()
        }
    }

    /// Sets the API key.
    pub fn api_key(mut self, key: SecretString) -> Self {
        self.api_key = Some(key);
        self
    }

    /// Sets the REST host; validated by [`build`](Self::build).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the upload host.
    pub fn upload_base_url(mut self, url: impl Into<String>) -> Self {
        self.upload_base_url = Some(url.into());
        self
    }

    /// Sets the API version.
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, duration: Duration) -> Self {
        self.connect_timeout = Some(duration);
        self
    }

    /// Sets the maximum number of retry attempts.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Sets the whole retry policy.
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = Some(config);
        self
    }

    /// Sets the authentication method.
    pub fn auth_method(mut self, method: AuthMethod) -> Self {
        self.auth_method = Some(method);
        self
    }

    /// Sets the verbosity of the default logger.
    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Replaces the reqwest transport, e.g. with a mock.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets a custom logger.
    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - API key is not provided and not found in environment variables
    /// - a URL does not parse
    /// - the HTTP transport cannot be created
    pub fn build(self) -> Result<GeminiClientImpl, GeminiError> {
        let config = self.resolve_config()?;

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::from_config(&config).map_err(|e| {
                GeminiError::Network(NetworkError::ConnectionFailed {
                    message: format!("Failed to create HTTP transport: {e}"),
                })
            })?),
        };

        let logger: Arc<dyn Logger> = self
            .logger
            .unwrap_or_else(|| Arc::new(StructuredLogger::new("gemini").with_level(config.log_level)));

        logger.info(
            "Gemini client initialized",
            serde_json::json!({
                "base_url": config.base_url.as_str(),
                "api_version": config.api_version,
                "auth_method": format!("{:?}", config.auth_method),
            }),
        );

        let context = ServiceContext::new(
            transport,
            RequestBuilder::from_config(&config),
            logger,
            config.retry_config.clone(),
        );
        Ok(GeminiClientImpl::from_parts(config, context))
    }

    fn resolve_config(&self) -> Result<GeminiConfig, GeminiError> {
        let base = self.config.clone();

        // Order: explicit -> config -> GEMINI_API_KEY -> GOOGLE_API_KEY
        let api_key = self
            .api_key
            .clone()
            .or_else(|| base.as_ref().map(|c| c.api_key.clone()))
            .or_else(|| {
                std::env::var("GEMINI_API_KEY")
                    .or_else(|_| std::env::var("GOOGLE_API_KEY"))
                    .ok()
                    .filter(|key| !key.trim().is_empty())
                    .map(SecretString::new)
            })
            .ok_or(ConfigurationError::MissingApiKey)?;

        let mut builder = GeminiConfig::builder().api_key(api_key);
        if let Some(base) = &base {
            builder = builder
                .base_url(base.base_url.as_str())?
                .upload_base_url(base.upload_base_url.as_str())?
                .api_version(&base.api_version)
                .timeout(base.timeout)
                .connect_timeout(base.connect_timeout)
                .retry_config(base.retry_config.clone())
                .log_level(base.log_level)
                .auth_method(base.auth_method);
        }
        if let Some(url) = &self.base_url {
            builder = builder.base_url(url)?;
        }
        if let Some(url) = &self.upload_base_url {
            builder = builder.upload_base_url(url)?;
        }
        if let Some(version) = &self.api_version {
            builder = builder.api_version(version);
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = self.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(config) = &self.retry_config {
            builder = builder.retry_config(config.clone());
        }
        if let Some(retries) = self.max_retries {
            builder = builder.max_retries(retries);
        }
        if let Some(method) = self.auth_method {
            builder = builder.auth_method(method);
        }
        if let Some(level) = self.log_level {
            builder = builder.log_level(level);
        }
        builder.build()
    }
}
