//! Client configuration.
//!
//! [`GeminiConfig`] is built either explicitly through
//! [`GeminiConfig::builder`] or from the process environment with
//! [`GeminiConfig::from_env`].

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::error::{ConfigurationError, GeminiError};
use crate::resilience::RetryConfig;

/// Default REST host.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default host for media uploads; the `/upload` prefix is part of it.
pub const DEFAULT_UPLOAD_BASE_URL: &str = "https://generativelanguage.googleapis.com/upload";

/// Default API version.
pub const DEFAULT_API_VERSION: &str = "v1beta";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default connect timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default retry budget.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Where the API key travels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AuthMethod {
    /// `x-goog-api-key` header.
    #[default]
    Header,
    /// `?key=` query parameter.
    QueryParam,
}

/// Verbosity of the injected [`Logger`](crate::observability::Logger).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    /// Errors only.
    Error,
    /// Errors and warnings.
    Warn,
    /// General information.
    #[default]
    Info,
    /// Request-level detail.
    Debug,
}

/// Configuration for a Gemini client.
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key.
    pub api_key: SecretString,
    /// REST host.
    pub base_url: Url,
    /// Upload host.
    pub upload_base_url: Url,
    /// API version path segment.
    pub api_version: String,
    /// Whole-request timeout.
    pub timeout: Duration,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
    /// Backoff policy for every request.
    pub retry_config: RetryConfig,
    /// Logger verbosity.
    pub log_level: LogLevel,
    /// How the key is attached.
    pub auth_method: AuthMethod,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url.as_str())
            .field("upload_base_url", &self.upload_base_url.as_str())
            .field("api_version", &self.api_version)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("retry_config", &self.retry_config)
            .field("log_level", &self.log_level)
            .field("auth_method", &self.auth_method)
            .finish()
    }
}

impl GeminiConfig {
    /// New builder.
    pub fn builder() -> GeminiConfigBuilder {
        GeminiConfigBuilder::default()
    }

    /// Reads `GEMINI_API_KEY` (falling back to `GOOGLE_API_KEY`),
    /// `GEMINI_BASE_URL`, `GEMINI_API_VERSION`, `GEMINI_TIMEOUT_SECS` and
    /// `GEMINI_MAX_RETRIES`.
    pub fn from_env() -> Result<Self, GeminiError> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("GOOGLE_API_KEY"))
            .map_err(|_| ConfigurationError::MissingApiKey)?;
        if api_key.trim().is_empty() {
            return Err(ConfigurationError::MissingApiKey.into());
        }

        let mut builder = Self::builder().api_key(SecretString::new(api_key));
        if let Ok(base_url) = std::env::var("GEMINI_BASE_URL") {
            builder = builder.base_url(&base_url)?;
        }
        if let Ok(version) = std::env::var("GEMINI_API_VERSION") {
            builder = builder.api_version(&version);
        }
        if let Some(secs) = env_number::<u64>("GEMINI_TIMEOUT_SECS") {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(retries) = env_number::<u32>("GEMINI_MAX_RETRIES") {
            builder = builder.max_retries(retries);
        }
        builder.build()
    }
}

fn env_number<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

/// Builder for [`GeminiConfig`].
#[derive(Default)]
pub struct GeminiConfigBuilder {
    api_key: Option<SecretString>,
    base_url: Option<Url>,
    upload_base_url: Option<Url>,
    api_version: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    max_retries: Option<u32>,
    retry_config: Option<RetryConfig>,
    log_level: Option<LogLevel>,
    auth_method: Option<AuthMethod>,
}

impl GeminiConfigBuilder {
    /// Sets the API key.
    pub fn api_key(mut self, api_key: SecretString) -> Self {
        self.api_key = Some(api_key);
        self
    }

    /// Sets the REST host.
    ///
    /// When no upload host is set explicitly, uploads go to
    /// `{base_url}/upload`.
    pub fn base_url(mut self, base_url: &str) -> Result<Self, GeminiError> {
        self.base_url = Some(parse_url(base_url)?);
        Ok(self)
    }

    /// Sets the upload host.
    pub fn upload_base_url(mut self, upload_base_url: &str) -> Result<Self, GeminiError> {
        self.upload_base_url = Some(parse_url(upload_base_url)?);
        Ok(self)
    }

    /// Sets the API version.
    pub fn api_version(mut self, version: &str) -> Self {
        self.api_version = Some(version.trim_matches('/').to_string());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Overrides only the retry budget of the retry policy.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Sets the retry policy.
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = Some(config);
        self
    }

    /// Sets the logger verbosity.
    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Sets how the key is attached.
    pub fn auth_method(mut self, method: AuthMethod) -> Self {
        self.auth_method = Some(method);
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> Result<GeminiConfig, GeminiError> {
        let api_key = self.api_key.ok_or(ConfigurationError::MissingApiKey)?;

        let base_url = match self.base_url {
            Some(url) => url,
            None => parse_url(DEFAULT_BASE_URL)?,
        };
        let upload_base_url = match self.upload_base_url {
            Some(url) => url,
            None if base_url.as_str().trim_end_matches('/') == DEFAULT_BASE_URL => {
                parse_url(DEFAULT_UPLOAD_BASE_URL)?
            }
            None => parse_url(&format!("{}/upload", base_url.as_str().trim_end_matches('/')))?,
        };

        let mut retry_config = self.retry_config.unwrap_or_default();
        if let Some(max_retries) = self.max_retries {
            retry_config.max_retries = max_retries;
        }

        Ok(GeminiConfig {
            api_key,
            base_url,
            upload_base_url,
            api_version: self
                .api_version
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            timeout: self
                .timeout
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            connect_timeout: self
                .connect_timeout
                .unwrap_or(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS)),
            retry_config,
            log_level: self.log_level.unwrap_or_default(),
            auth_method: self.auth_method.unwrap_or_default(),
        })
    }
}

fn parse_url(raw: &str) -> Result<Url, GeminiError> {
    let url = Url::parse(raw).map_err(|_| ConfigurationError::InvalidBaseUrl {
        url: raw.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigurationError::InvalidBaseUrl {
            url: raw.to_string(),
        }
        .into());
    }
    Ok(url)
}
