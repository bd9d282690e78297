//! State shared by every service of one client.

use std::sync::{Arc, RwLock};

use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::error::{GeminiError, GeminiResult};
use crate::observability::Logger;
use crate::resilience::{RetryConfig, RetryExecutor};
use crate::streaming::ByteStream;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, RequestBuilder, ResponseParser};

/// Transport, request builder, logger and retry policy of a client.
///
/// Clones share the retry policy, so a change through
/// [`set_retry_config`](Self::set_retry_config) reaches every service.
#[derive(Clone)]
pub struct ServiceContext {
    transport: Arc<dyn HttpTransport>,
    builder: RequestBuilder,
    logger: Arc<dyn Logger>,
    retry: Arc<RwLock<RetryConfig>>,
}

impl ServiceContext {
    /// New context.
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        builder: RequestBuilder,
        logger: Arc<dyn Logger>,
        retry: RetryConfig,
    ) -> Self {
        Self {
            transport,
            builder,
            logger,
            retry: Arc::new(RwLock::new(retry)),
        }
    }

    /// Request builder.
    pub fn builder(&self) -> &RequestBuilder {
        &self.builder
    }

    /// Logger.
    pub fn logger(&self) -> &dyn Logger {
        self.logger.as_ref()
    }

    /// Current retry policy.
    pub fn retry_config(&self) -> RetryConfig {
        match self.retry.read() {
            Ok(config) => config.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Replaces the retry policy.
    pub fn set_retry_config(&self, config: RetryConfig) {
        match self.retry.write() {
            Ok(mut slot) => *slot = config,
            Err(poisoned) => *poisoned.into_inner() = config,
        }
    }

    /// Sends with retries; non-2xx answers become typed errors.
    pub async fn send(&self, request: HttpRequest) -> GeminiResult<HttpResponse> {
        let executor = RetryExecutor::new(self.retry_config());
        self.logger.debug(
            "sending request",
            json!({"method": request.method.as_str(), "url": strip_query(&request.url)}),
        );
        let result = executor
            .execute(|| {
                let transport = Arc::clone(&self.transport);
                let request = request.clone();
                async move {
                    let response = transport.send(request).await?;
                    if response.is_success() {
                        Ok(response)
                    } else {
                        Err(ResponseParser::parse_error_response(response))
                    }
                }
            })
            .await;
        if let Err(err) = &result {
            self.logger.error(
                "request failed",
                json!({"url": strip_query(&request.url), "status": err.status_code(), "error": err.to_string()}),
            );
        }
        result
    }

    /// Sends and decodes the JSON body.
    pub async fn execute<T: DeserializeOwned>(&self, request: HttpRequest) -> GeminiResult<T> {
        ResponseParser::parse_response(self.send(request).await?)
    }

    /// Sends and discards the body.
    pub async fn execute_empty(&self, request: HttpRequest) -> GeminiResult<()> {
        self.send(request).await.map(drop)
    }

    /// Opens a streaming response, retrying until the first byte arrives.
    pub async fn open_stream(&self, request: HttpRequest) -> GeminiResult<ByteStream> {
        let executor = RetryExecutor::new(self.retry_config());
        self.logger.debug(
            "opening stream",
            json!({"url": strip_query(&request.url)}),
        );
        let stream = executor
            .execute(|| {
                let transport = Arc::clone(&self.transport);
                let request = request.clone();
                async move { transport.send_streaming(request).await.map_err(GeminiError::from) }
            })
            .await?;
        Ok(Box::pin(stream.map(|chunk| chunk.map_err(GeminiError::from))))
    }
}

fn strip_query(url: &str) -> &str {
    url.split_once('?').map_or(url, |(path, _)| path)
}

/// Builds a `RequestError::ValidationError` from collected details.
pub(crate) fn validation_failure(
    message: &str,
    details: Vec<crate::error::ValidationDetail>,
) -> GeminiResult<()> {
    if details.is_empty() {
        Ok(())
    } else {
        Err(crate::error::RequestError::ValidationError {
            message: message.to_string(),
            details,
        }
        .into())
    }
}
