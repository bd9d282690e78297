//! [`HttpTransport`] over `reqwest`.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;

use super::error::TransportError;
use super::http::{ChunkedStream, HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use crate::config::GeminiConfig;

/// Production transport.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Transport with the given timeouts.
    pub fn new(timeout: Duration, connect_timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| TransportError::Connection(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Transport with the timeouts of `config`.
    pub fn from_config(config: &GeminiConfig) -> Result<Self, TransportError> {
        Self::new(config.timeout, config.connect_timeout)
    }

    async fn dispatch(&self, request: HttpRequest) -> Result<reqwest::Response, TransportError> {
        let mut builder = self
            .client
            .request(method(request.method), &request.url)
            .headers(header_map(&request.headers));
        if let Some(body) = request.body {
            builder = builder.body(body);
        }
        builder.send().await.map_err(classify)
    }
}

fn method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

fn header_map(headers: &HashMap<String, String>) -> HeaderMap {
    headers
        .iter()
        .filter_map(|(k, v)| {
            Some((
                HeaderName::from_bytes(k.as_bytes()).ok()?,
                HeaderValue::from_str(v).ok()?,
            ))
        })
        .collect()
}

fn response_headers(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.to_string(), v.to_string())))
        .collect()
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_builder() {
        TransportError::Request(err.to_string())
    } else {
        TransportError::Connection(err.to_string())
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let response = self.dispatch(request).await?;
        let status = response.status().as_u16();
        let headers = response_headers(response.headers());
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Request(format!("failed to read response body: {e}")))?;
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }

    async fn send_streaming(&self, request: HttpRequest) -> Result<ChunkedStream, TransportError> {
        let response = self.dispatch(request).await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let headers = response_headers(response.headers());
            let body = response.bytes().await.unwrap_or_default();
            return Err(TransportError::Status {
                status,
                headers,
                body,
            });
        }
        Ok(Box::pin(response.bytes_stream().map(|chunk| {
            chunk.map_err(|e| TransportError::Request(format!("stream error: {e}")))
        })))
    }
}
