use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use super::{check_id, ChatStorage};
use crate::config::{DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS};
use crate::error::{GeminiError, GeminiResult, StorageError};
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};

/// Chat documents behind a small REST API:
/// `PUT/GET/DELETE {base}/chats/{id}` and `GET {base}/chats`.
#[derive(Clone)]
pub struct RemoteStorage {
    base_url: String,
    token: Option<SecretString>,
    transport: Arc<dyn HttpTransport>,
}

impl std::fmt::Debug for RemoteStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteStorage")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl RemoteStorage {
    /// Storage at `base_url` authenticated with a bearer token; an empty token
    /// sends no `Authorization` header.
    pub fn new(base_url: impl Into<String>, token: SecretString) -> GeminiResult<Self> {
        let transport = ReqwestTransport::new(
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        )?;
        Ok(Self::with_transport(base_url, token, Arc::new(transport)))
    }

    /// Storage over an explicit transport.
    pub fn with_transport(
        base_url: impl Into<String>,
        token: SecretString,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let token = (!token.expose_secret().is_empty()).then_some(token);
        Self {
            base_url,
            token,
            transport,
        }
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: HttpMethod, path: &str, body: Option<Bytes>) -> HttpRequest {
        let mut headers = HashMap::new();
        if let Some(token) = &self.token {
            headers.insert(
                "Authorization".to_string(),
                format!("Bearer {}", token.expose_secret()),
            );
        }
        if body.is_some() {
            headers.insert("Content-Type".to_string(), "application/json".to_string());
        }
        HttpRequest {
            method,
            url: format!("{}/{path}", self.base_url),
            headers,
            body,
        }
    }

    async fn send(&self, request: HttpRequest) -> GeminiResult<HttpResponse> {
        self.transport
            .send(request)
            .await
            .map_err(GeminiError::from)
    }
}

fn remote_error(response: &HttpResponse) -> GeminiError {
    StorageError::Remote {
        status: response.status,
        message: String::from_utf8_lossy(&response.body).into_owned(),
    }
    .into()
}

#[async_trait]
impl ChatStorage for RemoteStorage {
    async fn save(&self, id: &str, document: &Value) -> GeminiResult<()> {
        check_id(id)?;
        let body = Bytes::from(serde_json::to_vec(document)?);
        let response = self
            .send(self.request(HttpMethod::Put, &format!("chats/{id}"), Some(body)))
            .await?;
        if response.is_success() {
            Ok(())
        } else {
            tracing::warn!(status = response.status, id, "remote chat save failed");
            Err(remote_error(&response))
        }
    }

    async fn load(&self, id: &str) -> GeminiResult<Option<Value>> {
        check_id(id)?;
        let response = self
            .send(self.request(HttpMethod::Get, &format!("chats/{id}"), None))
            .await?;
        match response.status {
            404 => Ok(None),
            _ if response.is_success() => Ok(Some(serde_json::from_slice(&response.body)?)),
            _ => Err(remote_error(&response)),
        }
    }

    async fn list(&self) -> GeminiResult<Vec<String>> {
        let response = self.send(self.request(HttpMethod::Get, "chats", None)).await?;
        if !response.is_success() {
            return Err(remote_error(&response));
        }
        Ok(serde_json::from_slice(&response.body)?)
    }

    async fn delete(&self, id: &str) -> GeminiResult<()> {
        check_id(id)?;
        let response = self
            .send(self.request(HttpMethod::Delete, &format!("chats/{id}"), None))
            .await?;
        if response.is_success() || response.status == 404 {
            Ok(())
        } else {
            Err(remote_error(&response))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::MockHttpTransport;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn storage(transport: &MockHttpTransport, token: &str) -> RemoteStorage {
        RemoteStorage::with_transport(
            "https://chats.example.com/api/",
            SecretString::new(token.to_string()),
            Arc::new(transport.clone()),
        )
    }

    #[tokio::test]
    async fn test_save_puts_with_bearer_token() {
        // Arrange
        let transport = MockHttpTransport::new();
        transport.enqueue_json_response(200, "");
        let storage = storage(&transport, "secret");

        // Act
        storage.save("s1", &json!({"id": "s1"})).await.unwrap();

        // Assert
        transport.verify_request(0, HttpMethod::Put, "https://chats.example.com/api/chats/s1");
        transport.verify_header(0, "Authorization", "Bearer secret");
        assert_eq!(transport.last_request().unwrap().json_body(), Some(json!({"id": "s1"})));
    }

    #[tokio::test]
    async fn test_load_missing_is_none() {
        let transport = MockHttpTransport::new();
        transport.enqueue_json_response(404, r#"{"error": "not found"}"#);
        let storage = storage(&transport, "");

        assert_eq!(storage.load("s1").await.unwrap(), None);
        assert!(transport.last_request().unwrap().header("Authorization").is_none());
    }

    #[tokio::test]
    async fn test_list_and_failures() {
        let transport = MockHttpTransport::new();
        transport.enqueue_json_response(200, r#"["a", "b"]"#);
        transport.enqueue_json_response(500, "boom");
        let storage = storage(&transport, "t");

        assert_eq!(storage.list().await.unwrap(), vec!["a", "b"]);
        let err = storage.save("a", &json!({})).await.unwrap_err();
        assert_eq!(
            err,
            GeminiError::Storage(StorageError::Remote {
                status: 500,
                message: "boom".to_string(),
            })
        );
    }
}
