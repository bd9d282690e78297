//! Builds authenticated requests.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::{BufMut, Bytes, BytesMut};
use serde::Serialize;
use serde_json::json;

use super::http::{HttpMethod, HttpRequest};
use crate::auth::{ApiKeyAuthManager, AuthManager};
use crate::config::GeminiConfig;
use crate::error::GeminiResult;
use crate::support::{Url, Uuid};
use crate::types::UploadFileRequest;

/// Prefix of generated multipart boundaries.
pub const MULTIPART_BOUNDARY_PREFIX: &str = "----gemini_boundary_";

/// Builds requests against the REST and upload hosts of one configuration.
#[derive(Clone)]
pub struct RequestBuilder {
    base_url: String,
    upload_base_url: String,
    api_version: String,
    auth: Arc<dyn AuthManager>,
}

impl RequestBuilder {
    /// Builder over explicit hosts.
    pub fn new(
        base_url: &url::Url,
        upload_base_url: &url::Url,
        api_version: impl Into<String>,
        auth: Arc<dyn AuthManager>,
    ) -> Self {
        Self {
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            upload_base_url: upload_base_url.as_str().trim_end_matches('/').to_string(),
            api_version: api_version.into(),
            auth,
        }
    }

    /// Builder using the hosts and key of `config`.
    pub fn from_config(config: &GeminiConfig) -> Self {
        Self::new(
            &config.base_url,
            &config.upload_base_url,
            config.api_version.clone(),
            Arc::new(ApiKeyAuthManager::from_config(config)),
        )
    }

    /// `{base}/{version}/{path}`, without credentials.
    ///
    /// ```
    /// # use gemini_sdk::{config::GeminiConfig, transport::RequestBuilder};
    /// # use secrecy::SecretString;
    /// let config = GeminiConfig::builder()
    ///     .api_key(SecretString::new("k".into()))
    ///     .build()
    ///     .unwrap();
    /// let builder = RequestBuilder::from_config(&config);
    /// assert_eq!(
    ///     builder.url("/models").as_str(),
    ///     "https://generativelanguage.googleapis.com/v1beta/models"
    /// );
    /// ```
    pub fn url(&self, path: &str) -> Url {
        Url::new(self.base_url.as_str())
            .with_path(&self.api_version)
            .with_path(path)
    }

    /// `{upload_base}/{version}/{path}`.
    pub fn upload_url(&self, path: &str) -> Url {
        Url::new(self.upload_base_url.as_str())
            .with_path(&self.api_version)
            .with_path(path)
    }

    /// Adds credentials and a JSON body to a request for `url`.
    pub fn build_request<T: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        url: Url,
        body: Option<&T>,
    ) -> GeminiResult<HttpRequest> {
        let mut headers = HashMap::new();
        let body = match body {
            Some(body) => {
                headers.insert("Content-Type".to_string(), "application/json".to_string());
                Some(Bytes::from(serde_json::to_vec(body)?))
            }
            None => None,
        };
        Ok(self.finish(method, url, headers, body))
    }

    /// Shorthand for [`build_request`](Self::build_request) on a REST path.
    pub fn json_request<T: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&T>,
    ) -> GeminiResult<HttpRequest> {
        self.build_request(method, self.url(path), body)
    }

    /// Body-less request on a REST path.
    pub fn empty_request(&self, method: HttpMethod, url: Url) -> HttpRequest {
        self.finish(method, url, HashMap::new(), None)
    }

    /// `POST` for a streaming endpoint.
    pub fn build_streaming_request<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> GeminiResult<HttpRequest> {
        self.json_request(HttpMethod::Post, path, Some(body))
    }

    /// `multipart/related` upload of file metadata plus content to
    /// `{upload_base}/{version}/files`.
    pub fn build_multipart_request(&self, upload: &UploadFileRequest) -> GeminiResult<HttpRequest> {
        let boundary = format!("{MULTIPART_BOUNDARY_PREFIX}{}", Uuid::generate().simple());
        let metadata = match &upload.display_name {
            Some(name) => json!({"file": {"display_name": name}}),
            None => json!({"file": {}}),
        };
        let metadata = serde_json::to_vec(&metadata)?;

        let mut body = BytesMut::with_capacity(upload.file_data.len() + metadata.len() + 256);
        body.put_slice(format!("--{boundary}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n").as_bytes());
        body.put_slice(&metadata);
        body.put_slice(format!("\r\n--{boundary}\r\nContent-Type: {}\r\n\r\n", upload.mime_type).as_bytes());
        body.put_slice(&upload.file_data);
        body.put_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        let mut headers = HashMap::new();
        headers.insert(
            "Content-Type".to_string(),
            format!("multipart/related; boundary={boundary}"),
        );
        headers.insert("X-Goog-Upload-Protocol".to_string(), "multipart".to_string());

        Ok(self.finish(
            HttpMethod::Post,
            self.upload_url(super::endpoints::FILES),
            headers,
            Some(body.freeze()),
        ))
    }

    fn finish(
        &self,
        method: HttpMethod,
        mut url: Url,
        mut headers: HashMap<String, String>,
        body: Option<Bytes>,
    ) -> HttpRequest {
        if let Some((name, value)) = self.auth.auth_header() {
            headers.insert(name, value);
        }
        if let Some((key, value)) = self.auth.auth_query_param() {
            url = url.add_query(&key, &value);
        }
        HttpRequest {
            method,
            url: url.into(),
            headers,
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthMethod;
    use pretty_assertions::assert_eq;
    use secrecy::SecretString;

    fn builder(method: AuthMethod) -> RequestBuilder {
        let config = GeminiConfig::builder()
            .api_key(SecretString::new("secret".into()))
            .auth_method(method)
            .build()
            .unwrap();
        RequestBuilder::from_config(&config)
    }

    #[test]
    fn test_header_auth_and_json_body() {
        let request = builder(AuthMethod::Header)
            .json_request(HttpMethod::Post, "models/m:countTokens", Some(&json!({"a": 1})))
            .unwrap();

        assert_eq!(
            request.url,
            "https://generativelanguage.googleapis.com/v1beta/models/m:countTokens"
        );
        assert_eq!(request.header("x-goog-api-key"), Some("secret"));
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.json_body(), Some(json!({"a": 1})));
    }

    #[test]
    fn test_query_auth_follows_other_params() {
        let b = builder(AuthMethod::QueryParam);
        let request = b.empty_request(HttpMethod::Get, b.url("files").add_query("pageSize", "5"));

        assert_eq!(
            request.url,
            "https://generativelanguage.googleapis.com/v1beta/files?pageSize=5&key=secret"
        );
        assert_eq!(request.header("x-goog-api-key"), None);
        assert!(request.body.is_none());
    }

    #[test]
    fn test_multipart_layout() {
        let upload = UploadFileRequest {
            display_name: Some("cat.png".to_string()),
            file_data: Bytes::from_static(b"PNGDATA"),
            mime_type: "image/png".to_string(),
        };

        let request = builder(AuthMethod::Header).build_multipart_request(&upload).unwrap();

        assert_eq!(
            request.url,
            "https://generativelanguage.googleapis.com/upload/v1beta/files"
        );
        assert_eq!(request.header("X-Goog-Upload-Protocol"), Some("multipart"));
        let content_type = request.header("Content-Type").unwrap();
        let boundary = content_type
            .strip_prefix("multipart/related; boundary=")
            .unwrap();
        assert!(boundary.starts_with(MULTIPART_BOUNDARY_PREFIX));

        let body = String::from_utf8(request.body.clone().unwrap().to_vec()).unwrap();
        assert!(body.starts_with(&format!("--{boundary}\r\n")));
        assert!(body.contains(r#"{"file":{"display_name":"cat.png"}}"#));
        assert!(body.contains("Content-Type: image/png\r\n\r\nPNGDATA\r\n"));
        assert!(body.ends_with(&format!("--{boundary}--\r\n")));
    }
}
