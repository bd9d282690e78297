use std::path::Path;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::{json, Value};

use super::validation::{validate_file_name, validate_upload_request};
use super::FilesService;
use crate::error::{GeminiError, GeminiResult, NetworkError, ResourceError, StorageError};
use crate::services::context::ServiceContext;
use crate::support::mime_type_for_path;
use crate::transport::{endpoints, HttpMethod};
use crate::types::{File, FileState, ListFilesParams, ListFilesResponse, UploadFileRequest};

/// [`FilesService`] over the REST API. Uploads go to the upload host.
#[derive(Clone)]
pub struct FilesServiceImpl {
    context: ServiceContext,
}

impl FilesServiceImpl {
    /// Service using `context`.
    pub fn new(context: ServiceContext) -> Self {
        Self { context }
    }

    /// Uploads raw bytes.
    pub async fn upload_bytes(
        &self,
        data: impl Into<Bytes>,
        mime_type: impl Into<String>,
        display_name: Option<String>,
    ) -> GeminiResult<File> {
        self.upload(UploadFileRequest {
            display_name,
            file_data: data.into(),
            mime_type: mime_type.into(),
        })
        .await
    }
}

#[async_trait]
impl FilesService for FilesServiceImpl {
    async fn upload(&self, request: UploadFileRequest) -> GeminiResult<File> {
        validate_upload_request(&request)?;
        let http = self.context.builder().build_multipart_request(&request)?;
        let body: Value = self.context.execute(http).await?;
        let file = File::from_value(body)?;
        self.context.logger().info(
            "file uploaded",
            json!({
                "name": file.name.as_str(),
                "mime_type": request.mime_type,
                "size_bytes": request.file_data.len(),
            }),
        );
        Ok(file)
    }

    async fn upload_path(&self, path: &Path, display_name: Option<String>) -> GeminiResult<File> {
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Err(ResourceError::FileNotFound {
                file_name: path.display().to_string(),
            }
            .into());
        }
        let data = tokio::fs::read(path).await.map_err(|e| StorageError::Io {
            message: format!("{}: {e}", path.display()),
        })?;
        let display_name = display_name.or_else(|| {
            path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
        });
        self.upload(UploadFileRequest {
            display_name,
            file_data: Bytes::from(data),
            mime_type: mime_type_for_path(path),
        })
        .await
    }

    async fn list(&self, params: Option<ListFilesParams>) -> GeminiResult<ListFilesResponse> {
        let params = params.unwrap_or_default();
        let url = self
            .context
            .builder()
            .url(endpoints::FILES)
            .add_optional_query("pageSize", params.page_size)
            .add_optional_query("pageToken", params.page_token);
        let request = self.context.builder().empty_request(HttpMethod::Get, url);
        self.context.execute(request).await
    }

    async fn get(&self, name: &str) -> GeminiResult<File> {
        validate_file_name(name)?;
        let url = self.context.builder().url(&endpoints::file(name));
        let request = self.context.builder().empty_request(HttpMethod::Get, url);
        self.context.execute(request).await
    }

    async fn delete(&self, name: &str) -> GeminiResult<()> {
        validate_file_name(name)?;
        let url = self.context.builder().url(&endpoints::file(name));
        let request = self.context.builder().empty_request(HttpMethod::Delete, url);
        self.context.execute_empty(request).await?;
        self.context
            .logger()
            .info("file deleted", json!({"name": endpoints::file(name)}));
        Ok(())
    }

    async fn wait_for_active(
        &self,
        name: &str,
        timeout: Duration,
        poll_interval: Duration,
    ) -> GeminiResult<File> {
        let started = Instant::now();
        loop {
            let file = self.get(name).await?;
            match file.state {
                Some(FileState::Active) => return Ok(file),
                Some(FileState::Failed) => {
                    let message = file
                        .error
                        .map(|status| status.message)
                        .filter(|m| !m.is_empty())
                        .unwrap_or_else(|| "File processing failed".to_string());
                    return Err(ResourceError::FileProcessingFailed {
                        file_name: endpoints::file(name),
                        message,
                    }
                    .into());
                }
                _ => {}
            }

            if started.elapsed() >= timeout {
                return Err(GeminiError::Network(NetworkError::Timeout { duration: timeout }));
            }
            tracing::debug!(file = name, "waiting for file to become active");
            tokio::time::sleep(poll_interval).await;
        }
    }
}
