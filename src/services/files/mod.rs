//! Files API: uploads, metadata and deletion.

mod service;
mod validation;

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::GeminiResult;
use crate::types::{File, ListFilesParams, ListFilesResponse, UploadFileRequest};

pub use service::FilesServiceImpl;
pub use validation::{validate_file_name, validate_upload_request, MAX_FILE_SIZE};

/// Page size used by [`FilesService::list_all`].
pub const LIST_ALL_PAGE_SIZE: i32 = 100;

/// Uploads and manages files.
#[async_trait]
pub trait FilesService: Send + Sync {
    /// Uploads bytes as a new file.
    async fn upload(&self, request: UploadFileRequest) -> GeminiResult<File>;

    /// Uploads a local file. The MIME type comes from the extension and the
    /// display name defaults to the file name.
    async fn upload_path(&self, path: &Path, display_name: Option<String>) -> GeminiResult<File>;

    /// One page of files.
    async fn list(&self, params: Option<ListFilesParams>) -> GeminiResult<ListFilesResponse>;

    /// Every file, following page tokens.
    async fn list_all(&self) -> GeminiResult<Vec<File>> {
        let mut files = Vec::new();
        let mut page_token = None;
        loop {
            let page = self
                .list(Some(ListFilesParams {
                    page_size: Some(LIST_ALL_PAGE_SIZE),
                    page_token,
                }))
                .await?;
            files.extend(page.files);
            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => return Ok(files),
            }
        }
    }

    /// Metadata of one file.
    async fn get(&self, name: &str) -> GeminiResult<File>;

    /// Deletes a file.
    async fn delete(&self, name: &str) -> GeminiResult<()>;

    /// Polls until the file is `ACTIVE`, failing on `FAILED` or after `timeout`.
    async fn wait_for_active(
        &self,
        name: &str,
        timeout: Duration,
        poll_interval: Duration,
    ) -> GeminiResult<File>;
}
