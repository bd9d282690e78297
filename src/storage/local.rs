use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;

use super::{check_id, ChatStorage};
use crate::error::{GeminiResult, StorageError};

/// Directory used by [`LocalStorage::default`].
pub const DEFAULT_CHAT_DIR: &str = "chats";

fn io_error(path: &Path, err: &std::io::Error) -> StorageError {
    StorageError::Io {
        message: format!("{}: {err}", path.display()),
    }
}

/// Pretty-printed JSON files at `<root>/<id>.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalStorage {
    root: PathBuf,
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new(DEFAULT_CHAT_DIR)
    }
}

impl LocalStorage {
    /// Storage under `root`; the directory is created on first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &str) -> GeminiResult<PathBuf> {
        check_id(id)?;
        Ok(self.root.join(format!("{id}.json")))
    }
}

#[async_trait]
impl ChatStorage for LocalStorage {
    async fn save(&self, id: &str, document: &Value) -> GeminiResult<()> {
        let path = self.path_for(id)?;
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| io_error(&self.root, &e))?;
        let text = serde_json::to_string_pretty(document)?;
        tokio::fs::write(&path, text)
            .await
            .map_err(|e| io_error(&path, &e))?;
        tracing::debug!(path = %path.display(), "chat saved");
        Ok(())
    }

    async fn load(&self, id: &str) -> GeminiResult<Option<Value>> {
        let path = self.path_for(id)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path, &e).into()),
        }
    }

    async fn list(&self) -> GeminiResult<Vec<String>> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error(&self.root, &e).into()),
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| io_error(&self.root, &e))?
        {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    ids.push(stem.to_string());
                }
            }
        }
        ids.sort();
        Ok(ids)
    }

    async fn delete(&self, id: &str) -> GeminiResult<()> {
        let path = self.path_for(id)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&path, &e).into()),
        }
    }
}
