//! Persistence for chat sessions.
//!
//! Sessions travel as their JSON form (see
//! [`ChatSession::to_json`](crate::chat::ChatSession::to_json)); a backend
//! only stores and returns documents keyed by session id.

mod local;
mod remote;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{GeminiResult, StorageError};

pub use local::{LocalStorage, DEFAULT_CHAT_DIR};
pub use remote::RemoteStorage;

/// Stores chat documents by session id.
#[async_trait]
pub trait ChatStorage: Send + Sync {
    /// Creates or replaces the document for `id`.
    async fn save(&self, id: &str, document: &Value) -> GeminiResult<()>;

    /// The document for `id`, or `None` when there is none.
    async fn load(&self, id: &str) -> GeminiResult<Option<Value>>;

    /// Ids of every stored session.
    async fn list(&self) -> GeminiResult<Vec<String>>;

    /// Removes the document for `id`; missing ids are not an error.
    async fn delete(&self, id: &str) -> GeminiResult<()>;
}

/// Ids become file names and URL segments, so they must be a single
/// non-empty path component.
pub(crate) fn check_id(id: &str) -> GeminiResult<()> {
    let invalid = id.trim().is_empty()
        || id == "."
        || id == ".."
        || id.contains(['/', '\\', '?', '#'])
        || id.chars().any(char::is_control);
    if invalid {
        return Err(StorageError::InvalidId { id: id.to_string() }.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_id() {
        assert!(check_id("0f8a6c2e-session").is_ok());
        for bad in ["", " ", "..", "a/b", r"a\b", "x?y"] {
            assert!(check_id(bad).is_err(), "{bad:?} should be rejected");
        }
    }
}
