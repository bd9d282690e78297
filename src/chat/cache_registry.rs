//! Local alias book for cached contents.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::GeminiResult;
use crate::support::Timestamp;
use crate::types::CachedContent;

/// Registry file used when no path is given.
pub const DEFAULT_REGISTRY_PATH: &str = "gemini_caches.json";

/// What the registry remembers about one cache.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CachedItemInfo {
    /// `cachedContents/{id}`.
    pub id: String,
    /// Name the cache is registered under.
    pub alias: String,
    /// Model the cache was created for.
    pub model: String,
    /// RFC 3339 expiry, empty when unknown.
    pub expire_time: String,
}

/// Maps user-chosen aliases to cached content names, persisted as a JSON
/// object keyed by alias.
///
/// Every change is written through immediately. A missing or unreadable
/// file starts an empty registry.
#[derive(Debug, Clone)]
pub struct CacheRegistry {
    path: PathBuf,
    entries: BTreeMap<String, CachedItemInfo>,
}

impl Default for CacheRegistry {
    fn default() -> Self {
        Self::open(DEFAULT_REGISTRY_PATH)
    }
}

impl CacheRegistry {
    /// Loads the registry at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load(&path);
        Self { path, entries }
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remembers `content` under `alias`, replacing any previous entry.
    pub fn register(&mut self, alias: &str, content: &CachedContent) -> GeminiResult<()> {
        let info = CachedItemInfo {
            id: content
                .name
                .as_ref()
                .map(|name| name.as_str().to_string())
                .unwrap_or_default(),
            alias: alias.to_string(),
            model: content.model.clone(),
            expire_time: content
                .expire_time
                .as_ref()
                .map(Timestamp::to_rfc3339)
                .unwrap_or_default(),
        };
        self.entries.insert(alias.to_string(), info);
        self.save()
    }

    /// Cache name registered under `alias`.
    pub fn cache_id(&self, alias: &str) -> Option<&str> {
        self.entries.get(alias).map(|info| info.id.as_str())
    }

    /// Everything known about `alias`.
    pub fn cache_info(&self, alias: &str) -> Option<&CachedItemInfo> {
        self.entries.get(alias)
    }

    /// Forgets `alias`; the file is only rewritten when it was present.
    pub fn unregister(&mut self, alias: &str) -> GeminiResult<bool> {
        if self.entries.remove(alias).is_none() {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    /// Registered aliases, sorted.
    pub fn aliases(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Whether the cache behind `alias` has passed its expiry time. `None`
    /// for unknown aliases and for entries without a parseable expiry.
    pub fn is_expired(&self, alias: &str) -> Option<bool> {
        let info = self.entries.get(alias)?;
        Timestamp::parse(&info.expire_time)
            .ok()
            .map(|expiry| expiry.is_past())
    }

    fn save(&self) -> GeminiResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}

fn load(path: &Path) -> BTreeMap<String, CachedItemInfo> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "cache registry unreadable, starting fresh");
            return BTreeMap::new();
        }
    };
    serde_json::from_str(&text).unwrap_or_else(|err| {
        tracing::warn!(path = %path.display(), error = %err, "cache registry corrupt, starting fresh");
        BTreeMap::new()
    })
}
