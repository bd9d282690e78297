use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GeminiError;

/// Random v4 UUID, serialized as its hyphenated string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Uuid(uuid::Uuid);

impl Uuid {
    /// Generates a new random UUID.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Parses the hyphenated or simple form.
    pub fn parse(text: &str) -> Result<Self, GeminiError> {
        uuid::Uuid::parse_str(text)
            .map(Self)
            .map_err(|e| super::invalid_value("uuid", e.to_string()))
    }

    /// Short form without hyphens.
    pub fn simple(&self) -> String {
        self.0.simple().to_string()
    }
}

impl Default for Uuid {
    fn default() -> Self {
        Self::generate()
    }
}

impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

impl FromStr for Uuid {
    type Err = GeminiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Collections addressable by resource name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    /// `models/`
    Models,
    /// `files/`
    Files,
    /// `operations/`
    Operations,
    /// `cachedContents/`
    CachedContents,
    /// `batches/`
    Batches,
    /// `fileSearchStores/`
    FileSearchStores,
}

impl ResourceType {
    const ALL: [ResourceType; 6] = [
        ResourceType::Models,
        ResourceType::Files,
        ResourceType::Operations,
        ResourceType::CachedContents,
        ResourceType::Batches,
        ResourceType::FileSearchStores,
    ];

    /// Collection prefix including the trailing slash.
    pub fn prefix(self) -> &'static str {
        match self {
            ResourceType::Models => "models/",
            ResourceType::Files => "files/",
            ResourceType::Operations => "operations/",
            ResourceType::CachedContents => "cachedContents/",
            ResourceType::Batches => "batches/",
            ResourceType::FileSearchStores => "fileSearchStores/",
        }
    }

    /// Detects the collection from a full resource name.
    pub fn of(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| name.starts_with(t.prefix()))
    }
}

/// Structured identifier such as `files/abc-123` or `cachedContents/xyz`.
///
/// ```
/// use gemini_sdk::support::{ResourceName, ResourceType};
///
/// let name = ResourceName::new(ResourceType::Files, "abc-123");
/// assert_eq!(name.as_str(), "files/abc-123");
/// assert_eq!(name.id(), "abc-123");
///
/// // Already-qualified ids are not prefixed twice.
/// let same = ResourceName::new(ResourceType::Files, "files/abc-123");
/// assert_eq!(name, same);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceName(String);

impl ResourceName {
    /// Qualifies `id` with the collection prefix unless it already carries it.
    pub fn new(kind: ResourceType, id: &str) -> Self {
        if id.starts_with(kind.prefix()) {
            Self(id.to_string())
        } else {
            Self(format!("{}{}", kind.prefix(), id))
        }
    }

    /// Wraps a full name as-is.
    pub fn parse(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Collection this name belongs to, if recognised.
    pub fn resource_type(&self) -> Option<ResourceType> {
        ResourceType::of(&self.0)
    }

    /// Id without the collection prefix.
    pub fn id(&self) -> &str {
        match self.resource_type() {
            Some(kind) => &self.0[kind.prefix().len()..],
            None => &self.0,
        }
    }

    /// Full name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the empty name.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceName {
    fn from(name: &str) -> Self {
        Self::parse(name)
    }
}

impl From<String> for ResourceName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for ResourceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_roundtrips_through_text() {
        let id = Uuid::generate();
        let parsed: Uuid = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
        assert_eq!(id.simple().len(), 32);
        assert!(Uuid::parse("not-a-uuid").is_err());
    }

    #[test]
    fn test_resource_name_detects_type() {
        let name = ResourceName::parse("cachedContents/abc");
        assert_eq!(name.resource_type(), Some(ResourceType::CachedContents));
        assert_eq!(name.id(), "abc");

        let bare = ResourceName::parse("whatever");
        assert_eq!(bare.resource_type(), None);
        assert_eq!(bare.id(), "whatever");
    }

    #[test]
    fn test_resource_name_serializes_as_string() {
        let name = ResourceName::new(ResourceType::Batches, "b1");
        assert_eq!(serde_json::to_string(&name).unwrap(), r#""batches/b1""#);
    }
}
