use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Well-known Gemini model ids.
///
/// Parsing never fails: unknown ids fall back to [`Model::Gemini25Flash`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Model {
    /// `gemini-2.0-flash`
    Gemini20Flash,
    /// `gemini-2.0-flash-lite`
    Gemini20FlashLite,
    /// `gemini-2.5-flash`
    #[default]
    Gemini25Flash,
    /// `gemini-2.5-flash-image`
    Gemini25FlashImage,
    /// `gemini-2.5-flash-preview-tts`
    Gemini25FlashPreviewTts,
    /// `gemini-2.5-flash-lite`
    Gemini25FlashLite,
    /// `gemini-2.5-pro`
    Gemini25Pro,
    /// `gemini-2.5-pro-preview-tts`
    Gemini25ProPreviewTts,
    /// `gemini-3-pro-preview`
    Gemini3ProPreview,
    /// `gemini-3-pro-image-preview`
    Gemini3ProImagePreview,
    /// `gemini-flash-latest`
    GeminiFlashLatest,
    /// `gemini-pro-latest`
    GeminiProLatest,
}

impl Model {
    const ALL: [Model; 12] = [
        Model::Gemini20Flash,
        Model::Gemini20FlashLite,
        Model::Gemini25Flash,
        Model::Gemini25FlashImage,
        Model::Gemini25FlashPreviewTts,
        Model::Gemini25FlashLite,
        Model::Gemini25Pro,
        Model::Gemini25ProPreviewTts,
        Model::Gemini3ProPreview,
        Model::Gemini3ProImagePreview,
        Model::GeminiFlashLatest,
        Model::GeminiProLatest,
    ];

    /// Model id without the `models/` prefix.
    pub fn as_str(&self) -> &'static str {
        match self {
            Model::Gemini20Flash => "gemini-2.0-flash",
            Model::Gemini20FlashLite => "gemini-2.0-flash-lite",
            Model::Gemini25Flash => "gemini-2.5-flash",
            Model::Gemini25FlashImage => "gemini-2.5-flash-image",
            Model::Gemini25FlashPreviewTts => "gemini-2.5-flash-preview-tts",
            Model::Gemini25FlashLite => "gemini-2.5-flash-lite",
            Model::Gemini25Pro => "gemini-2.5-pro",
            Model::Gemini25ProPreviewTts => "gemini-2.5-pro-preview-tts",
            Model::Gemini3ProPreview => "gemini-3-pro-preview",
            Model::Gemini3ProImagePreview => "gemini-3-pro-image-preview",
            Model::GeminiFlashLatest => "gemini-flash-latest",
            Model::GeminiProLatest => "gemini-pro-latest",
        }
    }

    /// Every known model.
    pub fn all() -> impl Iterator<Item = Model> {
        Self::ALL.into_iter()
    }
}

impl FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim().trim_start_matches("models/");
        Ok(Self::ALL
            .into_iter()
            .find(|m| m.as_str() == id)
            .unwrap_or_default())
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for Model {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Serialize for Model {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        match text.parse::<Model>() {
            Ok(model) => Ok(model),
            Err(never) => match never {},
        }
    }
}

/// Set of API methods a model supports, as reported in `supportedGenerationMethods`.
///
/// ```
/// use gemini_sdk::support::GenerationMethod;
///
/// let methods = GenerationMethod::from_names(["generateContent", "countTokens", "bogus"]);
/// assert!(methods.contains(GenerationMethod::GENERATE_CONTENT));
/// assert!(!methods.contains(GenerationMethod::EMBED_CONTENT));
/// assert_eq!(methods.to_string(), "[countTokens, generateContent]");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GenerationMethod(u32);

impl GenerationMethod {
    /// Empty set.
    pub const NONE: Self = Self(0);
    /// `unspecified`
    pub const UNSPECIFIED: Self = Self(1 << 0);
    /// `asyncBatchEmbedContent`
    pub const ASYNC_BATCH_EMBED_CONTENT: Self = Self(1 << 1);
    /// `batchEmbedContents`
    pub const BATCH_EMBED_CONTENTS: Self = Self(1 << 2);
    /// `batchEmbedText`
    pub const BATCH_EMBED_TEXT: Self = Self(1 << 3);
    /// `batchGenerateContent`
    pub const BATCH_GENERATE_CONTENT: Self = Self(1 << 4);
    /// `countMessageTokens`
    pub const COUNT_MESSAGE_TOKENS: Self = Self(1 << 5);
    /// `countTextTokens`
    pub const COUNT_TEXT_TOKENS: Self = Self(1 << 6);
    /// `countTokens`
    pub const COUNT_TOKENS: Self = Self(1 << 7);
    /// `embedContent`
    pub const EMBED_CONTENT: Self = Self(1 << 8);
    /// `embedText`
    pub const EMBED_TEXT: Self = Self(1 << 9);
    /// `generateContent`
    pub const GENERATE_CONTENT: Self = Self(1 << 10);
    /// `generateMessage`
    pub const GENERATE_MESSAGE: Self = Self(1 << 11);
    /// `generateText`
    pub const GENERATE_TEXT: Self = Self(1 << 12);
    /// `get`
    pub const GET: Self = Self(1 << 13);
    /// `list`
    pub const LIST: Self = Self(1 << 14);
    /// `predict`
    pub const PREDICT: Self = Self(1 << 15);
    /// `predictLongRunning`
    pub const PREDICT_LONG_RUNNING: Self = Self(1 << 16);
    /// `streamGenerateContent`
    pub const STREAM_GENERATE_CONTENT: Self = Self(1 << 17);

    // Order matches the bit positions so Display is stable.
    const NAMED: [(Self, &'static str); 18] = [
        (Self::UNSPECIFIED, "unspecified"),
        (Self::ASYNC_BATCH_EMBED_CONTENT, "asyncBatchEmbedContent"),
        (Self::BATCH_EMBED_CONTENTS, "batchEmbedContents"),
        (Self::BATCH_EMBED_TEXT, "batchEmbedText"),
        (Self::BATCH_GENERATE_CONTENT, "batchGenerateContent"),
        (Self::COUNT_MESSAGE_TOKENS, "countMessageTokens"),
        (Self::COUNT_TEXT_TOKENS, "countTextTokens"),
        (Self::COUNT_TOKENS, "countTokens"),
        (Self::EMBED_CONTENT, "embedContent"),
        (Self::EMBED_TEXT, "embedText"),
        (Self::GENERATE_CONTENT, "generateContent"),
        (Self::GENERATE_MESSAGE, "generateMessage"),
        (Self::GENERATE_TEXT, "generateText"),
        (Self::GET, "get"),
        (Self::LIST, "list"),
        (Self::PREDICT, "predict"),
        (Self::PREDICT_LONG_RUNNING, "predictLongRunning"),
        (Self::STREAM_GENERATE_CONTENT, "streamGenerateContent"),
    ];

    /// Single flag for an API method name. `asyncBatchEmbedContents` is accepted as an alias.
    pub fn from_name(name: &str) -> Option<Self> {
        if name == "asyncBatchEmbedContents" {
            return Some(Self::ASYNC_BATCH_EMBED_CONTENT);
        }
        Self::NAMED
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(flag, _)| *flag)
    }

    /// Union of all recognised names; unknown names are ignored.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .filter_map(|n| Self::from_name(n.as_ref()))
            .fold(Self::NONE, |acc, flag| acc | flag)
    }

    /// True if every flag in `other` is set.
    pub fn contains(self, other: Self) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    /// True for the empty set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Raw bits.
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Names of the set flags in bit order.
    pub fn names(self) -> Vec<&'static str> {
        Self::NAMED
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }
}

impl BitOr for GenerationMethod {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for GenerationMethod {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for GenerationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.names().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_parse_falls_back() {
        assert_eq!("gemini-2.5-pro".parse::<Model>().unwrap(), Model::Gemini25Pro);
        assert_eq!("models/gemini-2.0-flash".parse::<Model>().unwrap(), Model::Gemini20Flash);
        assert_eq!("gpt-4".parse::<Model>().unwrap(), Model::Gemini25Flash);
    }

    #[test]
    fn test_model_ids_are_unique() {
        let mut ids: Vec<_> = Model::all().map(|m| m.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 12);
    }

    #[test]
    fn test_generation_method_empty_display() {
        assert_eq!(GenerationMethod::NONE.to_string(), "[]");
        assert!(!GenerationMethod::NONE.contains(GenerationMethod::NONE));
    }

    #[test]
    fn test_generation_method_alias() {
        let methods = GenerationMethod::from_names(["asyncBatchEmbedContents"]);
        assert_eq!(methods, GenerationMethod::ASYNC_BATCH_EMBED_CONTENT);

        let mut set = GenerationMethod::GET;
        set |= GenerationMethod::LIST;
        assert_eq!(set.names(), vec!["get", "list"]);
    }
}
