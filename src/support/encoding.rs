use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::error::GeminiResult;

/// Standard-alphabet base64 text, as used for inline media and hashes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Base64String(String);

impl Base64String {
    /// Encodes raw bytes.
    pub fn encode(bytes: impl AsRef<[u8]>) -> Self {
        Self(STANDARD.encode(bytes))
    }

    /// Wraps already-encoded text after checking that it decodes.
    pub fn from_base64(encoded: impl Into<String>) -> GeminiResult<Self> {
        let encoded = encoded.into();
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(|e| super::invalid_value("base64", e.to_string()))?;
        Ok(Self(encoded))
    }

    /// Decodes to bytes.
    pub fn decode(&self) -> GeminiResult<Vec<u8>> {
        STANDARD
            .decode(self.0.as_bytes())
            .map_err(|e| super::invalid_value("base64", e.to_string()))
    }

    /// Decodes to UTF-8 text.
    pub fn decode_to_string(&self) -> GeminiResult<String> {
        String::from_utf8(self.decode()?).map_err(|e| super::invalid_value("base64", e.to_string()))
    }

    /// The encoded text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when nothing is encoded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Base64String {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
