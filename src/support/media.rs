use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::GeminiError;

macro_rules! string_enum_serde {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Output aspect ratio for image generation.
///
/// Unknown ratios parse to [`AspectRatio::Unset`], which serializes as `""`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AspectRatio {
    /// No ratio requested.
    #[default]
    Unset,
    /// `1:1`
    Square,
    /// `2:3`
    Portrait2x3,
    /// `3:2`
    Landscape3x2,
    /// `3:4`
    Portrait3x4,
    /// `4:3`
    Landscape4x3,
    /// `4:5`
    Portrait4x5,
    /// `5:4`
    Landscape5x4,
    /// `9:16`
    Portrait9x16,
    /// `16:9`
    Landscape16x9,
    /// `21:9`
    Ultrawide21x9,
}

impl AspectRatio {
    const ALL: [AspectRatio; 10] = [
        AspectRatio::Square,
        AspectRatio::Portrait2x3,
        AspectRatio::Landscape3x2,
        AspectRatio::Portrait3x4,
        AspectRatio::Landscape4x3,
        AspectRatio::Portrait4x5,
        AspectRatio::Landscape5x4,
        AspectRatio::Portrait9x16,
        AspectRatio::Landscape16x9,
        AspectRatio::Ultrawide21x9,
    ];

    /// Wire form, e.g. `16:9`.
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Unset => "",
            AspectRatio::Square => "1:1",
            AspectRatio::Portrait2x3 => "2:3",
            AspectRatio::Landscape3x2 => "3:2",
            AspectRatio::Portrait3x4 => "3:4",
            AspectRatio::Landscape4x3 => "4:3",
            AspectRatio::Portrait4x5 => "4:5",
            AspectRatio::Landscape5x4 => "5:4",
            AspectRatio::Portrait9x16 => "9:16",
            AspectRatio::Landscape16x9 => "16:9",
            AspectRatio::Ultrawide21x9 => "21:9",
        }
    }

    /// Parses the wire form; anything unrecognised is [`AspectRatio::Unset`].
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == text)
            .unwrap_or_default()
    }

    /// True for [`AspectRatio::Unset`].
    pub fn is_unset(&self) -> bool {
        *self == AspectRatio::Unset
    }
}

string_enum_serde!(AspectRatio);

impl<'de> Deserialize<'de> for AspectRatio {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::parse(&String::deserialize(deserializer)?))
    }
}

/// Output resolution for image generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageSize {
    /// `1K`
    #[default]
    OneK,
    /// `2K`
    TwoK,
    /// `4K`
    FourK,
}

impl ImageSize {
    /// Wire form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::OneK => "1K",
            ImageSize::TwoK => "2K",
            ImageSize::FourK => "4K",
        }
    }

    /// Parses case-insensitively; unknown sizes fall back to `1K`.
    pub fn parse(text: &str) -> Self {
        match text.trim().to_ascii_uppercase().as_str() {
            "2K" => ImageSize::TwoK,
            "4K" => ImageSize::FourK,
            _ => ImageSize::OneK,
        }
    }
}

string_enum_serde!(ImageSize);

impl<'de> Deserialize<'de> for ImageSize {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::parse(&String::deserialize(deserializer)?))
    }
}

const LANGUAGE_CODES: [&str; 30] = [
    "de-DE", "en-AU", "en-GB", "en-IN", "en-US", "es-US", "fr-FR", "hi-IN", "pt-BR", "ar-XA",
    "es-ES", "fr-CA", "id-ID", "it-IT", "ja-JP", "tr-TR", "vi-VN", "bn-IN", "gu-IN", "kn-IN",
    "ml-IN", "mr-IN", "ta-IN", "te-IN", "nl-NL", "ko-KR", "cmn-CN", "pl-PL", "ru-RU", "th-TH",
];

/// BCP-47 language code accepted by speech generation.
///
/// Parsing is case-insensitive and yields the canonical spelling.
///
/// ```
/// use gemini_sdk::support::LanguageCode;
///
/// let code: LanguageCode = "EN-gb".parse().unwrap();
/// assert_eq!(code.as_str(), "en-GB");
/// assert_eq!(LanguageCode::default().as_str(), "en-US");
/// assert!("xx-XX".parse::<LanguageCode>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LanguageCode(&'static str);

impl LanguageCode {
    /// Every supported code.
    pub fn all() -> impl Iterator<Item = LanguageCode> {
        LANGUAGE_CODES.into_iter().map(LanguageCode)
    }

    /// Canonical spelling.
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl Default for LanguageCode {
    fn default() -> Self {
        Self("en-US")
    }
}

impl FromStr for LanguageCode {
    type Err = GeminiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::all()
            .find(|code| code.0.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| super::invalid_value("languageCode", format!("unsupported language code '{wanted}'")))
    }
}

string_enum_serde!(LanguageCode);

impl<'de> Deserialize<'de> for LanguageCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer)?
            .parse()
            .map_err(serde::de::Error::custom)
    }
}

/// Guesses a MIME type from a file extension. Unknown extensions are treated as JPEG.
pub fn mime_type_for_path(path: &Path) -> String {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let mime = match extension.as_str() {
        "png" => mime::IMAGE_PNG.essence_str(),
        "gif" => mime::IMAGE_GIF.essence_str(),
        "webp" => "image/webp",
        "heic" => "image/heic",
        "pdf" => mime::APPLICATION_PDF.essence_str(),
        "txt" => mime::TEXT_PLAIN.essence_str(),
        "json" => mime::APPLICATION_JSON.essence_str(),
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "mp4" => "video/mp4",
        _ => mime::IMAGE_JPEG.essence_str(),
    };
    mime.to_string()
}

/// File extension (with the dot) for a MIME type; `.bin` when unknown.
pub fn extension_for_mime_type(mime_type: &str) -> &'static str {
    let essence = mime_type
        .parse::<mime::Mime>()
        .map(|m| m.essence_str().to_ascii_lowercase())
        .unwrap_or_default();
    match essence.as_str() {
        "image/png" => ".png",
        "image/jpeg" => ".jpg",
        "image/webp" => ".webp",
        "image/gif" => ".gif",
        "audio/wav" | "audio/x-wav" => ".wav",
        "audio/mpeg" => ".mp3",
        "audio/l16" | "audio/pcm" => ".pcm",
        "video/mp4" => ".mp4",
        "application/pdf" => ".pdf",
        "application/json" => ".json",
        "text/plain" => ".txt",
        _ => ".bin",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_guessing() {
        assert_eq!(mime_type_for_path(Path::new("a/b/photo.JPG")), "image/jpeg");
        assert_eq!(mime_type_for_path(Path::new("doc.pdf")), "application/pdf");
        assert_eq!(mime_type_for_path(Path::new("noext")), "image/jpeg");
        assert_eq!(extension_for_mime_type("image/png"), ".png");
        assert_eq!(extension_for_mime_type("audio/L16;codec=pcm;rate=24000"), ".pcm");
        assert_eq!(extension_for_mime_type("weird"), ".bin");
    }

    #[test]
    fn test_aspect_ratio_unknown_is_unset() {
        assert_eq!(AspectRatio::parse("16:9"), AspectRatio::Landscape16x9);
        let unknown = AspectRatio::parse("7:5");
        assert!(unknown.is_unset());
        assert_eq!(serde_json::to_string(&unknown).unwrap(), r#""""#);
    }

    #[test]
    fn test_image_size_defaults_to_1k() {
        assert_eq!(ImageSize::parse("4k"), ImageSize::FourK);
        assert_eq!(ImageSize::parse("8K"), ImageSize::OneK);
        assert_eq!(ImageSize::default().to_string(), "1K");
    }

    #[test]
    fn test_language_codes_are_unique() {
        let mut codes: Vec<_> = LanguageCode::all().map(|c| c.as_str()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), 30);
    }

    #[test]
    fn test_language_code_serde() {
        let code: LanguageCode = serde_json::from_str(r#""cmn-cn""#).unwrap();
        assert_eq!(serde_json::to_string(&code).unwrap(), r#""cmn-CN""#);
        assert!(serde_json::from_str::<LanguageCode>(r#""klingon""#).is_err());
    }
}
