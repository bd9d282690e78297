use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Comma-separated list of field paths for partial updates (`updateMask`).
///
/// Paths are normalised to the API's lowerCamelCase spelling.
///
/// ```
/// use gemini_sdk::support::FieldMask;
///
/// let mask = FieldMask::new().add("ttl").add("expire_time");
/// assert_eq!(mask.to_string(), "ttl,expireTime");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldMask {
    paths: Vec<String>,
}

impl FieldMask {
    /// Empty mask.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a dotted path, converting each segment to lowerCamelCase.
    /// Duplicate paths are ignored.
    #[must_use]
    pub fn add(mut self, path: &str) -> Self {
        let normalized = path
            .split('.')
            .map(to_lower_camel)
            .collect::<Vec<_>>()
            .join(".");
        if !normalized.is_empty() && !self.paths.contains(&normalized) {
            self.paths.push(normalized);
        }
        self
    }

    /// Parses the comma-separated form.
    pub fn parse(text: &str) -> Self {
        text.split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .fold(Self::new(), FieldMask::add)
    }

    /// Normalised paths in insertion order.
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// True when no path was added.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

fn to_lower_camel(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut upper_next = false;
    for c in segment.chars() {
        if c == '_' {
            upper_next = !out.is_empty();
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

impl fmt::Display for FieldMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.paths.join(","))
    }
}

impl Serialize for FieldMask {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FieldMask {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(Self::parse(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_case_paths_become_camel_case() {
        let mask = FieldMask::new()
            .add("generation_config.max_output_tokens")
            .add("displayName");
        assert_eq!(
            mask.paths(),
            ["generationConfig.maxOutputTokens", "displayName"]
        );
    }

    #[test]
    fn test_parse_trims_and_dedupes() {
        let mask = FieldMask::parse(" ttl , expire_time,ttl,,");
        assert_eq!(mask.to_string(), "ttl,expireTime");
        assert_eq!(serde_json::to_string(&mask).unwrap(), r#""ttl,expireTime""#);
    }
}
