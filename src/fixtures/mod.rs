//! Recorded API payloads for tests.
//!
//! Fixtures live next to this module under `src/fixtures/`, grouped by API
//! surface (`content/`, `models/`, `files/`, `batches/`, `cached_content/`,
//! `errors/`).

use std::path::PathBuf;

use serde::de::DeserializeOwned;

use crate::types::GenerateContentResponse;

/// Get the path to a fixture file.
pub fn fixture_path(relative_path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("src")
        .join("fixtures")
        .join(relative_path)
}

/// Load a fixture file as a string.
///
/// # Panics
///
/// When the file is missing; fixtures are test inputs.
pub fn load_fixture(relative_path: &str) -> String {
    std::fs::read_to_string(fixture_path(relative_path))
        .unwrap_or_else(|e| panic!("Failed to load fixture {relative_path}: {e}"))
}

/// Load a JSON fixture and parse it.
///
/// # Panics
///
/// When the file is missing or does not parse as `T`.
pub fn load_json_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let content = load_fixture(relative_path);
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse JSON fixture {relative_path}: {e}"))
}

/// A plain text answer with usage metadata.
pub fn success_response() -> GenerateContentResponse {
    load_json_fixture("content/success_response.json")
}

/// A prompt blocked for safety.
pub fn safety_blocked_response() -> GenerateContentResponse {
    load_json_fixture("content/safety_blocked.json")
}

/// A reply calling `get_weather`.
pub fn function_call_response() -> GenerateContentResponse {
    load_json_fixture("content/function_call.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_path() {
        let path = fixture_path("content/success_response.json");
        assert!(path.to_string_lossy().contains("fixtures"));
        assert!(path.exists());
    }

    #[test]
    fn test_load_json_fixture() {
        let json: serde_json::Value = load_json_fixture("content/success_response.json");
        assert!(json.get("candidates").is_some());
        assert!(json.get("usageMetadata").is_some());
    }

    #[test]
    fn test_typed_fixtures_parse() {
        assert!(!success_response().text().is_empty());
        assert!(safety_blocked_response().candidates.is_empty());
        assert_eq!(function_call_response().function_calls()[0].name, "get_weather");
    }
}
