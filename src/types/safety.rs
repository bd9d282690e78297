//! Harm categories, block thresholds and safety ratings.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Block threshold for one harm category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SafetySetting {
    /// Category.
    pub category: HarmCategory,
    /// Threshold.
    pub threshold: HarmBlockThreshold,
}

impl SafetySetting {
    /// Pairs a category with a threshold.
    pub fn new(category: HarmCategory, threshold: HarmBlockThreshold) -> Self {
        Self {
            category,
            threshold,
        }
    }
}

/// Harm category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmCategory {
    /// `HARM_CATEGORY_UNSPECIFIED`
    HarmCategoryUnspecified,
    /// `HARM_CATEGORY_HARASSMENT`
    HarmCategoryHarassment,
    /// `HARM_CATEGORY_HATE_SPEECH`
    HarmCategoryHateSpeech,
    /// `HARM_CATEGORY_SEXUALLY_EXPLICIT`
    HarmCategorySexuallyExplicit,
    /// `HARM_CATEGORY_DANGEROUS_CONTENT`
    HarmCategoryDangerousContent,
    /// `HARM_CATEGORY_CIVIC_INTEGRITY`
    HarmCategoryCivicIntegrity,
    /// Any other or legacy category.
    #[serde(other)]
    Other,
}

/// Probability at or above which content is blocked.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    /// Default threshold.
    HarmBlockThresholdUnspecified,
    /// Block low and above.
    BlockLowAndAbove,
    /// Block medium and above.
    BlockMediumAndAbove,
    /// Block high only.
    BlockOnlyHigh,
    /// Never block, still rate.
    BlockNone,
    /// Filter disabled.
    Off,
}

/// Assessed probability of harm.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmProbability {
    /// Unset.
    HarmProbabilityUnspecified,
    /// Negligible.
    Negligible,
    /// Low.
    Low,
    /// Medium.
    Medium,
    /// High.
    High,
}

/// Rating for one category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SafetyRating {
    /// Category.
    pub category: HarmCategory,
    /// Probability.
    pub probability: HarmProbability,
    /// True if this rating caused a block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked: Option<bool>,
}

impl fmt::Display for HarmCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HarmCategory::HarmCategoryUnspecified => "HARM_CATEGORY_UNSPECIFIED",
            HarmCategory::HarmCategoryHarassment => "HARM_CATEGORY_HARASSMENT",
            HarmCategory::HarmCategoryHateSpeech => "HARM_CATEGORY_HATE_SPEECH",
            HarmCategory::HarmCategorySexuallyExplicit => "HARM_CATEGORY_SEXUALLY_EXPLICIT",
            HarmCategory::HarmCategoryDangerousContent => "HARM_CATEGORY_DANGEROUS_CONTENT",
            HarmCategory::HarmCategoryCivicIntegrity => "HARM_CATEGORY_CIVIC_INTEGRITY",
            HarmCategory::Other => "OTHER",
        };
        f.write_str(name)
    }
}

impl fmt::Display for HarmProbability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HarmProbability::HarmProbabilityUnspecified => "HARM_PROBABILITY_UNSPECIFIED",
            HarmProbability::Negligible => "NEGLIGIBLE",
            HarmProbability::Low => "LOW",
            HarmProbability::Medium => "MEDIUM",
            HarmProbability::High => "HIGH",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_setting_wire_names() {
        let setting = SafetySetting::new(
            HarmCategory::HarmCategoryDangerousContent,
            HarmBlockThreshold::BlockOnlyHigh,
        );
        assert_eq!(
            serde_json::to_value(setting).unwrap(),
            json!({"category": "HARM_CATEGORY_DANGEROUS_CONTENT", "threshold": "BLOCK_ONLY_HIGH"})
        );
    }

    #[test]
    fn test_legacy_category_is_tolerated() {
        let rating: SafetyRating = serde_json::from_value(json!({
            "category": "HARM_CATEGORY_DEROGATORY", "probability": "LOW"
        }))
        .unwrap();
        assert_eq!(rating.category, HarmCategory::Other);
        assert!(rating.probability > HarmProbability::Negligible);
    }
}
