//! `generateContent` request/response types and generation settings.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::content::{Blob, Content, FunctionCall};
use super::grounding::{GroundingAttribution, GroundingMetadata, UrlContextMetadata};
use super::safety::{SafetyRating, SafetySetting};
use super::tools::{Tool, ToolConfig};
use crate::support::{AspectRatio, ImageSize, LanguageCode, ResourceName};

/// Sampling and output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Sequences that stop generation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop_sequences: Vec<String>,
    /// Output MIME type, e.g. `application/json`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    /// OpenAPI-subset schema for structured output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Value>,
    /// Full JSON Schema for structured output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_json_schema: Option<Value>,
    /// Requested output modalities.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub response_modalities: Vec<Modality>,
    /// Number of candidates to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_count: Option<i32>,
    /// Output token cap.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<i32>,
    /// Sampling temperature, `0.0..=2.0`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Nucleus sampling mass, `0.0..=1.0`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    /// Top-k sampling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<i32>,
    /// Decoding seed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i32>,
    /// Penalty for tokens already present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f32>,
    /// Penalty proportional to token frequency.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f32>,
    /// Return log probabilities of chosen tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_logprobs: Option<bool>,
    /// Number of top alternatives per step when logprobs are requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logprobs: Option<i32>,
    /// Enables enhanced civic answers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_enhanced_civic_answers: Option<bool>,
    /// Text-to-speech settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speech_config: Option<SpeechConfig>,
    /// Reasoning settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking_config: Option<ThinkingConfig>,
    /// Image output settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_config: Option<ImageConfig>,
    /// Input media resolution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_resolution: Option<MediaResolution>,
}

/// Voice output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SpeechConfig {
    /// Single-speaker voice.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_config: Option<VoiceConfig>,
    /// Multi-speaker voices.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi_speaker_voice_config: Option<MultiSpeakerVoiceConfig>,
    /// Spoken language.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_code: Option<LanguageCode>,
}

impl SpeechConfig {
    /// Single prebuilt voice, e.g. `Kore`.
    pub fn voice(name: impl Into<String>) -> Self {
        Self {
            voice_config: Some(VoiceConfig::prebuilt(name)),
            ..Self::default()
        }
    }
}

/// Voice selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct VoiceConfig {
    /// Prebuilt voice.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prebuilt_voice_config: Option<PrebuiltVoiceConfig>,
}

impl VoiceConfig {
    /// Prebuilt voice by name.
    pub fn prebuilt(name: impl Into<String>) -> Self {
        Self {
            prebuilt_voice_config: Some(PrebuiltVoiceConfig {
                voice_name: name.into(),
            }),
        }
    }
}

/// Named prebuilt voice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PrebuiltVoiceConfig {
    /// Voice name.
    pub voice_name: String,
}

/// Voices for a multi-speaker dialogue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MultiSpeakerVoiceConfig {
    /// One entry per speaker.
    #[serde(default)]
    pub speaker_voice_configs: Vec<SpeakerVoiceConfig>,
}

/// Voice for one named speaker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SpeakerVoiceConfig {
    /// Speaker name as used in the prompt.
    pub speaker: String,
    /// Voice for that speaker.
    pub voice_config: VoiceConfig,
}

/// Reasoning settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ThinkingConfig {
    /// Return thought summaries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_thoughts: Option<bool>,
    /// Token budget; `0` disables thinking, `-1` is dynamic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking_budget: Option<i32>,
    /// Qualitative level for models that take one instead of a budget.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking_level: Option<ThinkingLevel>,
}

/// Qualitative reasoning effort.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThinkingLevel {
    /// Unset.
    ThinkingLevelUnspecified,
    /// Minimal.
    Minimal,
    /// Low.
    Low,
    /// Medium.
    Medium,
    /// High.
    High,
}

/// Image output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    /// Aspect ratio.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<AspectRatio>,
    /// Resolution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_size: Option<ImageSize>,
}

/// Content modality.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Modality {
    /// Unset.
    ModalityUnspecified,
    /// Text.
    Text,
    /// Image.
    Image,
    /// Audio.
    Audio,
    /// Video.
    Video,
    /// Document, e.g. PDF.
    Document,
}

/// Token spend per input image/video frame.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaResolution {
    /// Unset.
    MediaResolutionUnspecified,
    /// 64 tokens.
    MediaResolutionLow,
    /// 256 tokens.
    MediaResolutionMedium,
    /// Zoomed reframing with 256 tokens.
    MediaResolutionHigh,
}

/// Body of `models/{model}:generateContent` and `:streamGenerateContent`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Target model; only sent inside batch and token-count requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<ResourceName>,
    /// Conversation so far.
    pub contents: Vec<Content>,
    /// Tools the model may call.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,
    /// Tool usage settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_config: Option<ToolConfig>,
    /// Per-category block thresholds.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub safety_settings: Vec<SafetySetting>,
    /// System instruction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    /// Sampling settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
    /// Cached context, `cachedContents/{id}`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached_content: Option<ResourceName>,
}

impl GenerateContentRequest {
    /// Request holding `contents` and nothing else.
    pub fn new(contents: Vec<Content>) -> Self {
        Self {
            contents,
            ..Self::default()
        }
    }

    /// Single user text turn.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(vec![Content::user_text(text)])
    }
}

/// Reason generation stopped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinishReason {
    /// Unset.
    FinishReasonUnspecified,
    /// Natural stop or stop sequence.
    Stop,
    /// Output token cap reached.
    MaxTokens,
    /// Safety filter.
    Safety,
    /// Recitation filter.
    Recitation,
    /// Unsupported language.
    Language,
    /// Blocklisted terms.
    Blocklist,
    /// Prohibited content.
    ProhibitedContent,
    /// Sensitive personal data.
    Spii,
    /// Malformed function call.
    MalformedFunctionCall,
    /// Image safety filter.
    ImageSafety,
    /// Unexpected tool call.
    UnexpectedToolCall,
    /// Too many tool calls.
    TooManyToolCalls,
    /// Any other or future reason.
    #[serde(other)]
    Other,
}

/// Reason the prompt itself was rejected.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockReason {
    /// Unset.
    BlockReasonUnspecified,
    /// Safety filter.
    Safety,
    /// Blocklisted terms.
    Blocklist,
    /// Prohibited content.
    ProhibitedContent,
    /// Unsafe image input.
    ImageSafety,
    /// Any other or future reason.
    #[serde(other)]
    Other,
}

/// Safety verdict on the prompt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Set when the prompt was blocked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<BlockReason>,
    /// Ratings per harm category.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub safety_ratings: Vec<SafetyRating>,
}

/// Token accounting for a request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    /// Prompt tokens, including cached ones.
    #[serde(default)]
    pub prompt_token_count: i32,
    /// Tokens served from the cache.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached_content_token_count: Option<i32>,
    /// Generated tokens across candidates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidates_token_count: Option<i32>,
    /// Tokens in tool-use prompts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_use_prompt_token_count: Option<i32>,
    /// Reasoning tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thoughts_token_count: Option<i32>,
    /// Grand total.
    #[serde(default)]
    pub total_token_count: i32,
    /// Prompt tokens per modality.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prompt_tokens_details: Vec<ModalityTokenCount>,
    /// Cached tokens per modality.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cache_tokens_details: Vec<ModalityTokenCount>,
    /// Output tokens per modality.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub candidates_tokens_details: Vec<ModalityTokenCount>,
}

/// Token count for one modality.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ModalityTokenCount {
    /// Modality.
    pub modality: Modality,
    /// Tokens.
    #[serde(default)]
    pub token_count: i32,
}

/// Sources quoted by a candidate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CitationMetadata {
    /// Citations.
    #[serde(default)]
    pub citation_sources: Vec<CitationSource>,
}

/// A quoted span and its origin.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CitationSource {
    /// Span start in the output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_index: Option<i32>,
    /// Span end in the output (exclusive).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_index: Option<i32>,
    /// Origin URI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Origin license.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
}

/// Per-token log probabilities.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct LogprobsResult {
    /// Alternatives at each step.
    #[serde(default)]
    pub top_candidates: Vec<TopCandidates>,
    /// Token chosen at each step.
    #[serde(default)]
    pub chosen_candidates: Vec<LogprobsCandidate>,
}

/// Alternatives at one decoding step, by descending probability.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TopCandidates {
    /// Alternatives.
    #[serde(default)]
    pub candidates: Vec<LogprobsCandidate>,
}

/// A token and its log probability.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LogprobsCandidate {
    /// Token text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Token id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_id: Option<i32>,
    /// Log probability.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_probability: Option<f64>,
}

/// One generated answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content; absent when blocked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    /// Why generation stopped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,
    /// Explanation accompanying `finish_reason`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_message: Option<String>,
    /// Ratings per harm category.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub safety_ratings: Vec<SafetyRating>,
    /// Quoted sources.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub citation_metadata: Option<CitationMetadata>,
    /// Search/Maps grounding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grounding_metadata: Option<GroundingMetadata>,
    /// Attributions for grounded question answering.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub grounding_attributions: Vec<GroundingAttribution>,
    /// URL context retrieval results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_context_metadata: Option<UrlContextMetadata>,
    /// Tokens in this candidate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_count: Option<i32>,
    /// Mean log probability.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_logprobs: Option<f64>,
    /// Per-token log probabilities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logprobs_result: Option<LogprobsResult>,
    /// Position among candidates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<i32>,
}

/// Response of `generateContent`, and each element of a stream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Candidates; empty when the prompt was blocked.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub candidates: Vec<Candidate>,
    /// Prompt safety verdict.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<PromptFeedback>,
    /// Token accounting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<UsageMetadata>,
    /// Exact model version used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
    /// Response id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_id: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, thoughts excluded.
    pub fn text(&self) -> String {
        self.first_content().map(Content::text).unwrap_or_default()
    }

    /// Content of the first candidate.
    pub fn first_content(&self) -> Option<&Content> {
        self.candidates.first().and_then(|c| c.content.as_ref())
    }

    /// Function calls of the first candidate.
    pub fn function_calls(&self) -> Vec<&FunctionCall> {
        self.first_content()
            .map(Content::function_calls)
            .unwrap_or_default()
    }

    /// Inline blobs of the first candidate.
    pub fn inline_blobs(&self) -> Vec<&Blob> {
        self.first_content()
            .map(Content::inline_blobs)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_generation_config_omits_unset_fields() {
        let config = GenerationConfig {
            temperature: Some(0.5),
            thinking_config: Some(ThinkingConfig {
                thinking_budget: Some(1024),
                ..ThinkingConfig::default()
            }),
            image_config: Some(ImageConfig {
                aspect_ratio: Some(AspectRatio::Landscape16x9),
                image_size: None,
            }),
            ..GenerationConfig::default()
        };
        assert_eq!(
            serde_json::to_value(&config).unwrap(),
            json!({
                "temperature": 0.5,
                "thinkingConfig": {"thinkingBudget": 1024},
                "imageConfig": {"aspectRatio": "16:9"}
            })
        );
    }

    #[test]
    fn test_unknown_finish_reason_maps_to_other() {
        let candidate: Candidate =
            serde_json::from_value(json!({"finishReason": "SOMETHING_NEW"})).unwrap();
        assert_eq!(candidate.finish_reason, Some(FinishReason::Other));
        assert!(candidate.content.is_none());
    }

    #[test]
    fn test_response_text_uses_first_candidate() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "a"}, {"text": "b"}]}},
                {"content": {"role": "model", "parts": [{"text": "ignored"}]}}
            ],
            "usageMetadata": {"promptTokenCount": 3, "candidatesTokenCount": 2, "totalTokenCount": 5}
        }))
        .unwrap();
        assert_eq!(response.text(), "ab");
        assert_eq!(response.usage_metadata.unwrap().total_token_count, 5);
    }

    #[test]
    fn test_speech_config_shape() {
        let speech = SpeechConfig::voice("Kore");
        assert_eq!(
            serde_json::to_value(&speech).unwrap(),
            json!({"voiceConfig": {"prebuiltVoiceConfig": {"voiceName": "Kore"}}})
        );
    }
}
