//! Grounding metadata returned with Google Search, Google Maps and URL context.

use serde::{Deserialize, Serialize};

use super::content::Content;
use crate::support::Base64String;

/// Sources backing a grounded answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    /// Retrieved sources.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub grounding_chunks: Vec<GroundingChunk>,
    /// Links between answer segments and chunks.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub grounding_supports: Vec<GroundingSupport>,
    /// Queries issued to Google Search.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub web_search_queries: Vec<String>,
    /// Search suggestions widget.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_entry_point: Option<SearchEntryPoint>,
    /// Dynamic retrieval scores.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrieval_metadata: Option<RetrievalMetadata>,
    /// Token for rendering the Maps widget.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_maps_widget_context_token: Option<String>,
}

impl GroundingMetadata {
    /// Web sources in chunk order.
    pub fn web_sources(&self) -> impl Iterator<Item = &Web> {
        self.grounding_chunks.iter().filter_map(|c| c.web.as_ref())
    }

    /// Maps places in chunk order.
    pub fn places(&self) -> impl Iterator<Item = &Maps> {
        self.grounding_chunks.iter().filter_map(|c| c.maps.as_ref())
    }
}

/// One retrieved source; exactly one field is set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GroundingChunk {
    /// Web page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web: Option<Web>,
    /// Document from a retrieval corpus.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrieved_context: Option<RetrievedContext>,
    /// Google Maps place.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maps: Option<Maps>,
}

/// Web page source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Web {
    /// Page URI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Page title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Document retrieved from a corpus or file search store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RetrievedContext {
    /// Document URI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Document title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Retrieved passage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Google Maps place source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Maps {
    /// Place URI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Place name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Place description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Place id, `places/{id}`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
    /// Reviews used to answer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_answer_sources: Option<PlaceAnswerSources>,
}

/// Review snippets backing a place answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PlaceAnswerSources {
    /// Snippets.
    #[serde(default)]
    pub review_snippets: Vec<ReviewSnippet>,
}

/// Pointer to a user review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSnippet {
    /// Review id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_id: Option<String>,
    /// Link to the review on Google Maps.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_maps_uri: Option<String>,
    /// Review title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Links an answer segment to the chunks supporting it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GroundingSupport {
    /// Supported span of the answer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment: Option<Segment>,
    /// Indices into `grounding_chunks`.
    #[serde(default)]
    pub grounding_chunk_indices: Vec<i32>,
    /// Confidence per index.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub confidence_scores: Vec<f32>,
}

/// Span of generated text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    /// Part index within the content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_index: Option<i32>,
    /// Start byte offset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_index: Option<i32>,
    /// End byte offset (exclusive).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_index: Option<i32>,
    /// The span text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Search suggestions to display alongside grounded answers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchEntryPoint {
    /// HTML/CSS snippet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rendered_content: Option<String>,
    /// Base64 JSON array of `(term, url)` pairs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sdk_blob: Option<Base64String>,
}

/// Dynamic retrieval decision data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalMetadata {
    /// Likelihood that search helps, `0.0..=1.0`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_search_dynamic_retrieval_score: Option<f32>,
}

/// Attribution for grounded question answering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GroundingAttribution {
    /// Source identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<AttributionSourceId>,
    /// Source content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
}

/// Identifier of an attributed source; exactly one field is set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AttributionSourceId {
    /// Inline passage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grounding_passage: Option<GroundingPassageId>,
    /// Semantic retriever chunk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantic_retriever_chunk: Option<SemanticRetrieverChunk>,
}

/// Part of an inline grounding passage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GroundingPassageId {
    /// Passage id.
    #[serde(default)]
    pub passage_id: String,
    /// Part index within the passage.
    #[serde(default)]
    pub part_index: i32,
}

/// Chunk fetched by the semantic retriever.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SemanticRetrieverChunk {
    /// Corpus or document name.
    #[serde(default)]
    pub source: String,
    /// Chunk name.
    #[serde(default)]
    pub chunk: String,
}

/// Results of the URL context tool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UrlContextMetadata {
    /// One entry per URL.
    #[serde(default)]
    pub url_metadata: Vec<UrlMetadata>,
}

/// Retrieval outcome for one URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UrlMetadata {
    /// URL fetched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrieved_url: Option<String>,
    /// Outcome.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_retrieval_status: Option<UrlRetrievalStatus>,
}

/// Outcome of fetching a URL.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UrlRetrievalStatus {
    /// Unset.
    UrlRetrievalStatusUnspecified,
    /// Fetched.
    UrlRetrievalStatusSuccess,
    /// Fetch failed.
    UrlRetrievalStatusError,
    /// Behind a paywall.
    UrlRetrievalStatusPaywall,
    /// Flagged unsafe.
    UrlRetrievalStatusUnsafe,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_grounding_payload() {
        let metadata: GroundingMetadata = serde_json::from_value(json!({
            "webSearchQueries": ["rust 2024 edition"],
            "groundingChunks": [
                {"web": {"uri": "https://a.example", "title": "A"}},
                {"maps": {"title": "Cafe", "placeId": "places/1"}}
            ],
            "groundingSupports": [
                {"segment": {"startIndex": 0, "endIndex": 10, "text": "Rust 2024"},
                 "groundingChunkIndices": [0], "confidenceScores": [0.9]}
            ],
            "searchEntryPoint": {"renderedContent": "<div/>"}
        }))
        .unwrap();

        let titles: Vec<_> = metadata.web_sources().filter_map(|w| w.title.as_deref()).collect();
        assert_eq!(titles, ["A"]);
        assert_eq!(metadata.places().count(), 1);
        assert_eq!(metadata.grounding_supports[0].grounding_chunk_indices, [0]);
    }

    #[test]
    fn test_url_context_status() {
        let metadata: UrlContextMetadata = serde_json::from_value(json!({
            "urlMetadata": [{"retrievedUrl": "https://x", "urlRetrievalStatus": "URL_RETRIEVAL_STATUS_PAYWALL"}]
        }))
        .unwrap();
        assert_eq!(
            metadata.url_metadata[0].url_retrieval_status,
            Some(UrlRetrievalStatus::UrlRetrievalStatusPaywall)
        );
    }
}
