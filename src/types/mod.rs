//! Request and response DTOs for the Gemini REST API.
//!
//! Every type mirrors a JSON object of the public API: fields are
//! `camelCase` on the wire and absent optional fields are omitted.
//! All of them are [`JsonSerializable`](crate::json::JsonSerializable)
//! through serde.

pub mod batches;
pub mod cached_content;
pub mod content;
pub mod embeddings;
pub mod files;
pub mod generation;
pub mod grounding;
pub mod models;
pub mod safety;
pub mod tokens;
pub mod tools;

pub use batches::{
    BatchGenerateContentRequest, BatchState, BatchStats, EmbedContentBatch, GenerateContentBatch,
    GenerateContentBatchOutput, InlinedRequest, InlinedRequests, InlinedResponse,
    InlinedResponses, InputConfig, ListOperationsParams, ListOperationsResponse, Operation, UpdateBatchParams,
};
pub use cached_content::{
    CachedContent, CachedContentUsageMetadata, CreateCachedContentRequest,
    ListCachedContentsParams, ListCachedContentsResponse, UpdateCachedContentRequest,
};
pub use content::{
    Blob, CodeExecutionResult, Content, ExecutableCode, FileData, FunctionCall, FunctionResponse,
    FunctionResponseBlob, FunctionResponsePart, Language, Outcome, Part, PartData, Role,
    Scheduling, VideoMetadata,
};
pub use embeddings::{
    BatchEmbedContentsRequest, BatchEmbedContentsResponse, ContentEmbedding, EmbedContentRequest,
    EmbedContentResponse, TaskType,
};
pub use files::{
    File, FileSource, FileState, ListFilesParams, ListFilesResponse, Status, UploadFileRequest,
    UploadFileResponse, VideoFileMetadata,
};
pub use generation::{
    BlockReason, Candidate, CitationMetadata, CitationSource, FinishReason,
    GenerateContentRequest, GenerateContentResponse, GenerationConfig, ImageConfig,
    LogprobsCandidate, LogprobsResult, MediaResolution, Modality, ModalityTokenCount,
    MultiSpeakerVoiceConfig, PrebuiltVoiceConfig, PromptFeedback, SpeakerVoiceConfig,
    SpeechConfig, ThinkingConfig, ThinkingLevel, TopCandidates, UsageMetadata, VoiceConfig,
};
pub use grounding::{
    AttributionSourceId, GroundingAttribution, GroundingChunk, GroundingMetadata,
    GroundingPassageId, GroundingSupport, Maps, PlaceAnswerSources, RetrievalMetadata,
    RetrievedContext, ReviewSnippet, SearchEntryPoint, Segment, SemanticRetrieverChunk,
    UrlContextMetadata, UrlMetadata, UrlRetrievalStatus, Web,
};
pub use models::{ListModelsParams, ListModelsResponse, ModelInfo, PredictRequest, PredictResponse};
pub use safety::{HarmBlockThreshold, HarmCategory, HarmProbability, SafetyRating, SafetySetting};
pub use tokens::{CountTokensRequest, CountTokensResponse};
pub use tools::{
    CodeExecution, DynamicRetrievalConfig, DynamicRetrievalMode, FunctionCallingConfig,
    FunctionCallingMode, FunctionDeclaration, GoogleMaps, GoogleSearch, GoogleSearchRetrieval,
    LatLng, RetrievalConfig, Tool, ToolConfig, UrlContext,
};

/// int64 fields travel as JSON strings; accept numbers too.
pub(crate) mod int64 {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire {
        Text(String),
        Number(i64),
    }

    fn from_wire<E: serde::de::Error>(wire: Wire) -> Result<i64, E> {
        match wire {
            Wire::Number(n) => Ok(n),
            Wire::Text(s) => s.trim().parse().map_err(E::custom),
        }
    }

    pub fn serialize<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        from_wire(Wire::deserialize(deserializer)?)
    }

    pub mod option {
        use serde::{Deserialize, Deserializer, Serializer};

        #[allow(clippy::ref_option)]
        pub fn serialize<S: Serializer>(value: &Option<i64>, serializer: S) -> Result<S::Ok, S::Error> {
            match value {
                Some(v) => serializer.collect_str(v),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
            Option::<super::Wire>::deserialize(deserializer)?
                .map(super::from_wire)
                .transpose()
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Counts {
        #[serde(with = "super::int64")]
        bytes: i64,
        #[serde(default, with = "super::int64::option", skip_serializing_if = "Option::is_none")]
        limit: Option<i64>,
    }

    #[test]
    fn test_int64_accepts_strings_and_numbers() {
        let a: Counts = serde_json::from_str(r#"{"bytes":"1024","limit":5}"#).unwrap();
        assert_eq!(a, Counts { bytes: 1024, limit: Some(5) });
        let b: Counts = serde_json::from_str(r#"{"bytes":7}"#).unwrap();
        assert_eq!(b.limit, None);
        assert_eq!(serde_json::to_string(&a).unwrap(), r#"{"bytes":"1024","limit":"5"}"#);
    }
}
