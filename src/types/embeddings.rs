//! Embeddings API types.

use serde::{Deserialize, Serialize};

use super::content::Content;

/// Intended downstream use of an embedding.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskType {
    /// Unset.
    TaskTypeUnspecified,
    /// Search query.
    RetrievalQuery,
    /// Document in a search corpus.
    RetrievalDocument,
    /// Semantic similarity.
    SemanticSimilarity,
    /// Classification.
    Classification,
    /// Clustering.
    Clustering,
    /// Question answering.
    QuestionAnswering,
    /// Fact verification.
    FactVerification,
}

/// Body of `models/{model}:embedContent`, and one entry of a batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct EmbedContentRequest {
    /// `models/{id}`; required inside batches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Content to embed; only text parts are used.
    pub content: Content,
    /// Downstream task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_type: Option<TaskType>,
    /// Document title, for `RETRIEVAL_DOCUMENT`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Truncated output size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dimensionality: Option<i32>,
}

impl EmbedContentRequest {
    /// Request embedding a single text.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            content: Content::system_text(text),
            ..Self::default()
        }
    }

    /// Sets the task type.
    #[must_use]
    pub fn with_task_type(mut self, task_type: TaskType) -> Self {
        self.task_type = Some(task_type);
        self
    }
}

/// An embedding vector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ContentEmbedding {
    /// Components.
    #[serde(default)]
    pub values: Vec<f32>,
}

/// Response of `:embedContent`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct EmbedContentResponse {
    /// The embedding.
    pub embedding: ContentEmbedding,
}

/// Body of `models/{model}:batchEmbedContents`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct BatchEmbedContentsRequest {
    /// One request per input.
    pub requests: Vec<EmbedContentRequest>,
}

/// Response of `:batchEmbedContents`, in request order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct BatchEmbedContentsResponse {
    /// Embeddings.
    #[serde(default)]
    pub embeddings: Vec<ContentEmbedding>,
}
