//! Typed async SDK for the Gemini generative-language REST API.
//!
//! The crate is layered:
//!
//! * [`services`] wrap one API area each (content, models, files, embeddings,
//!   cached content, batches) behind `Send + Sync` traits;
//! * [`client`] wires them to one transport, auth scheme, logger and retry policy;
//! * [`chat`] adds the conveniences most callers want: a fluent
//!   [`GenerateRequestBuilder`], [`ChatSession`]s that answer function calls on
//!   their own, and flattened [`GenerationResult`]s;
//! * [`storage`] persists sessions to disk or to a REST store.
//!
//! ```rust,no_run
//! use gemini_sdk::{create_client_from_env, GeminiClient, LocalStorage};
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), gemini_sdk::GeminiError> {
//! // GEMINI_API_KEY or GOOGLE_API_KEY
//! let client = create_client_from_env()?;
//!
//! let haiku = client.request().text("A haiku about borrow checking").generate().await;
//! println!("{}", haiku.text());
//!
//! let mut chat = client.start_chat("gemini-2.5-flash");
//! chat.functions_mut().register_fn(
//!     "get_weather",
//!     "Current weather for a city",
//!     &["city"],
//!     |city: String| json!({"city": city, "celsius": 18}),
//! )?;
//! let reply = chat.send("Do I need a jacket in Bergen?").await;
//! println!("{}", reply.text());
//!
//! chat.save(&LocalStorage::default()).await?;
//! # Ok(())
//! # }
//! ```
//!
//! Value types that the wire format encodes as strings (resource names,
//! timestamps, protobuf durations, field masks) live in [`support`]; the
//! request and response shapes live in [`types`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod auth;
pub mod chat;
pub mod client;
pub mod config;
pub mod error;
pub mod json;
pub mod observability;
pub mod resilience;
pub mod services;
pub mod storage;
pub mod streaming;
pub mod support;
pub mod transport;
pub mod types;

// Test support, public so integration tests and downstream crates can use it.
pub mod fixtures;
pub mod mocks;

pub use auth::{ApiKeyAuthManager, AuthManager};
pub use chat::{
    CacheRegistry, CachedItemInfo, ChatSession, FunctionRegistry, GenerateRequestBuilder,
    GenerationResult,
};
pub use client::{
    create_client, create_client_from_env, GeminiClient, GeminiClientBuilder, GeminiClientImpl,
};
pub use config::{
    AuthMethod, GeminiConfig, GeminiConfigBuilder, LogLevel, DEFAULT_API_VERSION,
    DEFAULT_BASE_URL, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS,
};
pub use error::{
    map_api_error, map_http_status, ApiValidationResult, AuthenticationError, ChatError,
    ConfigurationError, ContentError, GeminiError, GeminiResult, NetworkError, RateLimitError,
    RequestError, ResourceError, ResponseError, ServerError, StorageError, ValidationDetail,
};
pub use json::{JsonSchemaType, JsonSerializable};
pub use observability::{Logger, NoopLogger, StructuredLogger};
pub use resilience::{RetryConfig, RetryExecutor};
pub use services::{
    BatchesService, CachedContentService, ContentService, ContentStream, EmbeddingsService,
    FilesService, ModelsService,
};
pub use storage::{ChatStorage, LocalStorage, RemoteStorage};
pub use streaming::{GeminiChunkParser, StreamAccumulator};
pub use support::{
    Base64String, Duration, FieldMask, Model, ResourceName, ResourceType, Timestamp, Url, Uuid,
};
pub use transport::{
    ChunkedStream, HttpMethod, HttpRequest, HttpResponse, HttpTransport, RequestBuilder,
    ResponseParser, TransportError,
};
pub use types::{
    BatchEmbedContentsResponse, BatchState, Blob, CachedContent, CachedContentUsageMetadata,
    Candidate, CitationMetadata, CitationSource, CodeExecution, CodeExecutionResult, Content,
    ContentEmbedding, CountTokensRequest, CountTokensResponse, CreateCachedContentRequest,
    EmbedContentBatch, EmbedContentRequest, EmbedContentResponse, ExecutableCode, File, FileData,
    FileState, FinishReason, FunctionCall, FunctionCallingConfig, FunctionCallingMode,
    FunctionDeclaration, FunctionResponse, GenerateContentBatch, GenerateContentRequest,
    GenerateContentResponse, GenerationConfig, GoogleSearchRetrieval, GroundingMetadata,
    HarmBlockThreshold, HarmCategory, HarmProbability, ImageConfig, ListCachedContentsParams,
    ListCachedContentsResponse, ListFilesParams, ListFilesResponse, ListModelsParams,
    ListModelsResponse, ModelInfo, Operation, Part, PartData, Role, SafetyRating, SafetySetting,
    TaskType, ThinkingConfig, ThinkingLevel, Tool, ToolConfig, UpdateCachedContentRequest,
    UploadFileRequest, UsageMetadata,
};
