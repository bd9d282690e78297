//! REST services, one per API surface.
//!
//! Every service is an object-safe async trait plus a `*ServiceImpl` built
//! on a shared [`ServiceContext`](context::ServiceContext).

pub mod batches;
pub mod cached_content;
pub mod content;
pub mod context;
pub mod embeddings;
pub mod files;
pub mod models;

pub use batches::{BatchesService, BatchesServiceImpl};
pub use cached_content::{CachedContentService, CachedContentServiceImpl};
pub use content::{ContentService, ContentServiceImpl, ContentStream};
pub use context::ServiceContext;
pub use embeddings::{EmbeddingsService, EmbeddingsServiceImpl, DEFAULT_EMBEDDING_MODEL};
pub use files::{FilesService, FilesServiceImpl};
pub use models::{ModelsService, ModelsServiceImpl};
