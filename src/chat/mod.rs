//! Conversation-level helpers built on the content service.
//!
//! - [`GenerationResult`]: a flattened, inspectable generation outcome
//! - [`GenerateRequestBuilder`]: fluent one-shot requests
//! - [`ChatSession`]: history, automatic function calling and persistence
//! - [`FunctionRegistry`]: client-side functions exposed as a tool
//! - [`CacheRegistry`]: local aliases for cached contents

mod builder;
mod cache_registry;
mod functions;
mod result;
mod session;

pub use builder::{GenerateRequestBuilder, DEFAULT_MODEL};
pub(crate) use builder::stream_to_result;
pub use cache_registry::{CacheRegistry, CachedItemInfo, DEFAULT_REGISTRY_PATH};
pub use functions::{FunctionHandler, FunctionRegistry, IntoFunctionHandler};
pub use result::GenerationResult;
pub use session::{ChatSession, DEFAULT_MAX_FUNCTION_CALL_TURNS};
