//! Streaming responses.
//!
//! [`GeminiChunkParser`] turns the body of `streamGenerateContent` into a
//! stream of [`GenerateContentResponse`](crate::types::GenerateContentResponse)
//! chunks; [`StreamAccumulator`] folds them back into a single response.
//!
//! ```no_run
//! use futures::StreamExt;
//! use gemini_sdk::streaming::{ByteStream, GeminiChunkParser, StreamAccumulator};
//!
//! async fn collect(body: ByteStream) -> gemini_sdk::GeminiResult<String> {
//!     let mut chunks = GeminiChunkParser::new(body);
//!     let mut acc = StreamAccumulator::new();
//!     while let Some(chunk) = chunks.next().await {
//!         acc.add_chunk(chunk?);
//!     }
//!     Ok(acc.finalize().text())
//! }
//! ```

mod accumulator;
mod chunked_json;

pub use accumulator::StreamAccumulator;
pub use chunked_json::{ByteStream, GeminiChunkParser};
