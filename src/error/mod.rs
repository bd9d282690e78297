//! Error taxonomy for the SDK.
//!
//! Every fallible operation returns [`GeminiResult`]. Errors are grouped in
//! categories so callers can match coarsely (`GeminiError::RateLimit(_)`) or
//! precisely (`RateLimitError::QuotaExceeded { .. }`).

mod categories;
mod mapper;
mod types;

pub use categories::*;
pub use mapper::*;
pub use types::*;
