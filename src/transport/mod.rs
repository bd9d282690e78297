//! HTTP plumbing: request construction, transport and response mapping.

pub mod endpoints;
mod error;
mod http;
mod reqwest;
mod request;
mod response;

pub use error::TransportError;
pub use http::{ChunkedStream, HttpMethod, HttpRequest, HttpResponse, HttpTransport};
pub use self::reqwest::ReqwestTransport;
pub use request::{RequestBuilder, MULTIPART_BOUNDARY_PREFIX};
pub use response::ResponseParser;
