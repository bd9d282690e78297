//! Small value types shared by the DTO catalogue.
//!
//! Each type serializes as the plain JSON string the REST API expects.

mod encoding;
mod field_mask;
mod identifiers;
mod media;
mod model;
mod time;
mod web;

pub use encoding::Base64String;
pub use field_mask::FieldMask;
pub use identifiers::{ResourceName, ResourceType, Uuid};
pub use media::{extension_for_mime_type, mime_type_for_path, AspectRatio, ImageSize, LanguageCode};
pub use model::{GenerationMethod, Model};
pub use time::{Duration, Timestamp};
pub use web::{EndpointType, Url};

use crate::error::{GeminiError, RequestError};

pub(crate) fn invalid_value(parameter: &str, message: impl Into<String>) -> GeminiError {
    GeminiError::Request(RequestError::InvalidParameter {
        parameter: parameter.to_string(),
        message: message.into(),
    })
}
