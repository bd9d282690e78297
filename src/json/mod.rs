//! JSON serialization contract shared by every DTO and value type.
//!
//! Any type that is `Serialize + DeserializeOwned` is [`JsonSerializable`]
//! through a blanket implementation, so the capability is checked by the
//! compiler at the call site rather than detected at runtime.
//!
//! [`JsonSchemaType`] maps Rust types onto JSON Schema fragments and is used
//! to describe function parameters to the model.

use std::collections::{BTreeMap, HashMap};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{GeminiError, GeminiResult, ResponseError};

/// Conversion to and from JSON.
pub trait JsonSerializable: Sized {
    /// Serializes into a JSON value.
    fn to_json(&self) -> GeminiResult<Value>;

    /// Deserializes from a JSON value.
    fn from_json(value: &Value) -> GeminiResult<Self>;

    /// Serializes into compact JSON text.
    fn to_json_string(&self) -> GeminiResult<String> {
        Ok(self.to_json()?.to_string())
    }

    /// Serializes into indented JSON text.
    fn to_json_pretty(&self) -> GeminiResult<String> {
        serde_json::to_string_pretty(&self.to_json()?).map_err(GeminiError::from)
    }

    /// Deserializes from JSON text.
    fn from_json_str(text: &str) -> GeminiResult<Self> {
        let value: Value = serde_json::from_str(text).map_err(deserialization_error)?;
        Self::from_json(&value)
    }
}

impl<T> JsonSerializable for T
where
    T: Serialize + DeserializeOwned,
{
    fn to_json(&self) -> GeminiResult<Value> {
        serde_json::to_value(self).map_err(GeminiError::from)
    }

    fn from_json(value: &Value) -> GeminiResult<Self> {
        T::deserialize(value).map_err(deserialization_error)
    }
}

fn deserialization_error(err: serde_json::Error) -> GeminiError {
    GeminiError::Response(ResponseError::DeserializationError {
        message: err.to_string(),
    })
}

/// JSON Schema description of a Rust type.
pub trait JsonSchemaType {
    /// Schema fragment, e.g. `{"type": "string"}`.
    fn schema() -> Value;

    /// Whether a function parameter of this type may be omitted.
    fn is_optional() -> bool {
        false
    }
}

macro_rules! schema_type {
    ($name:literal => $($ty:ty),+ $(,)?) => {
        $(
            impl JsonSchemaType for $ty {
                fn schema() -> Value {
                    json!({ "type": $name })
                }
            }
        )+
    };
}

schema_type!("string" => String, &str, char);
schema_type!("boolean" => bool);
schema_type!("integer" => i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
schema_type!("number" => f32, f64);
schema_type!("object" => Value);

impl<T: JsonSchemaType> JsonSchemaType for Vec<T> {
    fn schema() -> Value {
        json!({ "type": "array", "items": T::schema() })
    }
}

impl<T: JsonSchemaType> JsonSchemaType for Option<T> {
    fn schema() -> Value {
        T::schema()
    }

    fn is_optional() -> bool {
        true
    }
}

impl<V: JsonSchemaType> JsonSchemaType for HashMap<String, V> {
    fn schema() -> Value {
        json!({ "type": "object", "additionalProperties": V::schema() })
    }
}

impl<V: JsonSchemaType> JsonSchemaType for BTreeMap<String, V> {
    fn schema() -> Value {
        json!({ "type": "object", "additionalProperties": V::schema() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Sample {
        display_name: String,
        count: u32,
    }

    #[test]
    fn test_blanket_impl_uses_serde_shape() {
        let sample = Sample {
            display_name: "a".into(),
            count: 2,
        };
        assert_eq!(sample.to_json().unwrap(), json!({"displayName": "a", "count": 2}));
        assert_eq!(sample.to_json_string().unwrap(), r#"{"count":2,"displayName":"a"}"#);
    }

    #[test]
    fn test_from_json_str_reports_deserialization_error() {
        let err = Sample::from_json_str(r#"{"displayName": 5}"#).unwrap_err();
        assert!(matches!(
            err,
            GeminiError::Response(ResponseError::DeserializationError { .. })
        ));

        let err = Sample::from_json_str("not json").unwrap_err();
        assert!(matches!(
            err,
            GeminiError::Response(ResponseError::DeserializationError { .. })
        ));
    }

    #[test]
    fn test_schema_types() {
        assert_eq!(String::schema(), json!({"type": "string"}));
        assert_eq!(i64::schema(), json!({"type": "integer"}));
        assert_eq!(f32::schema(), json!({"type": "number"}));
        assert_eq!(bool::schema(), json!({"type": "boolean"}));
        assert_eq!(
            Vec::<Vec<u8>>::schema(),
            json!({"type": "array", "items": {"type": "array", "items": {"type": "integer"}}})
        );
        assert_eq!(Option::<String>::schema(), json!({"type": "string"}));
        assert!(Option::<String>::is_optional());
        assert!(!String::is_optional());
    }
}
