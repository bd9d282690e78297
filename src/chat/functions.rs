//! Client-side functions the model can call.
//!
//! A [`FunctionRegistry`] pairs each [`FunctionDeclaration`] with a handler.
//! Handlers either take the raw arguments object or are plain Rust closures
//! whose parameter types describe the schema through [`JsonSchemaType`]:
//!
//! ```
//! use gemini_sdk::chat::FunctionRegistry;
//! use serde_json::json;
//!
//! let mut registry = FunctionRegistry::new();
//! registry
//!     .register_fn(
//!         "get_weather",
//!         "Current weather for a city",
//!         &["city", "unit"],
//!         |city: String, unit: Option<String>| {
//!             json!({"city": city, "unit": unit.unwrap_or_else(|| "C".into()), "temp": 21})
//!         },
//!     )
//!     .unwrap();
//!
//! let out = registry.invoke("get_weather", &json!({"city": "Oslo"})).unwrap();
//! assert_eq!(out["unit"], "C");
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::error::{GeminiResult, RequestError};
use crate::json::JsonSchemaType;
use crate::types::{FunctionDeclaration, Tool};

/// Handler over the raw arguments object. `Err` is reported to the model as
/// `{"error": message}`.
pub type FunctionHandler = Arc<dyn Fn(&Value) -> Result<Value, String> + Send + Sync>;

/// Closures usable with [`FunctionRegistry::register_fn`].
///
/// Implemented for `Fn` closures of up to six arguments whose parameters are
/// [`JsonSchemaType`] + `DeserializeOwned` and whose return is `Serialize`.
pub trait IntoFunctionHandler<Args>: Send + Sync + 'static {
    /// `(schema, optional)` per parameter, in order.
    fn parameters() -> Vec<(Value, bool)>;

    /// Calls the closure with positional JSON arguments.
    fn call(&self, args: Vec<Value>) -> Result<Value, String>;
}

macro_rules! impl_into_function_handler {
    ($($ty:ident $arg:ident),*) => {
        impl<Func, Ret, $($ty,)*> IntoFunctionHandler<($($ty,)*)> for Func
        where
            Func: Fn($($ty),*) -> Ret + Send + Sync + 'static,
            Ret: Serialize,
            $($ty: JsonSchemaType + DeserializeOwned,)*
        {
            fn parameters() -> Vec<(Value, bool)> {
                vec![$(($ty::schema(), $ty::is_optional())),*]
            }

            #[allow(unused_mut, unused_variables)]
            fn call(&self, args: Vec<Value>) -> Result<Value, String> {
                let mut args = args.into_iter();
                $(
                    let $arg: $ty = serde_json::from_value(args.next().unwrap_or(Value::Null))
                        .map_err(|err| format!("invalid argument: {err}"))?;
                )*
                serde_json::to_value((self)($($arg),*)).map_err(|err| err.to_string())
            }
        }
    };
}

impl_into_function_handler!();
impl_into_function_handler!(A a);
impl_into_function_handler!(A a, B b);
impl_into_function_handler!(A a, B b, C c);
impl_into_function_handler!(A a, B b, C c, D d);
impl_into_function_handler!(A a, B b, C c, D d, E e);
impl_into_function_handler!(A a, B b, C c, D d, E e, F f);

#[derive(Clone)]
struct RegisteredFunction {
    declaration: FunctionDeclaration,
    handler: FunctionHandler,
}

/// Named functions with their declarations, ordered by name.
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: BTreeMap<String, RegisteredFunction>,
}

impl FunctionRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler over the raw arguments object. Every argument is
    /// declared as a required string.
    pub fn register<F>(&mut self, name: &str, description: &str, arg_names: &[&str], handler: F)
    where
        F: Fn(&Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        let parameters = arg_names
            .iter()
            .map(|arg| (*arg, json!({"type": "string"}), false));
        self.insert(name, description, object_schema(parameters), Arc::new(handler));
    }

    /// Registers a handler with an explicit parameters schema.
    pub fn register_with_schema<F>(
        &mut self,
        name: &str,
        description: &str,
        parameters: Value,
        handler: F,
    ) where
        F: Fn(&Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.insert(name, description, parameters, Arc::new(handler));
    }

    /// Registers a typed closure. `arg_names` name its parameters in order;
    /// `Option` parameters are not required.
    pub fn register_fn<Args, H>(
        &mut self,
        name: &str,
        description: &str,
        arg_names: &[&str],
        handler: H,
    ) -> GeminiResult<()>
    where
        H: IntoFunctionHandler<Args>,
    {
        let params = H::parameters();
        if params.len() != arg_names.len() {
            return Err(RequestError::InvalidParameter {
                parameter: name.to_string(),
                message: format!(
                    "function takes {} arguments but {} names were given",
                    params.len(),
                    arg_names.len()
                ),
            }
            .into());
        }

        let schema = object_schema(
            arg_names
                .iter()
                .zip(params)
                .map(|(arg, (schema, optional))| (*arg, schema, optional)),
        );
        let names: Vec<String> = arg_names.iter().map(|s| (*s).to_string()).collect();
        let handler: FunctionHandler = Arc::new(move |args: &Value| {
            let positional = names
                .iter()
                .map(|n| args.get(n).cloned().unwrap_or(Value::Null))
                .collect();
            handler.call(positional)
        });
        self.insert(name, description, schema, handler);
        Ok(())
    }

    /// Removes a function; returns whether it existed.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.functions.remove(name).is_some()
    }

    /// Calls `name`. `None` when no such function is registered.
    pub fn invoke(&self, name: &str, args: &Value) -> Option<Value> {
        let function = self.functions.get(name)?;
        match (function.handler)(args) {
            Ok(Value::Null) => Some(json!({"result": "ok"})),
            Ok(value) => Some(value),
            Err(message) => {
                tracing::warn!(function = name, error = %message, "function failed");
                Some(json!({"error": message}))
            }
        }
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Number of functions.
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// No functions registered.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.functions.keys().map(String::as_str).collect()
    }

    /// Declarations, sorted by name.
    pub fn declarations(&self) -> Vec<FunctionDeclaration> {
        self.functions
            .values()
            .map(|f| f.declaration.clone())
            .collect()
    }

    /// A tool declaring every function, `None` when empty.
    pub fn tool(&self) -> Option<Tool> {
        (!self.is_empty()).then(|| Tool::functions(self.declarations()))
    }

    fn insert(&mut self, name: &str, description: &str, parameters: Value, handler: FunctionHandler) {
        let declaration = FunctionDeclaration {
            name: name.to_string(),
            description: description.to_string(),
            parameters: Some(parameters),
        };
        self.functions.insert(
            name.to_string(),
            RegisteredFunction {
                declaration,
                handler,
            },
        );
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.names())
            .finish()
    }
}

fn object_schema<'a>(parameters: impl Iterator<Item = (&'a str, Value, bool)>) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();
    for (name, schema, optional) in parameters {
        if !optional {
            required.push(Value::String(name.to_string()));
        }
        properties.insert(name.to_string(), schema);
    }
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_raw_registration_declares_string_args() {
        // Arrange
        let mut registry = FunctionRegistry::new();

        // Act
        registry.register("echo", "Echo back", &["text"], |args| Ok(args.clone()));

        // Assert
        let tool = registry.tool().unwrap();
        assert_eq!(
            tool.function_declarations[0].parameters,
            Some(json!({
                "type": "object",
                "properties": {"text": {"type": "string"}},
                "required": ["text"]
            }))
        );
    }

    #[test]
    fn test_typed_registration_schema() {
        let mut registry = FunctionRegistry::new();
        registry
            .register_fn(
                "add",
                "Adds numbers",
                &["a", "b", "label"],
                |a: i64, b: f64, label: Option<String>| json!({"sum": a as f64 + b, "label": label}),
            )
            .unwrap();

        let params = registry.declarations()[0].parameters.clone().unwrap();
        assert_eq!(params["properties"]["a"]["type"], "integer");
        assert_eq!(params["properties"]["b"]["type"], "number");
        assert_eq!(params["properties"]["label"]["type"], "string");
        assert_eq!(params["required"], json!(["a", "b"]));

        let out = registry.invoke("add", &json!({"a": 2, "b": 0.5})).unwrap();
        assert_eq!(out, json!({"sum": 2.5, "label": null}));
    }

    #[test]
    fn test_arity_mismatch_is_rejected() {
        let mut registry = FunctionRegistry::new();
        let result = registry.register_fn("one", "", &["a", "b"], |a: String| a);
        assert!(result.is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_invoke_outcomes() {
        let mut registry = FunctionRegistry::new();
        registry.register("fails", "", &[], |_| Err("boom".to_string()));
        registry.register_fn("noop", "", &[], || ()).unwrap();
        registry
            .register_fn("square", "", &["n"], |n: i32| n * n)
            .unwrap();

        assert_eq!(registry.invoke("missing", &json!({})), None);
        assert_eq!(registry.invoke("fails", &json!({})), Some(json!({"error": "boom"})));
        assert_eq!(registry.invoke("noop", &json!({})), Some(json!({"result": "ok"})));
        assert_eq!(registry.invoke("square", &json!({"n": 7})), Some(json!(49)));

        let bad = registry.invoke("square", &json!({"n": "seven"})).unwrap();
        assert!(bad["error"].as_str().unwrap().starts_with("invalid argument"));
    }

    #[test]
    fn test_declarations_sorted_and_empty_tool() {
        let mut registry = FunctionRegistry::new();
        assert!(registry.tool().is_none());

        registry.register("zeta", "", &[], |_| Ok(Value::Null));
        registry.register("alpha", "", &[], |_| Ok(Value::Null));

        assert_eq!(registry.names(), vec!["alpha", "zeta"]);
        assert!(registry.unregister("zeta"));
        assert!(!registry.contains("zeta"));
    }
}
