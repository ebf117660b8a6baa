//! Module parameters
//!
//! The fact gatherer takes exactly one argument, the REST API identifier.
//! Arguments arrive either from CLI flags or as a JSON object read from an
//! arguments file, and are validated here before any AWS client exists.

use crate::error::ParamsError;
use serde::Serialize;
use serde_json::Value;

/// Name of the single required argument
pub const ID_PARAM: &str = "id";

/// Validated parameter set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourcesParams {
    /// Identifier of the REST API to inspect
    pub id: String,
}

impl ResourcesParams {
    /// Validate a REST API identifier supplied directly
    pub fn new(id: &str) -> Result<Self, ParamsError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(ParamsError::Empty(ID_PARAM));
        }

        Ok(Self { id: id.to_string() })
    }

    /// Validate a JSON arguments document such as `{"id": "hlji08"}`
    pub fn from_json(args: &Value) -> Result<Self, ParamsError> {
        let Value::Object(map) = args else {
            return Err(ParamsError::NotAnObject);
        };

        let mut unsupported: Vec<&str> = map
            .keys()
            .map(String::as_str)
            .filter(|k| *k != ID_PARAM)
            .collect();
        if !unsupported.is_empty() {
            unsupported.sort_unstable();
            return Err(ParamsError::Unsupported(unsupported.join(", ")));
        }

        match map.get(ID_PARAM) {
            None | Some(Value::Null) => Err(ParamsError::Missing(ID_PARAM)),
            Some(Value::String(id)) => Self::new(id),
            Some(scalar @ (Value::Number(_) | Value::Bool(_))) => {
                let id = scalar_to_str(scalar);
                tracing::warn!(
                    "The value {} (type {}) was converted to '{}' (type str)",
                    scalar,
                    json_type_name(scalar),
                    id
                );
                Self::new(&id)
            }
            Some(other) => Err(ParamsError::InvalidType {
                name: ID_PARAM,
                found: json_type_name(other),
            }),
        }
    }

    /// Build from the CLI flag, falling back to an arguments document
    pub fn resolve(id: Option<&str>, args: Option<&Value>) -> Result<Self, ParamsError> {
        match (id, args) {
            (Some(id), _) => Self::new(id),
            (None, Some(args)) => Self::from_json(args),
            (None, None) => Err(ParamsError::Missing(ID_PARAM)),
        }
    }
}

/// String form of a scalar, spelled the way YAML-sourced arguments expect
/// (`true` -> `True`)
fn scalar_to_str(value: &Value) -> String {
    match value {
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}
