//! Argument extraction for tool inputs
//!
//! Only shape is checked here (presence, JSON type). Whether a class or
//! package exists is for the remote server to decide.

use serde_json::{Map, Value};

use crate::error::InteropError;

fn invalid(message: String) -> eyre::Error {
    InteropError::InvalidArguments(message).into()
}

/// A string argument that must be present
pub fn required_str<'a>(input: &'a Value, key: &str) -> eyre::Result<&'a str> {
    optional_str(input, key)?.ok_or_else(|| invalid(format!("{} is required", key)))
}

/// A string argument; absent and `null` both read as `None`
pub fn optional_str<'a>(input: &'a Value, key: &str) -> eyre::Result<Option<&'a str>> {
    match input.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(invalid(format!("{} must be a string, got {}", key, type_name(other)))),
    }
}

pub fn optional_bool(input: &Value, key: &str) -> eyre::Result<Option<bool>> {
    match input.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(other) => Err(invalid(format!("{} must be a boolean, got {}", key, type_name(other)))),
    }
}

/// An object argument that must be present
pub fn required_object(input: &Value, key: &str) -> eyre::Result<Map<String, Value>> {
    match input.get(key) {
        Some(Value::Object(map)) => Ok(map.clone()),
        None | Some(Value::Null) => Err(invalid(format!("{} is required", key))),
        Some(other) => Err(invalid(format!("{} must be an object, got {}", key, type_name(other)))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
