//! Result envelope shared by every operation
//!
//! Wire shape is `{"success": true, "result": ...}` or
//! `{"success": false, "error": ...}`. A remote envelope keeps the object it
//! was decoded from, so re-encoding gives back exactly what the server sent,
//! unknown top-level fields and absent keys included.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Uniform response of every remote operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Envelope {
    fields: Map<String, Value>,
    /// Typed view of `error`; always set on failure
    error: Option<RemoteError>,
}

/// Error payload of a failed envelope
///
/// Newer servers send a structured object for evaluation failures; older ones
/// and the local transport send a plain message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RemoteError {
    Message(String),
    Detailed(ErrorDetail),
    Other(Value),
}

/// Structured evaluation error reported by the remote server
///
/// Only `description` is typed; `stack_trace`, `receiver` and anything a
/// newer server adds stay in `fields` exactly as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub description: String,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ErrorDetail {
    pub fn stack_trace(&self) -> Option<&str> {
        self.fields.get("stack_trace").and_then(Value::as_str)
    }

    /// Snapshot of the receiver: `class`, `self`, `variables`
    pub fn receiver(&self) -> Option<&Value> {
        self.fields.get("receiver").filter(|v| !v.is_null())
    }
}

impl Envelope {
    pub fn success(result: impl Into<Value>) -> Self {
        let mut fields = Map::new();
        fields.insert("success".to_string(), Value::Bool(true));
        fields.insert("result".to_string(), result.into());
        Self { fields, error: None }
    }

    /// Failure carrying a plain message
    pub fn failure(message: impl Into<String>) -> Self {
        let message = message.into();
        let mut fields = Map::new();
        fields.insert("success".to_string(), Value::Bool(false));
        fields.insert("error".to_string(), Value::String(message.clone()));
        Self {
            fields,
            error: Some(RemoteError::Message(message)),
        }
    }

    pub fn connection_error(detail: impl std::fmt::Display) -> Self {
        Self::failure(format!("Connection error: {}", detail))
    }

    pub fn http_error(status: u16, body: &str) -> Self {
        Self::failure(format!("HTTP error {}: {}", status, body))
    }

    pub fn invalid_json(detail: impl std::fmt::Display) -> Self {
        Self::failure(format!("Invalid JSON response: {}", detail))
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// The `result` value of a success; `None` on failure or when absent
    pub fn result(&self) -> Option<&Value> {
        if self.is_success() {
            self.fields.get("result")
        } else {
            None
        }
    }

    /// The error of a failure; a missing `error` reads as `Other(null)`
    pub fn error(&self) -> Option<&RemoteError> {
        self.error.as_ref()
    }

    /// The envelope object as received (or as built locally)
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}

impl RemoteError {
    /// Human-readable summary: the message or the structured description
    pub fn message(&self) -> String {
        match self {
            Self::Message(msg) => msg.clone(),
            Self::Detailed(detail) => detail.description.clone(),
            Self::Other(value) => value.to_string(),
        }
    }

    fn from_field(value: Option<&Value>) -> Self {
        match value {
            None => Self::Other(Value::Null),
            Some(value) => Self::deserialize(value).unwrap_or_else(|_| Self::Other(value.clone())),
        }
    }
}

impl TryFrom<Map<String, Value>> for Envelope {
    type Error = String;

    fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let success = match fields.get("success") {
            Some(Value::Bool(success)) => *success,
            Some(other) => return Err(format!("'success' must be a boolean, got {}", other)),
            None => return Err("missing field `success`".to_string()),
        };

        let error = if success {
            None
        } else {
            Some(RemoteError::from_field(fields.get("error")))
        };

        Ok(Self { fields, error })
    }
}

impl From<Envelope> for Map<String, Value> {
    fn from(envelope: Envelope) -> Self {
        envelope.fields
    }
}
