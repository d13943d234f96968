//! Error types for the interop bridge
//!
//! Transport failures never show up here: the request primitive folds them
//! into an `Envelope`. These errors cover startup and the orchestrator surface.

use thiserror::Error;

/// All error types that can occur outside the transport primitive
#[derive(Debug, Error)]
pub enum InteropError {
    /// Invalid configuration (bad port, unreadable config file)
    #[error("Config error: {0}")]
    Config(String),

    /// Tool arguments did not match the declared schema
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Tool name not in the catalogue
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for interop operations
pub type Result<T> = std::result::Result<T, InteropError>;
