//! Tool catalogue exposed to the orchestrator
//!
//! Each tool is a pure forward: it reads its typed arguments, applies the
//! documented defaults and hands them to one `PharoClient` method. The
//! envelope that comes back is returned unchanged.

mod args;
mod context;
mod eval;
mod packages;
mod registry;
mod screen;
mod search;
mod settings;
mod source;
mod testing;

pub use context::ToolContext;
pub use registry::ToolRegistry;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::client::Envelope;

/// A tool that can be invoked by the orchestrator
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name as published in `tools/list`
    fn name(&self) -> &'static str;

    /// Additional names accepted by `tools/call`
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// JSON Schema for input parameters
    fn input_schema(&self) -> Value;

    /// Forward the call; errors only for malformed arguments
    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<Envelope, eyre::Error>;
}

/// Outcome of a tool call as reported to the orchestrator
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    /// Text rendering (the envelope as JSON, or the argument error)
    pub content: String,
    /// The envelope itself when the call reached the transport
    pub structured: Option<Value>,
    pub is_error: bool,
}

impl ToolResult {
    pub fn from_envelope(envelope: &Envelope) -> Self {
        let value = envelope.to_value();
        Self {
            content: value.to_string(),
            structured: Some(value),
            is_error: false,
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            structured: None,
            is_error: true,
        }
    }
}

/// Tool definition as listed to the orchestrator
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

pub use eval::EvalTool;
pub use packages::{
    ExportPackageTool, ImportPackageTool, InstallProjectTool, ListClassesTool, ListExtendedClassesTool,
    ListMethodsTool, ListPackagesTool,
};
pub use screen::ReadScreenTool;
pub use search::{
    SearchClassesLikeTool, SearchImplementorsTool, SearchMethodsLikeTool, SearchReferencesTool,
    SearchReferencesToClassTool, SearchTraitsLikeTool,
};
pub use settings::{ApplySettingsTool, GetSettingsTool};
pub use source::{GetClassCommentTool, GetClassSourceTool, GetMethodSourceTool};
pub use testing::{RunClassTestTool, RunPackageTestTool};
