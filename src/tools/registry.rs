//! Tool registry - declares the catalogue and dispatches calls

use log::{debug, warn};
use serde_json::Value;

use super::{
    ApplySettingsTool, EvalTool, ExportPackageTool, GetClassCommentTool, GetClassSourceTool, GetMethodSourceTool,
    GetSettingsTool, ImportPackageTool, InstallProjectTool, ListClassesTool, ListExtendedClassesTool,
    ListMethodsTool, ListPackagesTool, ReadScreenTool, RunClassTestTool, RunPackageTestTool, SearchClassesLikeTool,
    SearchImplementorsTool, SearchMethodsLikeTool, SearchReferencesToClassTool, SearchReferencesTool,
    SearchTraitsLikeTool, Tool, ToolContext, ToolDefinition, ToolResult,
};
use crate::error::{InteropError, Result};

/// Ordered set of tools; listing order is registration order
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    /// Registry with the full catalogue
    pub fn standard() -> Self {
        let mut registry = Self::new();

        // Evaluation
        registry.add_tool(Box::new(EvalTool));

        // Source and metadata
        registry.add_tool(Box::new(GetClassSourceTool));
        registry.add_tool(Box::new(GetMethodSourceTool));
        registry.add_tool(Box::new(GetClassCommentTool));

        // Search
        registry.add_tool(Box::new(SearchClassesLikeTool));
        registry.add_tool(Box::new(SearchMethodsLikeTool));
        registry.add_tool(Box::new(SearchTraitsLikeTool));
        registry.add_tool(Box::new(SearchImplementorsTool));
        registry.add_tool(Box::new(SearchReferencesTool));
        registry.add_tool(Box::new(SearchReferencesToClassTool));

        // Packages
        registry.add_tool(Box::new(ListPackagesTool));
        registry.add_tool(Box::new(ListClassesTool));
        registry.add_tool(Box::new(ListExtendedClassesTool));
        registry.add_tool(Box::new(ListMethodsTool));
        registry.add_tool(Box::new(ExportPackageTool));
        registry.add_tool(Box::new(ImportPackageTool));
        registry.add_tool(Box::new(InstallProjectTool));

        // Tests
        registry.add_tool(Box::new(RunPackageTestTool));
        registry.add_tool(Box::new(RunClassTestTool));

        // UI and settings
        registry.add_tool(Box::new(ReadScreenTool));
        registry.add_tool(Box::new(GetSettingsTool));
        registry.add_tool(Box::new(ApplySettingsTool));

        registry
    }

    /// Create an empty registry (for custom tool sets)
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Add a tool; a tool with the same name is replaced
    pub fn add_tool(&mut self, tool: Box<dyn Tool>) {
        self.tools.retain(|t| t.name() != tool.name());
        self.tools.push(tool);
    }

    /// Look up a tool by name or alias
    pub fn find(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|t| t.name() == name || t.aliases().iter().any(|alias| *alias == name))
            .map(|t| t.as_ref())
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    pub fn tool_names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|t| ToolDefinition {
                name: t.name().to_string(),
                description: t.description().to_string(),
                input_schema: t.input_schema(),
            })
            .collect()
    }

    /// Execute a tool call
    ///
    /// Unknown names are an error for the caller; malformed arguments become
    /// an error result; everything else is the remote envelope.
    pub async fn execute(&self, name: &str, input: Value, ctx: &ToolContext) -> Result<ToolResult> {
        let tool = self
            .find(name)
            .ok_or_else(|| InteropError::UnknownTool(name.to_string()))?;

        let input = match input {
            Value::Null => Value::Object(Default::default()),
            other => other,
        };

        debug!("Executing tool {} with {}", tool.name(), input);
        match tool.execute(input, ctx).await {
            Ok(envelope) => {
                if !envelope.is_success() {
                    debug!("Tool {} returned a failure envelope", tool.name());
                }
                Ok(ToolResult::from_envelope(&envelope))
            }
            Err(e) => {
                warn!("Tool {} rejected its arguments: {}", tool.name(), e);
                Ok(ToolResult::error(e.to_string()))
            }
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
