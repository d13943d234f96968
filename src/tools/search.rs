//! Search tools - name patterns, implementors and references

use async_trait::async_trait;
use serde_json::Value;

use super::args::{optional_str, required_str};
use super::{Tool, ToolContext};
use crate::client::Envelope;

fn single_string_schema(key: &str, description: &str) -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            key: {
                "type": "string",
                "description": description
            }
        },
        "required": [key]
    })
}

pub struct SearchClassesLikeTool;

#[async_trait]
impl Tool for SearchClassesLikeTool {
    fn name(&self) -> &'static str {
        "search_classes_like"
    }

    fn description(&self) -> &'static str {
        "Find classes whose names match a pattern. Returns a list of class names."
    }

    fn input_schema(&self) -> Value {
        single_string_schema("class_name_query", "The pattern to search for in class names")
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<Envelope, eyre::Error> {
        let query = required_str(&input, "class_name_query")?;
        Ok(ctx.client().search_classes_like(query).await)
    }
}

pub struct SearchMethodsLikeTool;

#[async_trait]
impl Tool for SearchMethodsLikeTool {
    fn name(&self) -> &'static str {
        "search_methods_like"
    }

    fn description(&self) -> &'static str {
        "Find methods whose selectors match a pattern. Returns a list of selectors."
    }

    fn input_schema(&self) -> Value {
        single_string_schema("method_name_query", "The pattern to search for in method names")
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<Envelope, eyre::Error> {
        let query = required_str(&input, "method_name_query")?;
        Ok(ctx.client().search_methods_like(query).await)
    }
}

pub struct SearchTraitsLikeTool;

#[async_trait]
impl Tool for SearchTraitsLikeTool {
    fn name(&self) -> &'static str {
        "search_traits_like"
    }

    fn description(&self) -> &'static str {
        "Find traits whose names match a pattern. Returns a list of trait names."
    }

    fn input_schema(&self) -> Value {
        single_string_schema("trait_name_query", "The pattern to search for in trait names")
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<Envelope, eyre::Error> {
        let query = required_str(&input, "trait_name_query")?;
        Ok(ctx.client().search_traits_like(query).await)
    }
}

pub struct SearchImplementorsTool;

#[async_trait]
impl Tool for SearchImplementorsTool {
    fn name(&self) -> &'static str {
        "search_implementors"
    }

    fn description(&self) -> &'static str {
        "Get all implementors of a method selector. Each entry is {class, method, package}."
    }

    fn input_schema(&self) -> Value {
        single_string_schema("method_name", "The method name to find implementors for")
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<Envelope, eyre::Error> {
        let method_name = required_str(&input, "method_name")?;
        Ok(ctx.client().search_implementors(method_name).await)
    }
}

pub struct SearchReferencesTool;

#[async_trait]
impl Tool for SearchReferencesTool {
    fn name(&self) -> &'static str {
        "search_references"
    }

    fn description(&self) -> &'static str {
        "Get all references to a method selector or a symbol. Each entry is {class, method, package}."
    }

    fn input_schema(&self) -> Value {
        single_string_schema("program_symbol", "The method name or symbol to find references for")
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<Envelope, eyre::Error> {
        // Earlier clients sent the symbol as `method_name_or_symbol`
        let symbol = match optional_str(&input, "program_symbol")? {
            Some(symbol) => symbol,
            None => match optional_str(&input, "method_name_or_symbol")? {
                Some(legacy) => legacy,
                None => required_str(&input, "program_symbol")?,
            },
        };
        Ok(ctx.client().search_references(symbol).await)
    }
}

pub struct SearchReferencesToClassTool;

#[async_trait]
impl Tool for SearchReferencesToClassTool {
    fn name(&self) -> &'static str {
        "search_references_to_class"
    }

    fn description(&self) -> &'static str {
        "Find methods referencing a class. Each entry is {package, class, method}."
    }

    fn input_schema(&self) -> Value {
        single_string_schema("class_name", "The name of the class to find references for")
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<Envelope, eyre::Error> {
        let class_name = required_str(&input, "class_name")?;
        Ok(ctx.client().search_references_to_class(class_name).await)
    }
}
