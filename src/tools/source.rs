//! Source and comment lookup tools

use async_trait::async_trait;
use serde_json::Value;

use super::args::{optional_bool, required_str};
use super::{Tool, ToolContext};
use crate::client::Envelope;

pub struct GetClassSourceTool;

#[async_trait]
impl Tool for GetClassSourceTool {
    fn name(&self) -> &'static str {
        "get_class_source"
    }

    fn description(&self) -> &'static str {
        "Get the source code of a Smalltalk class."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "class_name": {
                    "type": "string",
                    "description": "The name of the class to retrieve source for"
                }
            },
            "required": ["class_name"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<Envelope, eyre::Error> {
        let class_name = required_str(&input, "class_name")?;
        Ok(ctx.client().get_class_source(class_name).await)
    }
}

pub struct GetMethodSourceTool;

#[async_trait]
impl Tool for GetMethodSourceTool {
    fn name(&self) -> &'static str {
        "get_method_source"
    }

    fn description(&self) -> &'static str {
        "Get the source code of a specific method in a class. Set is_class_method for class-side methods."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "class_name": {
                    "type": "string",
                    "description": "The name of the class containing the method"
                },
                "method_name": {
                    "type": "string",
                    "description": "The name of the method to retrieve source for"
                },
                "is_class_method": {
                    "type": "boolean",
                    "description": "Look the method up on the class side",
                    "default": false
                }
            },
            "required": ["class_name", "method_name"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<Envelope, eyre::Error> {
        let class_name = required_str(&input, "class_name")?;
        let method_name = required_str(&input, "method_name")?;
        let is_class_method = optional_bool(&input, "is_class_method")?.unwrap_or(false);

        Ok(ctx
            .client()
            .get_method_source(class_name, method_name, is_class_method)
            .await)
    }
}

pub struct GetClassCommentTool;

#[async_trait]
impl Tool for GetClassCommentTool {
    fn name(&self) -> &'static str {
        "get_class_comment"
    }

    fn description(&self) -> &'static str {
        "Get the comment of a Smalltalk class."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "class_name": {
                    "type": "string",
                    "description": "The name of the class to retrieve comment for"
                }
            },
            "required": ["class_name"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<Envelope, eyre::Error> {
        let class_name = required_str(&input, "class_name")?;
        Ok(ctx.client().get_class_comment(class_name).await)
    }
}
