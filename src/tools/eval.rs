//! eval tool - evaluate a Smalltalk expression in the image

use async_trait::async_trait;
use serde_json::Value;

use super::args::required_str;
use super::{Tool, ToolContext};
use crate::client::Envelope;

pub struct EvalTool;

#[async_trait]
impl Tool for EvalTool {
    fn name(&self) -> &'static str {
        "eval"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["evaluate"]
    }

    fn description(&self) -> &'static str {
        "Evaluate a Pharo Smalltalk expression. Returns {success, result} or {success: false, error}, \
         where error may carry description, stack_trace and receiver."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "code": {
                    "type": "string",
                    "description": "The Smalltalk code to evaluate"
                }
            },
            "required": ["code"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<Envelope, eyre::Error> {
        let code = required_str(&input, "code")?;
        Ok(ctx.client().evaluate(code).await)
    }
}
