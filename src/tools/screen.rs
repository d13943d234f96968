//! read_screen tool - UI introspection of the running image

use async_trait::async_trait;
use serde_json::Value;

use super::args::{optional_bool, optional_str};
use super::{Tool, ToolContext};
use crate::client::Envelope;

pub const DEFAULT_TARGET_TYPE: &str = "world";

pub struct ReadScreenTool;

#[async_trait]
impl Tool for ReadScreenTool {
    fn name(&self) -> &'static str {
        "read_screen"
    }

    fn description(&self) -> &'static str {
        "Read the Pharo UI for debugging: World morphs, Spec windows or Roassal canvases. \
         Returns {screenshot?, target_type, structure, summary}; screenshot is a PNG path under /tmp."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "target_type": {
                    "type": "string",
                    "enum": ["world", "spec", "roassal"],
                    "description": concat!(
                        "UI type to inspect: 'world' (morphs), 'spec' (windows), ",
                        "or 'roassal' (visualizations)"
                    ),
                    "default": DEFAULT_TARGET_TYPE
                },
                "capture_screenshot": {
                    "type": "boolean",
                    "description": "Include a PNG screenshot in the response",
                    "default": true
                }
            }
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<Envelope, eyre::Error> {
        let target_type = optional_str(&input, "target_type")?.unwrap_or(DEFAULT_TARGET_TYPE);
        let capture_screenshot = optional_bool(&input, "capture_screenshot")?.unwrap_or(true);

        Ok(ctx.client().read_screen(target_type, capture_screenshot).await)
    }
}
