//! Server settings tools

use async_trait::async_trait;
use serde_json::Value;

use super::args::required_object;
use super::{Tool, ToolContext};
use crate::client::Envelope;

pub struct GetSettingsTool;

#[async_trait]
impl Tool for GetSettingsTool {
    fn name(&self) -> &'static str {
        "get_settings"
    }

    fn description(&self) -> &'static str {
        "Retrieve the current server configuration as a key/value mapping (e.g. stackSize)."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _input: Value, ctx: &ToolContext) -> Result<Envelope, eyre::Error> {
        Ok(ctx.client().get_settings().await)
    }
}

pub struct ApplySettingsTool;

#[async_trait]
impl Tool for ApplySettingsTool {
    fn name(&self) -> &'static str {
        "apply_settings"
    }

    fn description(&self) -> &'static str {
        "Modify the server configuration. Arbitrary keys are accepted and stored as given."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "settings": {
                    "type": "object",
                    "description": "Settings dictionary to apply to the server",
                    "additionalProperties": true
                }
            },
            "required": ["settings"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<Envelope, eyre::Error> {
        let settings = required_object(&input, "settings")?;
        Ok(ctx.client().apply_settings(settings).await)
    }
}
