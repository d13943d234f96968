//! Test runner tools

use async_trait::async_trait;
use serde_json::Value;

use super::args::required_str;
use super::{Tool, ToolContext};
use crate::client::Envelope;

pub struct RunPackageTestTool;

#[async_trait]
impl Tool for RunPackageTestTool {
    fn name(&self) -> &'static str {
        "run_package_test"
    }

    fn description(&self) -> &'static str {
        "Run the SUnit tests of a package. Returns a summary like \"5 ran, 5 passed, ...\"."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "package_name": {
                    "type": "string",
                    "description": "The package name to run tests for"
                }
            },
            "required": ["package_name"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<Envelope, eyre::Error> {
        let package_name = required_str(&input, "package_name")?;
        Ok(ctx.client().run_package_test(package_name).await)
    }
}

pub struct RunClassTestTool;

#[async_trait]
impl Tool for RunClassTestTool {
    fn name(&self) -> &'static str {
        "run_class_test"
    }

    fn description(&self) -> &'static str {
        "Run the SUnit tests of a single test class. Returns the same summary as run_package_test."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "class_name": {
                    "type": "string",
                    "description": "The class name to run tests for"
                }
            },
            "required": ["class_name"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<Envelope, eyre::Error> {
        let class_name = required_str(&input, "class_name")?;
        Ok(ctx.client().run_class_test(class_name).await)
    }
}
