//! Package tools - listing, Tonel export/import and Metacello install

use async_trait::async_trait;
use serde_json::Value;

use super::args::{optional_str, required_str};
use super::{Tool, ToolContext};
use crate::client::{DEFAULT_PACKAGE_PATH, Envelope};
use crate::error::InteropError;

fn package_name_schema(description: &str) -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "package_name": {
                "type": "string",
                "description": description
            }
        },
        "required": ["package_name"]
    })
}

pub struct ListPackagesTool;

#[async_trait]
impl Tool for ListPackagesTool {
    fn name(&self) -> &'static str {
        "list_packages"
    }

    fn description(&self) -> &'static str {
        "Get the names of all packages in the image."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _input: Value, ctx: &ToolContext) -> Result<Envelope, eyre::Error> {
        Ok(ctx.client().list_packages().await)
    }
}

pub struct ListClassesTool;

#[async_trait]
impl Tool for ListClassesTool {
    fn name(&self) -> &'static str {
        "list_classes"
    }

    fn description(&self) -> &'static str {
        "Get the names of the classes defined in a package."
    }

    fn input_schema(&self) -> Value {
        package_name_schema("The name of the package")
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<Envelope, eyre::Error> {
        let package_name = required_str(&input, "package_name")?;
        Ok(ctx.client().list_classes(package_name).await)
    }
}

pub struct ListExtendedClassesTool;

#[async_trait]
impl Tool for ListExtendedClassesTool {
    fn name(&self) -> &'static str {
        "list_extended_classes"
    }

    fn description(&self) -> &'static str {
        "Get the names of the classes a package extends with methods of its own."
    }

    fn input_schema(&self) -> Value {
        package_name_schema("The name of the package")
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<Envelope, eyre::Error> {
        let package_name = required_str(&input, "package_name")?;
        Ok(ctx.client().list_extended_classes(package_name).await)
    }
}

pub struct ListMethodsTool;

#[async_trait]
impl Tool for ListMethodsTool {
    fn name(&self) -> &'static str {
        "list_methods"
    }

    fn description(&self) -> &'static str {
        "Get the methods of a package, each formatted as \"ClassName>>#methodName\"."
    }

    fn input_schema(&self) -> Value {
        package_name_schema("The name of the package")
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<Envelope, eyre::Error> {
        let package_name = required_str(&input, "package_name")?;
        Ok(ctx.client().list_methods(package_name).await)
    }
}

pub struct ExportPackageTool;

#[async_trait]
impl Tool for ExportPackageTool {
    fn name(&self) -> &'static str {
        "export_package"
    }

    fn description(&self) -> &'static str {
        "Export a package in Tonel format. Returns a message naming the destination."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "package_name": {
                    "type": "string",
                    "description": "The name of the package to export"
                },
                "path": {
                    "type": "string",
                    "description": "The directory to export the package into",
                    "default": DEFAULT_PACKAGE_PATH
                }
            },
            "required": ["package_name"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<Envelope, eyre::Error> {
        let package_name = required_str(&input, "package_name")?;
        let path = optional_str(&input, "path")?;
        Ok(ctx.client().export_package(package_name, path).await)
    }
}

pub struct ImportPackageTool;

#[async_trait]
impl Tool for ImportPackageTool {
    fn name(&self) -> &'static str {
        "import_package"
    }

    fn description(&self) -> &'static str {
        "Import a Tonel package from a directory. Servers speaking the older protocol accept \
         the raw Tonel content instead."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "package_name": {
                    "type": "string",
                    "description": "The name of the package to import"
                },
                "path": {
                    "type": "string",
                    "description": "The directory holding the package",
                    "default": DEFAULT_PACKAGE_PATH
                },
                "tonel": {
                    "type": "string",
                    "description": "Raw Tonel content; used only when package_name is absent"
                }
            }
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<Envelope, eyre::Error> {
        let package_name = optional_str(&input, "package_name")?;
        let tonel = optional_str(&input, "tonel")?;

        match (package_name, tonel) {
            (Some(package_name), _) => {
                let path = optional_str(&input, "path")?;
                Ok(ctx.client().import_package(package_name, path).await)
            }
            (None, Some(tonel)) => Ok(ctx.client().import_tonel(tonel).await),
            (None, None) => Err(InteropError::InvalidArguments(
                "package_name or tonel is required".to_string(),
            )
            .into()),
        }
    }
}

pub struct InstallProjectTool;

#[async_trait]
impl Tool for InstallProjectTool {
    fn name(&self) -> &'static str {
        "install_project"
    }

    fn description(&self) -> &'static str {
        "Install a project with Metacello from a repository URL."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "project_name": {
                    "type": "string",
                    "description": "The name of the project to install"
                },
                "repository_url": {
                    "type": "string",
                    "description": "The repository URL for the project"
                },
                "load_groups": {
                    "type": "string",
                    "description": "Comma-separated list of groups to load"
                }
            },
            "required": ["project_name", "repository_url"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<Envelope, eyre::Error> {
        let project_name = required_str(&input, "project_name")?;
        let repository_url = required_str(&input, "repository_url")?;
        let load_groups = optional_str(&input, "load_groups")?;

        Ok(ctx
            .client()
            .install_project(project_name, repository_url, load_groups)
            .await)
    }
}
