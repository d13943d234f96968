//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - serve: run the MCP session on stdio (the default)
//! - tools: print the tool catalogue
//! - call: invoke one tool and print its envelope

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// pharo-interop-mcp - MCP tools for a live Pharo image
#[derive(Parser, Debug)]
#[command(name = "pharo-interop-mcp")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Host of the PharoSmalltalkInteropServer
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Port of the PharoSmalltalkInteropServer (overrides PHARO_SIS_PORT)
    #[arg(short, long, global = true)]
    pub port: Option<u16>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Serve MCP over stdin/stdout
    Serve,

    /// List the available tools
    Tools {
        /// Also print each tool's input schema
        #[arg(short, long)]
        schema: bool,
    },

    /// Call a single tool and print the result
    Call {
        /// Tool name (e.g. eval, list_packages)
        name: String,

        /// Tool arguments as a JSON object
        args: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse_no_args() {
        // No args means serve
        let cli = Cli::try_parse_from(["pharo-interop-mcp"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
        assert!(cli.config.is_none());
        assert!(cli.port.is_none());
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::try_parse_from(["pharo-interop-mcp", "-v"]).unwrap();
        assert!(cli.is_verbose());
    }

    #[test]
    fn test_cli_config_option() {
        let cli = Cli::try_parse_from(["pharo-interop-mcp", "-c", "/path/to/config.yml"]).unwrap();
        assert_eq!(cli.config.as_ref(), Some(&PathBuf::from("/path/to/config.yml")));
    }

    #[test]
    fn test_host_and_port_are_global() {
        let cli = Cli::try_parse_from([
            "pharo-interop-mcp",
            "serve",
            "--host",
            "pharo.local",
            "--port",
            "9001",
        ])
        .unwrap();
        assert_eq!(cli.command, Some(Commands::Serve));
        assert_eq!(cli.host.as_deref(), Some("pharo.local"));
        assert_eq!(cli.port, Some(9001));
    }

    #[test]
    fn test_invalid_port_rejected() {
        assert!(Cli::try_parse_from(["pharo-interop-mcp", "--port", "70000"]).is_err());
    }

    #[test]
    fn test_tools_command() {
        let cli = Cli::try_parse_from(["pharo-interop-mcp", "tools", "--schema"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Tools { schema: true }));
    }

    #[test]
    fn test_call_command() {
        let cli = Cli::try_parse_from(["pharo-interop-mcp", "call", "eval", r#"{"code":"1 + 1"}"#]).unwrap();
        match cli.command {
            Some(Commands::Call { name, args }) => {
                assert_eq!(name, "eval");
                assert_eq!(args.as_deref(), Some(r#"{"code":"1 + 1"}"#));
            }
            _ => panic!("Expected call command"),
        }
    }

    #[test]
    fn test_call_without_args() {
        let cli = Cli::try_parse_from(["pharo-interop-mcp", "call", "list_packages"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Call {
                name: "list_packages".to_string(),
                args: None
            })
        );
    }

    #[test]
    fn test_cli_debug_assert() {
        Cli::command().debug_assert();
    }
}
