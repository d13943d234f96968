//! CLI module for pharo-interop-mcp - command-line interface and subcommands.
//!
//! Serving MCP on stdio is the default; the other subcommands are for
//! poking at a running image by hand.

pub mod commands;

pub use commands::Cli;
