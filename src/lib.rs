//! pharo-interop-mcp - MCP tools for a live Pharo Smalltalk image
//!
//! Every tool forwards to the PharoSmalltalkInteropServer over HTTP and
//! returns the server's `{success, result | error}` envelope unchanged.

pub mod client;
pub mod config;
pub mod error;
pub mod mcp;
pub mod tools;

pub use error::{InteropError, Result};
