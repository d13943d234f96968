//! MCP stdio surface
//!
//! The orchestrator talks JSON-RPC 2.0, one message per line, over the
//! process's stdin and stdout.

pub mod messages;
pub mod server;

pub use messages::{CallToolResult, ErrorCode, Incoming, PROTOCOL_VERSION, RpcError, RpcResponse, TextContent};
pub use server::McpServer;
