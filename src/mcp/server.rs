//! MCP server - newline-delimited JSON-RPC over a byte stream
//!
//! Provides:
//! - The read/dispatch/write session loop
//! - `initialize`, `ping`, `tools/list` and `tools/call`
//! - Batch requests (arrays of messages)
//!
//! Requests are handled one at a time in arrival order: a slow `tools/call`
//! (an `eval` can take up to the 30 second transport timeout) holds back every
//! later line on the same session, `ping` included.

use log::{debug, info, warn};
use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{InteropError, Result};
use crate::mcp::messages::{CallToolResult, Incoming, PROTOCOL_VERSION, RpcError, RpcResponse};
use crate::tools::{ToolContext, ToolRegistry};

/// Name reported in `serverInfo`
pub const SERVER_NAME: &str = env!("CARGO_PKG_NAME");

/// Version reported in `serverInfo`
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A stdio MCP session bound to one registry and one tool context
pub struct McpServer {
    registry: ToolRegistry,
    ctx: ToolContext,
}

impl McpServer {
    pub fn new(registry: ToolRegistry, ctx: ToolContext) -> Self {
        Self { registry, ctx }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn context(&self) -> &ToolContext {
        &self.ctx
    }

    /// Run the session until the reader reaches EOF
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("MCP session started ({} tools)", self.registry.len());
        let mut line = Vec::new();

        loop {
            line.clear();
            let read = reader.read_until(b'\n', &mut line).await?;
            if read == 0 {
                break; // EOF - orchestrator went away
            }

            // Raw bytes: a line that is not UTF-8 is a parse error, not an IO error
            let trimmed = line.trim_ascii();
            if trimmed.is_empty() {
                continue;
            }

            if let Some(response) = self.handle_bytes(trimmed).await {
                let mut out = serde_json::to_string(&response)?;
                out.push('\n');
                writer.write_all(out.as_bytes()).await?;
                writer.flush().await?;
            }
        }

        info!("MCP session ended");
        Ok(())
    }

    /// Handle one line of text; `None` when nothing should be written back
    pub async fn handle_line(&self, line: &str) -> Option<Value> {
        self.handle_bytes(line.as_bytes()).await
    }

    /// Handle one raw line as read from the stream
    pub async fn handle_bytes(&self, line: &[u8]) -> Option<Value> {
        let value = match serde_json::from_slice::<Value>(line) {
            Ok(value) => value,
            Err(e) => {
                warn!("Unparseable message: {}", e);
                let response = RpcResponse::error(Value::Null, RpcError::parse_error(format!("Parse error: {}", e)));
                return serde_json::to_value(response).ok();
            }
        };

        match value {
            Value::Array(batch) if batch.is_empty() => {
                let response = RpcResponse::error(Value::Null, RpcError::invalid_request("Empty batch"));
                serde_json::to_value(response).ok()
            }
            Value::Array(batch) => {
                let mut responses = Vec::new();
                for message in batch {
                    if let Some(response) = self.handle_message(message).await {
                        responses.push(response);
                    }
                }
                if responses.is_empty() {
                    None
                } else {
                    serde_json::to_value(responses).ok()
                }
            }
            single => {
                let response = self.handle_message(single).await?;
                serde_json::to_value(response).ok()
            }
        }
    }

    /// Handle one decoded message
    pub async fn handle_message(&self, message: Value) -> Option<RpcResponse> {
        match Incoming::classify(message) {
            Incoming::Request { id, method, params } => {
                debug!("Request {} {}", id, method);
                let response = match self.dispatch(&method, params).await {
                    Ok(result) => RpcResponse::success(id, result),
                    Err(error) => RpcResponse::error(id, error),
                };
                Some(response)
            }
            Incoming::Notification { method, .. } => {
                debug!("Notification {}", method);
                None
            }
            Incoming::Response => None,
            Incoming::Invalid { id, error } => {
                warn!("Invalid request: {}", error.message);
                Some(RpcResponse::error(id, error))
            }
        }
    }

    async fn dispatch(&self, method: &str, params: Value) -> std::result::Result<Value, RpcError> {
        match method {
            "initialize" => Ok(self.initialize_payload()),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(self.tools_list_payload()),
            "tools/call" => self.call_tool(params).await,
            other => Err(RpcError::method_not_found(other)),
        }
    }

    fn initialize_payload(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": { "listChanged": false }
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": SERVER_VERSION
            }
        })
    }

    fn tools_list_payload(&self) -> Value {
        json!({ "tools": self.registry.definitions() })
    }

    async fn call_tool(&self, params: Value) -> std::result::Result<Value, RpcError> {
        let Value::Object(mut params) = params else {
            return Err(RpcError::invalid_params("tools/call params must be an object"));
        };

        let name = match params.remove("name") {
            Some(Value::String(name)) => name,
            _ => return Err(RpcError::invalid_params("tools/call requires a string 'name'")),
        };

        let arguments = match params.remove("arguments") {
            None | Some(Value::Null) => Value::Null,
            Some(args @ Value::Object(_)) => args,
            Some(_) => return Err(RpcError::invalid_params("tools/call 'arguments' must be an object")),
        };

        match self.registry.execute(&name, arguments, &self.ctx).await {
            Ok(result) => serde_json::to_value(CallToolResult::from(result))
                .map_err(|e| RpcError::internal_error(format!("Failed to encode tool result: {}", e))),
            Err(e @ InteropError::UnknownTool(_)) => Err(RpcError::invalid_params(e.to_string())),
            Err(e) => Err(RpcError::internal_error(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use tokio::io::BufReader;

    use crate::client::{Endpoint, PharoClient};
    use crate::mcp::messages::ErrorCode;

    fn server() -> McpServer {
        let ctx = ToolContext::new(Arc::new(PharoClient::new(Endpoint::default())));
        McpServer::new(ToolRegistry::standard(), ctx)
    }

    #[tokio::test]
    async fn test_initialize() {
        let response = server()
            .handle_line(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#)
            .await
            .unwrap();

        assert_eq!(response["id"], 1);
        assert_eq!(response["result"]["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(response["result"]["serverInfo"]["name"], SERVER_NAME);
        assert!(response["result"]["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn test_ping() {
        let response = server()
            .handle_line(r#"{"jsonrpc":"2.0","id":"p","method":"ping"}"#)
            .await
            .unwrap();
        assert_eq!(response, json!({"jsonrpc": "2.0", "id": "p", "result": {}}));
    }

    #[tokio::test]
    async fn test_tools_list() {
        let response = server()
            .handle_line(r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#)
            .await
            .unwrap();

        let tools = response["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 22);
        assert_eq!(tools[0]["name"], "eval");
        assert!(tools[0]["inputSchema"].is_object());
    }

    #[tokio::test]
    async fn test_notification_gets_no_reply() {
        let response = server()
            .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn test_parse_error() {
        let response = server().handle_line("{not json").await.unwrap();
        assert_eq!(response["id"], Value::Null);
        assert_eq!(response["error"]["code"], ErrorCode::PARSE_ERROR);
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_parse_error() {
        let response = server().handle_bytes(b"\xff\xfe").await.unwrap();
        assert_eq!(response["id"], Value::Null);
        assert_eq!(response["error"]["code"], ErrorCode::PARSE_ERROR);
    }

    #[tokio::test]
    async fn test_serve_continues_after_invalid_utf8() {
        let mut input = b"\xff\xfe\n".to_vec();
        input.extend_from_slice(br#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#);
        input.push(b'\n');
        let mut output = Vec::new();

        server().serve(BufReader::new(input.as_slice()), &mut output).await.unwrap();

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["error"]["code"], ErrorCode::PARSE_ERROR);
        assert_eq!(lines[1]["id"], 1);
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let response = server()
            .handle_line(r#"{"jsonrpc":"2.0","id":3,"method":"resources/list"}"#)
            .await
            .unwrap();
        assert_eq!(response["error"]["code"], ErrorCode::METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let response = server()
            .handle_line(r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"nope"}}"#)
            .await
            .unwrap();
        assert_eq!(response["error"]["code"], ErrorCode::INVALID_PARAMS);
        assert_eq!(response["error"]["message"], "Unknown tool: nope");
    }

    #[tokio::test]
    async fn test_call_with_bad_arguments_is_tool_error() {
        let response = server()
            .handle_line(r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"eval","arguments":{}}}"#)
            .await
            .unwrap();

        assert_eq!(response["result"]["isError"], true);
        assert_eq!(response["result"]["content"][0]["text"], "Invalid arguments: code is required");
    }

    #[tokio::test]
    async fn test_call_with_non_object_arguments() {
        let response = server()
            .handle_line(r#"{"jsonrpc":"2.0","id":6,"method":"tools/call","params":{"name":"eval","arguments":[1]}}"#)
            .await
            .unwrap();
        assert_eq!(response["error"]["code"], ErrorCode::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_batch() {
        let response = server()
            .handle_line(
                r#"[{"jsonrpc":"2.0","id":1,"method":"ping"},{"jsonrpc":"2.0","method":"notifications/initialized"}]"#,
            )
            .await
            .unwrap();

        let responses = response.as_array().unwrap();
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0]["id"], 1);
    }

    #[tokio::test]
    async fn test_serve_until_eof() {
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
            "\n\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"ping"}"#,
            "\n"
        );
        let mut output = Vec::new();

        server()
            .serve(BufReader::new(input.as_bytes()), &mut output)
            .await
            .unwrap();

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["id"], 1);
        assert_eq!(lines[1]["id"], 2);
    }
}
