//! MCP server implementation.
//!
//! Reads one JSON-RPC message per line, answers on the writer, and keeps
//! going until the reader reaches EOF. Requests are handled strictly one at
//! a time; a tool call (including its service round trip) finishes before
//! the next line is read.

use crate::dispatcher::Dispatcher;
use crate::envelope::GatewayErrorKind;
use crate::error::McpError;
use crate::protocol::*;
use dynamo_core::McpConfig;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

/// The MCP server.
pub struct McpServer {
    config: McpConfig,
    dispatcher: Dispatcher,
}

impl McpServer {
    /// Create a new MCP server.
    pub fn new(config: McpConfig, dispatcher: Dispatcher) -> Self {
        Self { config, dispatcher }
    }

    /// The dispatcher tool calls are routed through.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Serve over the process's stdin/stdout.
    pub async fn run_stdio(&self) -> Result<(), McpError> {
        tracing::info!(
            server = %self.config.name,
            tools = self.dispatcher.registry().len(),
            "Starting MCP server with stdio transport"
        );
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Serve line-delimited JSON-RPC until `reader` reaches EOF.
    ///
    /// Only I/O failures on the streams themselves end the loop early.
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> Result<(), McpError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }

            let response = match std::str::from_utf8(&buf) {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => self.handle_line(line.trim()).await,
                Err(err) => Some(JsonRpcResponse::error(
                    None,
                    PARSE_ERROR,
                    format!("Parse error: {}", err),
                )),
            };

            if let Some(response) = response {
                let mut frame = serde_json::to_vec(&response)?;
                frame.push(b'\n');
                writer.write_all(&frame).await?;
                writer.flush().await?;
            }
        }

        tracing::info!("Input closed, MCP server stopping");
        Ok(())
    }

    /// Handle one raw line. Returns `None` when no reply is due.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(err) => {
                tracing::debug!(error = %err, "Unparseable JSON-RPC frame");
                return Some(JsonRpcResponse::error(
                    None,
                    PARSE_ERROR,
                    format!("Parse error: {}", err),
                ));
            }
        };

        let id = value.get("id").cloned();
        match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) => self.handle_request(request).await,
            Err(err) => Some(JsonRpcResponse::error(
                id,
                INVALID_REQUEST,
                format!("Invalid request: {}", err),
            )),
        }
    }

    /// Handle a JSON-RPC request. Notifications never get a reply.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            tracing::debug!(method = %request.method, "Notification received");
            return None;
        }

        let id = request.id.clone();
        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => self.handle_list_tools(id),
            "tools/call" => self.handle_call_tool(id, request.params).await,
            _ => JsonRpcResponse::error(
                id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ),
        };
        Some(response)
    }

    fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = InitializeResult {
            protocol_version: self.config.protocol_version.clone(),
            server_info: ServerInfo {
                name: self.config.name.clone(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            capabilities: json!({
                "tools": {
                    "listChanged": false
                }
            }),
        };
        reply(id, &result)
    }

    fn handle_list_tools(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = ListToolsResponse {
            tools: self.dispatcher.registry().definitions(),
        };
        reply(id, &result)
    }

    async fn handle_call_tool(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: CallToolParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(id, INVALID_PARAMS, format!("Invalid params: {}", e));
                }
            },
            None => return JsonRpcResponse::error(id, INVALID_PARAMS, "Missing params"),
        };

        // A panic inside an adapter or backend surfaces as an error-flagged reply.
        let CallToolParams { name, arguments } = params;
        let dispatcher = self.dispatcher.clone();
        let tool = name.clone();
        let call = tokio::spawn(async move { dispatcher.dispatch(&tool, &arguments).await });

        let response = match call.await {
            Ok(envelope) => {
                let is_error = envelope.error_kind == Some(GatewayErrorKind::UnknownTool);
                CallToolResponse::text(envelope.to_json_text(), is_error)
            }
            Err(err) => {
                tracing::error!(tool = %name, error = %err, "Tool call aborted");
                CallToolResponse::text(format!("Tool call failed: {}", err), true)
            }
        };
        reply(id, &response)
    }
}

fn reply<T: serde::Serialize>(id: Option<Value>, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(err) => JsonRpcResponse::error(id, INTERNAL_ERROR, err.to_string()),
    }
}
