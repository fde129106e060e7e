//! High-level MCP client.

use crate::error::{ClientError, ClientResult};
use crate::http::{HttpConfig, HttpTransport};
use crate::transport::Transport;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};
use woomcp_protocol::{
    CallToolParams, InitializeParams, InitializeResult, JsonRpcNotification, JsonRpcRequest,
    ListPromptsResult, ListResourcesResult, ListToolsResult, McpTool, ToolCallResult,
};

/// MCP client bound to one server endpoint.
pub struct McpClient {
    transport: Arc<dyn Transport>,
    /// Request ID counter.
    next_id: AtomicU64,
}

impl McpClient {
    /// Create a client over an arbitrary transport.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            next_id: AtomicU64::new(1),
        }
    }

    /// Create a client over the streamable-HTTP transport.
    pub fn http(config: HttpConfig) -> ClientResult<Self> {
        Ok(Self::new(Arc::new(HttpTransport::new(config)?)))
    }

    /// Get the next request ID.
    fn next_request_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Perform the initialization handshake.
    ///
    /// Sends `initialize` followed by the `notifications/initialized`
    /// notification. The transport remembers the session id from the
    /// response header.
    pub async fn initialize(&self) -> ClientResult<InitializeResult> {
        let init_params = InitializeParams::default();
        let request = JsonRpcRequest::new(
            self.next_request_id(),
            "initialize",
            Some(serde_json::to_value(&init_params)?),
        );

        let response = self.transport.request(request).await?;

        if let Some(error) = response.error {
            return Err(ClientError::InitializationFailed(error.message));
        }

        let init_result: InitializeResult = serde_json::from_value(
            response
                .result
                .ok_or_else(|| ClientError::protocol_error("Missing initialize result"))?,
        )
        .map_err(|e| ClientError::protocol_error(e.to_string()))?;

        info!(
            protocol_version = %init_result.protocol_version,
            server_name = %init_result.server_info.name,
            "MCP server initialized"
        );

        let notification = JsonRpcNotification::new("notifications/initialized", None);
        self.transport.notify(notification).await?;

        Ok(init_result)
    }

    /// List the tools the server exposes.
    pub async fn list_tools(&self) -> ClientResult<Vec<McpTool>> {
        let request = JsonRpcRequest::new(self.next_request_id(), "tools/list", None);
        let response = self.transport.request(request).await?;

        if let Some(error) = response.error {
            return Err(ClientError::protocol_error(error.message));
        }

        let result: ListToolsResult = serde_json::from_value(
            response
                .result
                .ok_or_else(|| ClientError::protocol_error("Missing tools/list result"))?,
        )
        .map_err(|e| ClientError::protocol_error(e.to_string()))?;

        debug!(tool_count = result.tools.len(), "Discovered MCP tools");
        Ok(result.tools)
    }

    /// List the resources the server exposes (none for this server).
    pub async fn list_resources(&self) -> ClientResult<ListResourcesResult> {
        let request = JsonRpcRequest::new(self.next_request_id(), "resources/list", None);
        let response = self.transport.request(request).await?;

        if let Some(error) = response.error {
            return Err(ClientError::protocol_error(error.message));
        }
        serde_json::from_value(
            response
                .result
                .ok_or_else(|| ClientError::protocol_error("Missing resources/list result"))?,
        )
        .map_err(|e| ClientError::protocol_error(e.to_string()))
    }

    /// List the prompts the server exposes (none for this server).
    pub async fn list_prompts(&self) -> ClientResult<ListPromptsResult> {
        let request = JsonRpcRequest::new(self.next_request_id(), "prompts/list", None);
        let response = self.transport.request(request).await?;

        if let Some(error) = response.error {
            return Err(ClientError::protocol_error(error.message));
        }
        serde_json::from_value(
            response
                .result
                .ok_or_else(|| ClientError::protocol_error("Missing prompts/list result"))?,
        )
        .map_err(|e| ClientError::protocol_error(e.to_string()))
    }

    /// Call a tool by name.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> ClientResult<ToolCallResult> {
        debug!(tool = name, "Calling MCP tool");

        let params = CallToolParams {
            name: name.to_string(),
            arguments: Some(arguments),
        };
        let request = JsonRpcRequest::new(
            self.next_request_id(),
            "tools/call",
            Some(serde_json::to_value(&params)?),
        );

        let response = self.transport.request(request).await?;

        if let Some(error) = response.error {
            return Err(ClientError::tool_error(error.message));
        }

        let result: ToolCallResult = serde_json::from_value(
            response
                .result
                .ok_or_else(|| ClientError::protocol_error("Missing tools/call result"))?,
        )
        .map_err(|e| ClientError::protocol_error(e.to_string()))?;

        Ok(result)
    }

    /// Close the connection (best-effort session teardown).
    pub async fn close(&self) -> ClientResult<()> {
        self.transport.close().await
    }
}
