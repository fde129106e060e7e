//! MCP transport abstraction.

use crate::error::ClientResult;
use async_trait::async_trait;
use woomcp_protocol::{JsonRpcNotification, JsonRpcRequest, JsonRpcResponse};

/// Transport trait for MCP communication.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and wait for a response.
    async fn request(&self, request: JsonRpcRequest) -> ClientResult<JsonRpcResponse>;

    /// Send a notification (no response expected).
    async fn notify(&self, notification: JsonRpcNotification) -> ClientResult<()>;

    /// Close the transport.
    async fn close(&self) -> ClientResult<()>;

    /// Check if the transport is connected.
    fn is_connected(&self) -> bool;
}
