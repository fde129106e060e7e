//! MCP streamable-HTTP client for woomcp.
//!
//! Speaks JSON-RPC 2.0 to a single MCP endpoint over HTTP POST. The
//! session id minted by `initialize` (delivered in the `Mcp-Session-Id`
//! response header) is remembered and echoed on every later call.
//! Responses may arrive as plain JSON or as a one-event SSE stream; both
//! are handled transparently.
//!
//! # Example
//!
//! ```no_run
//! use woomcp_client::{HttpConfig, McpClient};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = McpClient::http(HttpConfig {
//!     url: "http://127.0.0.1:8000/mcp".to_string(),
//!     auth_token: Some("secret".to_string()),
//!     ..Default::default()
//! })?;
//!
//! client.initialize().await?;
//! let tools = client.list_tools().await?;
//! let result = client
//!     .call_tool("search_products", serde_json::json!({ "query": "hoodie" }))
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod http;
mod transport;

pub use client::McpClient;
pub use error::{ClientError, ClientResult};
pub use http::{HttpConfig, HttpTransport};
pub use transport::Transport;
