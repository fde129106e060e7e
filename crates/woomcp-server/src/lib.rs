//! MCP streamable-HTTP server for woomcp.
//!
//! Serves a set of registered tools over a single HTTP path speaking
//! JSON-RPC 2.0. A successful `initialize` mints a session id that is
//! returned in the `Mcp-Session-Id` response header; clients echo it on
//! every subsequent call. Responses are plain JSON, or a single-event
//! SSE stream when the client accepts `text/event-stream`.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐   POST /mcp    ┌──────────────────┐
//! │ MCP client │ ─────────────► │  auth middleware │
//! └────────────┘                └────────┬─────────┘
//!                                        ▼
//!                               ┌──────────────────┐
//!                               │ session + dispatch│
//!                               └────────┬─────────┘
//!                                        ▼
//!                               ┌──────────────────┐
//!                               │   tool registry  │
//!                               └──────────────────┘
//! ```

mod auth;
mod http;
mod session;
mod tools;

pub use http::{create_router, McpServerState};
pub use session::SessionManager;
pub use tools::{ClosureExecutor, ServerTool, ServerToolBuilder, ToolExecutor};
