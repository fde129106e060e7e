//! WooCommerce integration for woomcp.
//!
//! Everything that knows about the upstream store lives here: the
//! environment-sourced [`Config`], the authenticated REST [`WooClient`],
//! the [`Product`]/[`Order`] data model, and the tool handlers that the
//! MCP server dispatches to (see [`registry`]).

mod client;
mod config;
mod error;
mod models;
mod tools;

pub use client::WooClient;
pub use config::{Config, ConfigError};
pub use error::{WooError, WooResult};
pub use models::{Order, Product};
pub use tools::registry;
