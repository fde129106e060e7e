//! Tool registry types for the MCP server.

use serde_json::Value;
use std::sync::Arc;

/// A tool registered with the MCP server.
#[derive(Clone)]
pub struct ServerTool {
    /// Tool name/ID.
    pub name: String,
    /// Tool description.
    pub description: String,
    /// JSON Schema for parameters.
    pub parameters: Value,
    /// Tool executor function.
    pub executor: Arc<dyn ToolExecutor>,
}

impl std::fmt::Debug for ServerTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerTool")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}

/// Trait for tool execution.
///
/// The `Ok` value is the structured result payload carried in
/// `structuredContent`; the `Err` string becomes the text of an
/// `isError` tool result.
#[async_trait::async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Execute the tool with given arguments.
    async fn execute(&self, args: Value) -> Result<Value, String>;
}

/// Builder for ServerTool.
pub struct ServerToolBuilder {
    name: String,
    description: String,
    parameters: Value,
}

impl ServerToolBuilder {
    /// Create a new tool builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {}
            }),
        }
    }

    /// Set the tool description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the parameters schema.
    pub fn parameters(mut self, parameters: Value) -> Self {
        self.parameters = parameters;
        self
    }

    /// Build the tool with an executor.
    pub fn build(self, executor: impl ToolExecutor + 'static) -> ServerTool {
        ServerTool {
            name: self.name,
            description: self.description,
            parameters: self.parameters,
            executor: Arc::new(executor),
        }
    }
}

/// Simple executor that wraps a closure.
pub struct ClosureExecutor<F>
where
    F: Fn(Value) -> Result<Value, String> + Send + Sync,
{
    f: F,
}

impl<F> ClosureExecutor<F>
where
    F: Fn(Value) -> Result<Value, String> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait::async_trait]
impl<F> ToolExecutor for ClosureExecutor<F>
where
    F: Fn(Value) -> Result<Value, String> + Send + Sync,
{
    async fn execute(&self, args: Value) -> Result<Value, String> {
        (self.f)(args)
    }
}
