//! List the tools exposed by a running woomcp server.
//!
//! ```sh
//! MCP_URL=http://127.0.0.1:8000/mcp cargo run -p woomcp-client --example list_tools
//! ```

use woomcp_client::{HttpConfig, McpClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let url = std::env::var("MCP_URL")
        .unwrap_or_else(|_| "http://127.0.0.1:8000/mcp".to_string());
    let auth_token = std::env::var("MCP_API_KEY").ok();

    println!("Connecting to MCP server at {url}");
    let client = McpClient::http(HttpConfig {
        url,
        auth_token,
        ..Default::default()
    })?;

    client.initialize().await?;
    println!("Session initialized");

    let tools = client.list_tools().await?;
    println!("Available tools ({}):", tools.len());
    for tool in &tools {
        println!("  {}", tool.name);
        if let Some(description) = &tool.description {
            println!("    {description}");
        }
        if let Some(schema) = &tool.input_schema {
            if let Some(properties) = schema.get("properties").and_then(|p| p.as_object()) {
                let required: Vec<&str> = schema
                    .get("required")
                    .and_then(|r| r.as_array())
                    .map(|r| r.iter().filter_map(|v| v.as_str()).collect())
                    .unwrap_or_default();
                for name in properties.keys() {
                    let marker = if required.contains(&name.as_str()) {
                        "required"
                    } else {
                        "optional"
                    };
                    println!("    - {name} ({marker})");
                }
            }
        }
    }

    client.close().await?;
    Ok(())
}
