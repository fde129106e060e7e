//! Demonstrate bearer-token authentication against a secured server.
//!
//! Run the server with MCP_API_KEY set, then:
//!
//! ```sh
//! MCP_API_KEY=secret cargo run -p woomcp-client --example authenticated
//! ```

use woomcp_client::{ClientError, HttpConfig, McpClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let url = std::env::var("MCP_URL")
        .unwrap_or_else(|_| "http://127.0.0.1:8000/mcp".to_string());
    let api_key = std::env::var("MCP_API_KEY").ok();

    // First, show what happens without credentials
    println!("Connecting without credentials...");
    let anonymous = McpClient::http(HttpConfig {
        url: url.clone(),
        auth_token: None,
        ..Default::default()
    })?;
    match anonymous.initialize().await {
        Ok(_) => println!("  accepted - the server is running in insecure dev mode"),
        Err(ClientError::AuthRequired) => println!("  rejected with 401, as expected"),
        Err(e) => println!("  failed: {e}"),
    }

    let Some(api_key) = api_key else {
        println!("\nSet MCP_API_KEY to demonstrate an authenticated session");
        return Ok(());
    };

    println!("\nConnecting with the bearer token...");
    let client = McpClient::http(HttpConfig {
        url,
        auth_token: Some(api_key),
        ..Default::default()
    })?;
    client.initialize().await?;

    let tools = client.list_tools().await?;
    println!("  authenticated session established, {} tools visible:", tools.len());
    for tool in &tools {
        println!("    - {}", tool.name);
    }

    client.close().await?;
    Ok(())
}
