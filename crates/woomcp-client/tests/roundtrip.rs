//! End-to-end round trip against a real in-process server: initialize,
//! session header echo, tool listing and invocation, bearer auth.

use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use woomcp_client::{ClientError, HttpConfig, McpClient};
use woomcp_server::{ClosureExecutor, McpServerState, ServerToolBuilder};

async fn spawn_server(api_key: Option<&str>) -> SocketAddr {
    let mut tools = HashMap::new();
    tools.insert(
        "echo".to_string(),
        ServerToolBuilder::new("echo")
            .description("Echo the input")
            .build(ClosureExecutor::new(|args| Ok(json!({ "echo": args })))),
    );

    let mut state = McpServerState::new("roundtrip-server", "0.1.0", tools);
    if let Some(key) = api_key {
        state = state.with_api_key(key);
    }

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, woomcp_server::create_router(state))
            .await
            .unwrap();
    });
    addr
}

fn client_for(addr: SocketAddr, auth_token: Option<&str>) -> McpClient {
    McpClient::http(HttpConfig {
        url: format!("http://{addr}/mcp"),
        auth_token: auth_token.map(str::to_string),
        timeout_secs: 5,
    })
    .unwrap()
}

#[tokio::test]
async fn initialize_then_list_then_call() {
    let addr = spawn_server(None).await;
    let client = client_for(addr, None);

    let init = client.initialize().await.unwrap();
    assert_eq!(init.server_info.name, "roundtrip-server");

    let tools = client.list_tools().await.unwrap();
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0].name, "echo");
    assert_eq!(tools[0].description.as_deref(), Some("Echo the input"));

    let result = client
        .call_tool("echo", json!({ "message": "ping" }))
        .await
        .unwrap();
    assert!(!result.is_error);
    assert_eq!(
        result.structured_content.unwrap()["echo"]["message"],
        "ping"
    );

    client.close().await.unwrap();
}

#[tokio::test]
async fn calls_without_initialize_are_rejected() {
    let addr = spawn_server(None).await;
    let client = client_for(addr, None);

    // No session id yet: the server refuses the request outright
    let err = client.list_tools().await.unwrap_err();
    assert!(matches!(err, ClientError::ProtocolError(_)));
}

#[tokio::test]
async fn bearer_token_round_trip() {
    let addr = spawn_server(Some("s3cret")).await;

    let client = client_for(addr, Some("s3cret"));
    client.initialize().await.unwrap();
    assert_eq!(client.list_tools().await.unwrap().len(), 1);
}

#[tokio::test]
async fn missing_token_is_auth_required() {
    let addr = spawn_server(Some("s3cret")).await;

    let client = client_for(addr, None);
    let err = client.initialize().await.unwrap_err();
    assert!(matches!(err, ClientError::AuthRequired));
}

#[tokio::test]
async fn wrong_token_is_auth_required() {
    let addr = spawn_server(Some("s3cret")).await;

    let client = client_for(addr, Some("wrong"));
    let err = client.initialize().await.unwrap_err();
    assert!(matches!(err, ClientError::AuthRequired));
}

#[tokio::test]
async fn unknown_tool_is_a_tool_error() {
    let addr = spawn_server(None).await;
    let client = client_for(addr, None);
    client.initialize().await.unwrap();

    let err = client.call_tool("nope", json!({})).await.unwrap_err();
    assert!(matches!(err, ClientError::ToolError(_)));
}
