//! Streamable-HTTP transport for the MCP server.
//!
//! A single path accepts JSON-RPC requests via POST. `initialize` mints
//! a session whose id is returned in the `Mcp-Session-Id` response
//! header; every other request must echo a known session id. Responses
//! are encoded as plain JSON, or as a one-event SSE stream when the
//! request's `Accept` header admits `text/event-stream`. DELETE
//! terminates the session named by the header.

use crate::auth::api_key_auth;
use crate::session::SessionManager;
use crate::tools::ServerTool;
use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::post,
    Router,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};
use woomcp_protocol::{
    CallToolParams, InitializeResult, JsonRpcRequest, JsonRpcResponse, ListPromptsResult,
    ListResourcesResult, ListToolsResult, McpTool, ServerCapabilities, ServerInfo, ToolCallResult,
    ToolsCapability, INVALID_PARAMS, METHOD_NOT_FOUND, PARSE_ERROR, PROTOCOL_VERSION, SERVER_ERROR,
    SESSION_ID_HEADER,
};

/// Shared state for the MCP server.
#[derive(Clone)]
pub struct McpServerState {
    /// Server name.
    name: String,
    /// Server version.
    version: String,
    /// Registered tools.
    tools: Arc<HashMap<String, ServerTool>>,
    /// Active sessions.
    sessions: Arc<SessionManager>,
    /// Optional API key; when set, requests must carry it as a bearer token.
    api_key: Option<String>,
}

impl McpServerState {
    /// Create new server state from a tool registry.
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        tools: HashMap<String, ServerTool>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            tools: Arc::new(tools),
            sessions: Arc::new(SessionManager::new()),
            api_key: None,
        }
    }

    /// Require a bearer token on every request.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Check if authentication is enabled.
    pub fn has_auth(&self) -> bool {
        self.api_key.is_some()
    }

    pub(crate) fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Handle a JSON-RPC request. Returns None for notifications.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        debug!(method = %request.method, id = ?request.id, "Handling MCP request");

        // Notifications (no id) don't expect a response
        let id = match request.id {
            Some(id) => id,
            None => {
                match request.method.as_str() {
                    "notifications/initialized" => {
                        debug!("Received initialized notification");
                    }
                    _ => {
                        debug!(method = %request.method, "Received unknown notification");
                    }
                }
                return None;
            }
        };

        match request.method.as_str() {
            "initialize" => Some(self.handle_initialize(id)),
            "tools/list" => Some(self.handle_list_tools(id)),
            "tools/call" => Some(self.handle_call_tool(id, request.params).await),
            "resources/list" => Some(success_response(id, ListResourcesResult::default())),
            "prompts/list" => Some(success_response(id, ListPromptsResult::default())),
            _ => Some(JsonRpcResponse::error(id, METHOD_NOT_FOUND, "Method not found")),
        }
    }

    /// Handle the initialize request.
    fn handle_initialize(&self, id: u64) -> JsonRpcResponse {
        info!(name = %self.name, version = %self.version, "Initializing MCP session");

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
                resources: None,
                prompts: None,
            },
            server_info: ServerInfo {
                name: self.name.clone(),
                version: Some(self.version.clone()),
            },
        };

        success_response(id, result)
    }

    /// Handle the tools/list request.
    fn handle_list_tools(&self, id: u64) -> JsonRpcResponse {
        debug!(count = self.tools.len(), "Listing MCP tools");

        let mut tools: Vec<McpTool> = self
            .tools
            .values()
            .map(|tool| McpTool {
                name: tool.name.clone(),
                description: Some(tool.description.clone()),
                input_schema: Some(tool.parameters.clone()),
            })
            .collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));

        success_response(id, ListToolsResult { tools })
    }

    /// Handle the tools/call request.
    async fn handle_call_tool(&self, id: u64, params: Option<Value>) -> JsonRpcResponse {
        let params: CallToolParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(id, INVALID_PARAMS, format!("Invalid params: {e}"));
                }
            },
            None => {
                return JsonRpcResponse::error(id, INVALID_PARAMS, "Missing params");
            }
        };

        debug!(tool = %params.name, "Calling MCP tool");

        let tool = match self.tools.get(&params.name) {
            Some(t) => t,
            None => {
                return JsonRpcResponse::error(
                    id,
                    INVALID_PARAMS,
                    format!("Unknown tool: {}", params.name),
                );
            }
        };

        let args = params
            .arguments
            .unwrap_or(Value::Object(serde_json::Map::new()));

        let tool_result = match tool.executor.execute(args).await {
            Ok(value) => {
                debug!(tool = %params.name, "Tool completed successfully");
                ToolCallResult::structured(value)
            }
            Err(e) => {
                warn!(tool = %params.name, error = %e, "Tool failed");
                ToolCallResult::failed(e)
            }
        };

        success_response(id, tool_result)
    }
}

fn success_response(id: u64, result: impl Serialize) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, SERVER_ERROR, format!("Serialization failed: {e}")),
    }
}

/// Create the MCP router.
///
/// If the state has an API key configured, every request to the
/// protocol path requires `Authorization: Bearer <key>` (or the bare
/// key as the header value).
pub fn create_router(state: McpServerState) -> Router {
    use tower_http::cors::{Any, CorsLayer};
    use tower_http::trace::TraceLayer;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new().route("/mcp", post(mcp_post).delete(mcp_delete));

    let router = if state.has_auth() {
        info!("MCP API key authentication enabled");
        router.layer(axum::middleware::from_fn_with_state(
            state.clone(),
            api_key_auth,
        ))
    } else {
        warn!("MCP endpoint serving without authentication");
        router
    };

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn protocol_error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(serde_json::json!({
            "error": { "code": SERVER_ERROR, "message": message }
        })),
    )
        .into_response()
}

/// POST handler: one JSON-RPC request in, one response (or 202) out.
async fn mcp_post(
    State(state): State<McpServerState>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let request: JsonRpcRequest = match serde_json::from_str(&body) {
        Ok(request) => request,
        Err(e) => {
            debug!(error = %e, "Rejecting malformed request body");
            return (
                StatusCode::BAD_REQUEST,
                Json(JsonRpcResponse::error(0, PARSE_ERROR, format!("Parse error: {e}"))),
            )
                .into_response();
        }
    };

    // initialize mints a session; everything else must echo a known one.
    let mut minted = None;
    if request.method == "initialize" && !request.is_notification() {
        minted = Some(state.sessions.create().await);
    } else {
        match headers
            .get(SESSION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
        {
            None => return protocol_error(StatusCode::BAD_REQUEST, "Missing session ID"),
            Some(id) if !state.sessions.contains(id).await => {
                return protocol_error(StatusCode::NOT_FOUND, "Session not found");
            }
            Some(_) => {}
        }
    }

    let wants_sse = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/event-stream"));

    match state.handle_request(request).await {
        None => StatusCode::ACCEPTED.into_response(),
        Some(response) => encode_response(wants_sse, minted, &response),
    }
}

/// DELETE handler: terminate the session named by the header.
async fn mcp_delete(State(state): State<McpServerState>, headers: HeaderMap) -> Response {
    let session_id = headers
        .get(SESSION_ID_HEADER)
        .and_then(|v| v.to_str().ok());

    match session_id {
        Some(id) if state.sessions.remove(id).await => StatusCode::NO_CONTENT.into_response(),
        _ => protocol_error(StatusCode::NOT_FOUND, "Session not found"),
    }
}

/// Encode a JSON-RPC response as JSON or a single-event SSE stream.
fn encode_response(
    wants_sse: bool,
    session_id: Option<String>,
    response: &JsonRpcResponse,
) -> Response {
    let mut headers = HeaderMap::new();
    if let Some(id) = session_id {
        if let Ok(value) = HeaderValue::from_str(&id) {
            headers.insert(SESSION_ID_HEADER, value);
        }
    }

    if wants_sse {
        let json = match serde_json::to_string(response) {
            Ok(json) => json,
            Err(e) => {
                return protocol_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    &format!("Encoding failed: {e}"),
                );
            }
        };
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/event-stream"),
        );
        (StatusCode::OK, headers, format!("event: message\ndata: {json}\n\n")).into_response()
    } else {
        (StatusCode::OK, headers, Json(response)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{ClosureExecutor, ServerToolBuilder};
    use woomcp_protocol::ToolContent;

    fn create_test_state() -> McpServerState {
        let mut tools = HashMap::new();
        tools.insert(
            "echo".to_string(),
            ServerToolBuilder::new("echo")
                .description("Echo the input")
                .parameters(serde_json::json!({
                    "type": "object",
                    "properties": {
                        "message": { "type": "string" }
                    }
                }))
                .build(ClosureExecutor::new(|args| {
                    let msg = args
                        .get("message")
                        .and_then(|v| v.as_str())
                        .unwrap_or("no message");
                    Ok(serde_json::json!({ "echo": msg }))
                })),
        );

        McpServerState::new("test-server", "1.0.0", tools)
    }

    #[test]
    fn test_state_creation() {
        let state = create_test_state();
        assert_eq!(state.name, "test-server");
        assert_eq!(state.version, "1.0.0");
        assert_eq!(state.tools.len(), 1);
        assert!(!state.has_auth());
    }

    #[test]
    fn test_state_with_api_key() {
        let state = create_test_state().with_api_key("test-secret");
        assert!(state.has_auth());
        assert_eq!(state.api_key(), Some("test-secret"));
    }

    #[test]
    fn test_initialize_response() {
        let state = create_test_state();
        let response = state.handle_initialize(1);

        assert_eq!(response.id, 1);
        assert!(response.error.is_none());

        let result: InitializeResult = serde_json::from_value(response.result.unwrap()).unwrap();
        assert_eq!(result.server_info.name, "test-server");
        assert_eq!(result.protocol_version, PROTOCOL_VERSION);
    }

    #[test]
    fn test_list_tools_response() {
        let state = create_test_state();
        let response = state.handle_list_tools(2);

        assert_eq!(response.id, 2);
        assert!(response.error.is_none());

        let result: ListToolsResult = serde_json::from_value(response.result.unwrap()).unwrap();
        assert_eq!(result.tools.len(), 1);
        assert_eq!(result.tools[0].name, "echo");
        assert!(result.tools[0].input_schema.is_some());
    }

    #[tokio::test]
    async fn test_call_tool() {
        let state = create_test_state();
        let params = serde_json::json!({
            "name": "echo",
            "arguments": { "message": "hello" }
        });

        let response = state.handle_call_tool(3, Some(params)).await;
        assert_eq!(response.id, 3);
        assert!(response.error.is_none());

        let result: ToolCallResult = serde_json::from_value(response.result.unwrap()).unwrap();
        assert!(!result.is_error);
        assert_eq!(result.structured_content.unwrap()["echo"], "hello");
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let state = create_test_state();
        let params = serde_json::json!({
            "name": "unknown_tool",
            "arguments": {}
        });

        let response = state.handle_call_tool(4, Some(params)).await;
        assert_eq!(response.id, 4);
        assert_eq!(response.error.unwrap().code, INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_call_tool_missing_params() {
        let state = create_test_state();
        let response = state.handle_call_tool(5, None).await;
        assert_eq!(response.error.unwrap().code, INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_call_tool_invalid_params() {
        let state = create_test_state();
        let params = serde_json::json!("invalid-not-object");
        let response = state.handle_call_tool(6, Some(params)).await;
        assert_eq!(response.error.unwrap().code, INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_call_tool_no_arguments() {
        let state = create_test_state();
        let params = serde_json::json!({ "name": "echo" });

        let response = state.handle_call_tool(7, Some(params)).await;
        // Should work with default args
        assert!(response.error.is_none());
    }

    #[tokio::test]
    async fn test_tool_execution_error_becomes_tool_result() {
        let mut tools = HashMap::new();
        tools.insert(
            "failing_tool".to_string(),
            ServerToolBuilder::new("failing_tool")
                .description("A tool that always fails")
                .build(ClosureExecutor::new(|_| {
                    Err("Tool execution failed".to_string())
                })),
        );
        let state = McpServerState::new("test-server", "1.0.0", tools);

        let params = serde_json::json!({ "name": "failing_tool", "arguments": {} });
        let response = state.handle_call_tool(100, Some(params)).await;

        // The call itself succeeds; the failure is carried in the result
        assert!(response.error.is_none());
        let result: ToolCallResult = serde_json::from_value(response.result.unwrap()).unwrap();
        assert!(result.is_error);
        match &result.content[0] {
            ToolContent::Text { text } => assert_eq!(text, "Tool execution failed"),
        }
    }

    #[tokio::test]
    async fn test_handle_request_unknown_method() {
        let state = create_test_state();
        let request = JsonRpcRequest::new(4, "unknown/method", None);

        let response = state.handle_request(request).await.unwrap();
        assert_eq!(response.error.unwrap().code, METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_handle_request_resources_and_prompts() {
        let state = create_test_state();

        let response = state
            .handle_request(JsonRpcRequest::new(5, "resources/list", None))
            .await
            .unwrap();
        assert_eq!(response.result.unwrap()["resources"], serde_json::json!([]));

        let response = state
            .handle_request(JsonRpcRequest::new(6, "prompts/list", None))
            .await
            .unwrap();
        assert_eq!(response.result.unwrap()["prompts"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_handle_request_notification() {
        let state = create_test_state();
        let request: JsonRpcRequest = serde_json::from_str(
            r#"{"jsonrpc": "2.0", "method": "notifications/initialized"}"#,
        )
        .unwrap();

        let response = state.handle_request(request).await;
        assert!(response.is_none());
    }

    #[test]
    fn test_encode_response_json() {
        let response = JsonRpcResponse::success(1, serde_json::json!({"ok": true}));
        let encoded = encode_response(false, Some("session-1".to_string()), &response);

        assert_eq!(encoded.status(), StatusCode::OK);
        assert_eq!(
            encoded.headers().get(SESSION_ID_HEADER).unwrap(),
            "session-1"
        );
    }

    #[test]
    fn test_encode_response_sse() {
        let response = JsonRpcResponse::success(1, serde_json::json!({"ok": true}));
        let encoded = encode_response(true, None, &response);

        assert_eq!(
            encoded.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/event-stream"
        );
        assert!(encoded.headers().get(SESSION_ID_HEADER).is_none());
    }

    #[test]
    fn test_create_router() {
        let _router = create_router(create_test_state());
    }

    #[test]
    fn test_create_router_with_auth() {
        let _router = create_router(create_test_state().with_api_key("test-key"));
    }
}
