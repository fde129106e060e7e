//! Streamable-HTTP transport.
//!
//! Requests go out as HTTP POST to a single endpoint; the response is
//! either plain JSON or a one-event SSE stream whose single `data:`
//! line carries the JSON-RPC response. The transport remembers the
//! `Mcp-Session-Id` header from the initialize response and echoes it
//! on every subsequent request.

use crate::error::{ClientError, ClientResult};
use crate::transport::Transport;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, warn};
use woomcp_protocol::{JsonRpcNotification, JsonRpcRequest, JsonRpcResponse, SESSION_ID_HEADER};

/// HTTP transport configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// The protocol endpoint URL (e.g. `http://127.0.0.1:8000/mcp`).
    pub url: String,
    /// Optional bearer token.
    pub auth_token: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            auth_token: None,
            timeout_secs: 60,
        }
    }
}

/// Streamable-HTTP transport for a single MCP server.
pub struct HttpTransport {
    config: HttpConfig,
    client: Client,
    connected: AtomicBool,
    /// Session id minted by the server on initialize.
    session_id: RwLock<Option<String>>,
}

impl HttpTransport {
    /// Create a new HTTP transport.
    pub fn new(config: HttpConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                ClientError::connection_failed(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            config,
            client,
            connected: AtomicBool::new(false),
            session_id: RwLock::new(None),
        })
    }

    /// The session id currently in use, if any.
    pub async fn session_id(&self) -> Option<String> {
        self.session_id.read().await.clone()
    }

    /// Build a request with common headers.
    fn build_request(&self, body: &str, session_id: Option<&str>) -> reqwest::RequestBuilder {
        let mut req = self
            .client
            .post(&self.config.url)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json, text/event-stream")
            .body(body.to_string());

        if let Some(ref token) = self.config.auth_token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }
        if let Some(id) = session_id {
            req = req.header(SESSION_ID_HEADER, id);
        }

        req
    }

    /// Remember the session id from a response, if the server sent one.
    async fn capture_session_id(&self, response: &reqwest::Response) {
        if let Some(value) = response.headers().get(SESSION_ID_HEADER) {
            if let Ok(id) = value.to_str() {
                debug!(session_id = %id, "Captured MCP session id");
                *self.session_id.write().await = Some(id.to_string());
            }
        }
    }

    /// Decode a response body into a JSON-RPC response.
    async fn parse_response(&self, response: reqwest::Response) -> ClientResult<JsonRpcResponse> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(ClientError::AuthRequired);
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ClientError::protocol_error(format!(
                "Server returned {status}: {text}"
            )));
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let text = response
            .text()
            .await
            .map_err(|e| ClientError::protocol_error(format!("Failed to read response: {e}")))?;

        if content_type.contains("text/event-stream") {
            let data = extract_sse_frame(&text).ok_or_else(|| {
                ClientError::protocol_error("SSE stream ended without a data frame")
            })?;
            serde_json::from_str(data)
                .map_err(|e| ClientError::protocol_error(format!("Invalid SSE payload: {e}")))
        } else {
            serde_json::from_str(&text)
                .map_err(|e| ClientError::protocol_error(format!("Invalid JSON response: {e}")))
        }
    }

    fn map_send_error(e: reqwest::Error) -> ClientError {
        if e.is_timeout() {
            ClientError::Timeout
        } else if e.is_connect() {
            ClientError::connection_failed(format!("Connection failed: {e}"))
        } else {
            ClientError::protocol_error(format!("Request failed: {e}"))
        }
    }
}

/// Extract the payload of exactly one SSE frame.
///
/// The server encodes a response as a single event; the first `data:`
/// line is the whole payload. Returns None when the body carries no
/// data line at all (including empty bodies).
pub(crate) fn extract_sse_frame(body: &str) -> Option<&str> {
    body.lines()
        .find_map(|line| line.strip_prefix("data: "))
        .map(str::trim)
        .filter(|data| !data.is_empty())
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(&self, request: JsonRpcRequest) -> ClientResult<JsonRpcResponse> {
        let request_json = serde_json::to_string(&request)?;
        let session_id = self.session_id().await;

        debug!(id = ?request.id, method = %request.method, "Sending MCP request");

        let response = self
            .build_request(&request_json, session_id.as_deref())
            .send()
            .await
            .map_err(Self::map_send_error)?;

        self.capture_session_id(&response).await;
        self.connected.store(true, Ordering::SeqCst);
        self.parse_response(response).await
    }

    async fn notify(&self, notification: JsonRpcNotification) -> ClientResult<()> {
        let notification_json = serde_json::to_string(&notification)?;
        let session_id = self.session_id().await;

        debug!(method = %notification.method, "Sending MCP notification");

        let response = self
            .build_request(&notification_json, session_id.as_deref())
            .send()
            .await
            .map_err(Self::map_send_error)?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "Notification returned non-success status");
        }

        Ok(())
    }

    async fn close(&self) -> ClientResult<()> {
        let session_id = self.session_id().await;
        if let Some(ref id) = session_id {
            // Best-effort session teardown
            let result = self
                .client
                .delete(&self.config.url)
                .header(SESSION_ID_HEADER, id)
                .send()
                .await;
            if let Err(e) = result {
                debug!(error = %e, "Session delete failed during close");
            }
        }

        *self.session_id.write().await = None;
        self.connected.store(false, Ordering::SeqCst);
        debug!("Closed HTTP transport");
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}
