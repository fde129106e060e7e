//! Bearer-token authentication for the protocol endpoint.
//!
//! Runs once per request, before session handling and JSON-RPC
//! dispatch, uniformly for every method. When no key is configured the
//! middleware passes everything through (insecure development mode).

use crate::http::McpServerState;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use subtle::ConstantTimeEq;
use tracing::warn;
use woomcp_protocol::SERVER_ERROR;

/// Extract the presented API key from the `Authorization` header.
///
/// A `Bearer ` prefix is stripped when present; otherwise the raw
/// header value is taken as the key.
pub(crate) fn presented_key(headers: &HeaderMap) -> Option<&str> {
    let auth = headers.get("authorization")?.to_str().ok()?;
    match auth.strip_prefix("Bearer ") {
        Some(key) => Some(key.trim()),
        None => Some(auth),
    }
}

/// Constant-time comparison to prevent timing attacks.
pub(crate) fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({
            "error": { "code": SERVER_ERROR, "message": message }
        })),
    )
        .into_response()
}

/// Middleware validating the bearer token against the configured key.
pub(crate) async fn api_key_auth(
    State(state): State<McpServerState>,
    request: Request,
    next: Next,
) -> Response {
    // If no API key is configured, allow all requests
    let Some(expected_key) = state.api_key() else {
        return next.run(request).await;
    };

    match presented_key(request.headers()) {
        Some(key) if constant_time_eq(key.as_bytes(), expected_key.as_bytes()) => {
            next.run(request).await
        }
        Some(_) => {
            warn!("Invalid API key presented for MCP endpoint");
            unauthorized("Invalid API key")
        }
        None => {
            warn!("Missing API key for MCP endpoint");
            unauthorized("Missing API key")
        }
    }
}
