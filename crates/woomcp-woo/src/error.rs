//! Error types for WooCommerce operations.

use thiserror::Error;

/// Result type for WooCommerce operations.
pub type WooResult<T> = Result<T, WooError>;

/// Errors that can occur while talking to the WooCommerce API.
#[derive(Debug, Error)]
pub enum WooError {
    /// Upstream returned a non-2xx status. The message carries the
    /// numeric status so callers can tell a 404 from other failures.
    #[error("WooCommerce API error ({status}) for {endpoint}: {body}")]
    Api {
        status: u16,
        endpoint: String,
        body: String,
    },

    /// HTTP transport failure (connect, timeout, ...).
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Upstream payload did not match the expected shape.
    #[error("Invalid response payload: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_carries_status() {
        let err = WooError::Api {
            status: 404,
            endpoint: "orders/1".to_string(),
            body: r#"{"code":"woocommerce_rest_shop_order_invalid_id"}"#.to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("404"));
        assert!(text.contains("orders/1"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: WooError = json_err.into();
        assert!(err.to_string().contains("Invalid response payload"));
    }
}
