//! Environment-sourced configuration.
//!
//! All settings are resolved once at startup into an immutable [`Config`]
//! that is passed explicitly to every component; nothing reads the
//! environment after this point. Missing credentials or a placeholder
//! store URL abort startup before any socket is bound.

use thiserror::Error;
use tracing::{info, warn};

/// The unconfigured default shipped in `.env` templates.
const PLACEHOLDER_URL: &str = "https://yourstore.com";

/// Configuration errors. All of these are fatal at startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set in the environment")]
    MissingVar(&'static str),

    #[error("WOO_URL must be configured with your actual WooCommerce store URL")]
    UnconfiguredStoreUrl,
}

/// Resolved configuration, shared read-only by every component.
#[derive(Debug, Clone)]
pub struct Config {
    /// WooCommerce store base URL.
    pub store_url: String,
    /// WooCommerce REST consumer key.
    pub consumer_key: String,
    /// WooCommerce REST consumer secret.
    pub consumer_secret: String,
    /// Bearer secret for the protocol endpoint. None disables auth.
    pub api_key: Option<String>,
}

impl Config {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an injectable variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::MissingVar(key))
        };

        let store_url = lookup("WOO_URL")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| PLACEHOLDER_URL.to_string());
        if store_url == PLACEHOLDER_URL {
            return Err(ConfigError::UnconfiguredStoreUrl);
        }

        let consumer_key = required("WOO_CONSUMER_KEY")?;
        let consumer_secret = required("WOO_CONSUMER_SECRET")?;
        let api_key = lookup("MCP_API_KEY").filter(|v| !v.is_empty());

        Ok(Self {
            store_url,
            consumer_key,
            consumer_secret,
            api_key,
        })
    }

    /// Whether inbound requests must present a bearer token.
    pub fn auth_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// Log the resolved configuration at startup.
    pub fn log_summary(&self) {
        info!(store_url = %self.store_url, "Initializing WooCommerce MCP bridge");
        if self.auth_enabled() {
            info!("Authentication enabled with API key");
        } else {
            warn!("Running without authentication - set MCP_API_KEY to secure the endpoint");
        }
    }

    /// Human-readable summary with secrets redacted.
    pub fn redacted(&self) -> String {
        format!(
            "store_url: {}\nconsumer_key: {}\nconsumer_secret: {}\nauthentication: {}",
            self.store_url,
            redact(&self.consumer_key),
            redact(&self.consumer_secret),
            if self.auth_enabled() {
                "enabled"
            } else {
                "disabled"
            },
        )
    }
}

fn redact(secret: &str) -> String {
    if secret.chars().count() <= 6 {
        return "******".to_string();
    }
    let prefix: String = secret.chars().take(6).collect();
    format!("{prefix}******")
}
