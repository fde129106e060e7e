//! In-memory MCP session tracking.
//!
//! A session is minted by a successful `initialize` and identified by an
//! opaque uuid. Sessions hold no per-client state beyond their creation
//! time; they exist so that later requests can be tied to an
//! initialization handshake and rejected otherwise.

use std::collections::HashMap;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::info;

/// An active MCP session.
struct Session {
    /// Session creation time (for cleanup).
    #[allow(dead_code)]
    created_at: Instant,
}

/// Tracks active sessions by id.
#[derive(Default)]
pub struct SessionManager {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionManager {
    /// Create an empty session manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a new session and return its id.
    pub async fn create(&self) -> String {
        let session_id = uuid::Uuid::new_v4().to_string();
        let mut sessions = self.sessions.write().await;
        sessions.insert(
            session_id.clone(),
            Session {
                created_at: Instant::now(),
            },
        );
        info!(session_id = %session_id, "MCP session registered");
        session_id
    }

    /// Check whether a session id is known.
    pub async fn contains(&self, session_id: &str) -> bool {
        self.sessions.read().await.contains_key(session_id)
    }

    /// Remove a session. Returns true if it existed.
    pub async fn remove(&self, session_id: &str) -> bool {
        let removed = self.sessions.write().await.remove(session_id).is_some();
        if removed {
            info!(session_id = %session_id, "MCP session terminated");
        }
        removed
    }

    /// Number of active sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether there are no active sessions.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
