use std::sync::Arc;

use super::config::ServerConfig;
use super::session::SessionStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Last generated script per session.
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let sessions = Arc::new(SessionStore::new(&config.secret_key, config.max_sessions));
        Self {
            config: Arc::new(config),
            sessions,
        }
    }

    pub fn script_ttl(&self) -> chrono::Duration {
        i64::try_from(self.config.script_ttl_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX)
    }
}
