//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use coderelay_core::config::AppConfig;
use coderelay_service::RelayService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Relay use cases (admission, validation, store access)
    pub relay: Arc<RelayService>,
}

impl AppState {
    /// Creates the handler state.
    pub fn new(config: Arc<AppConfig>, relay: Arc<RelayService>) -> Self {
        Self { config, relay }
    }
}
