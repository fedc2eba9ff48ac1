//! Application state shared across handlers.

use std::sync::Arc;

use crate::relay::RelayService;

/// State handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// The relay orchestrating chat requests.
    pub relay: Arc<RelayService>,
    /// Allowed CORS origins. Empty allows any origin.
    pub cors_origins: Vec<String>,
}

impl AppState {
    /// Create new application state.
    pub fn new(relay: RelayService, cors_origins: Vec<String>) -> Self {
        Self {
            relay: Arc::new(relay),
            cors_origins,
        }
    }
}
