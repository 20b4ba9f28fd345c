//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::db::Database;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// document store and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    db: Database,
}

impl AppState {
    /// Create a new application state around an already-open store.
    #[must_use]
    pub fn new(config: ServerConfig, db: Database) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, db }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the document store.
    #[must_use]
    pub fn db(&self) -> &Database {
        &self.inner.db
    }
}
