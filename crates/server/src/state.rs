//! Application state shared across handlers.

use std::sync::Arc;

use daily_planner_core::ValidationMode;

use crate::config::ServerConfig;
use crate::db::{self, MemoryTaskStore, PgTaskStore, RepositoryError, TaskStore};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and owns the task store for the
/// lifetime of the server. Call [`AppState::shutdown`] once the server has
/// stopped accepting requests.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    store: Box<dyn TaskStore>,
}

impl AppState {
    /// Create a new application state around an existing store.
    #[must_use]
    pub fn new(config: ServerConfig, store: impl TaskStore + 'static) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store: Box::new(store),
            }),
        }
    }

    /// Create the state with the store selected by `config`.
    ///
    /// A configured database URL yields a lazily connected `PostgreSQL`
    /// store; otherwise tasks are kept in memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the database URL cannot be parsed.
    pub fn from_config(config: ServerConfig) -> Result<Self, RepositoryError> {
        match &config.database_url {
            Some(url) => {
                let pool = db::create_lazy_pool(url)?;
                tracing::info!("Using PostgreSQL task store (connects on first use)");
                Ok(Self::new(config, PgTaskStore::new(pool)))
            }
            None => {
                tracing::warn!("No database URL configured, tasks are kept in memory only");
                Ok(Self::new(config, MemoryTaskStore::new()))
            }
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the task store.
    #[must_use]
    pub fn store(&self) -> &dyn TaskStore {
        self.inner.store.as_ref()
    }

    /// Create-task validation mode.
    #[must_use]
    pub fn validation(&self) -> ValidationMode {
        self.inner.config.validation
    }

    /// Release the store's resources.
    pub async fn shutdown(&self) {
        self.inner.store.close().await;
    }
}
