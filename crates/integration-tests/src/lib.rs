//! Integration tests for the daily planner.
//!
//! Each test starts the real router on an ephemeral port with the in-memory
//! task store and talks to it over HTTP, either directly with reqwest or
//! through the client library.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p daily-planner-integration-tests
//! ```

use std::net::SocketAddr;

use daily_planner_core::ValidationMode;
use daily_planner_server::config::ServerConfig;
use daily_planner_server::db::MemoryTaskStore;
use daily_planner_server::state::AppState;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

/// A task store service running in the test process.
///
/// The server is aborted when this is dropped.
pub struct TestServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server with strict validation.
    ///
    /// # Errors
    ///
    /// Returns error if no local port can be bound.
    pub async fn start() -> std::io::Result<Self> {
        Self::start_with(ValidationMode::Strict).await
    }

    /// Start a server with the given validation mode.
    ///
    /// # Errors
    ///
    /// Returns error if no local port can be bound.
    pub async fn start_with(validation: ValidationMode) -> std::io::Result<Self> {
        let config = ServerConfig {
            validation,
            ..ServerConfig::default()
        };
        let app = daily_planner_server::app(AppState::new(config, MemoryTaskStore::new()));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self { addr, handle })
    }

    #[must_use]
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// `http://127.0.0.1:<port>/`
    ///
    /// # Errors
    ///
    /// Never fails for a bound socket address.
    pub fn base_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.url("/"))
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
