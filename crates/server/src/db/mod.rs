//! Task persistence.
//!
//! # Stores
//!
//! - [`PgTaskStore`] - `PostgreSQL`, table `planner.task`
//! - [`MemoryTaskStore`] - process-local, used when no database URL is
//!   configured and by the test suites
//!
//! Handlers only see the [`TaskStore`] trait, so the HTTP layer behaves the
//! same on both.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p daily-planner-cli -- migrate
//! ```

pub mod memory;
pub mod tasks;

use std::time::Duration;

use async_trait::async_trait;
use daily_planner_core::{NewTask, Task, TaskId};
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use memory::MemoryTaskStore;
pub use tasks::PgTaskStore;

/// Embedded migrations for the `planner` schema.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// The store is not accepting requests.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// A collection of tasks.
///
/// Every method is a single atomic operation on the backing store. There is
/// no cross-call transaction and concurrent writes to one task are
/// last-write-wins.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// All tasks in store order, or only those whose date string equals
    /// `date` exactly. No normalization is applied to `date`.
    async fn list(&self, date: Option<&str>) -> Result<Vec<Task>, RepositoryError>;

    /// Insert a task with a fresh id and `completed = false`.
    async fn create(&self, task: NewTask) -> Result<Task, RepositoryError>;

    /// Remove a task. `RepositoryError::NotFound` if no task has this id.
    async fn delete(&self, id: TaskId) -> Result<(), RepositoryError>;

    /// Set only the completed flag and return the updated task.
    /// `RepositoryError::NotFound` if no task has this id.
    async fn set_completed(&self, id: TaskId, completed: bool) -> Result<Task, RepositoryError>;

    /// Cheap round trip proving the store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;

    /// Release held resources. Called once after the server stops.
    async fn close(&self);
}

/// Create a lazily connected `PostgreSQL` pool.
///
/// No connection is opened until the first query, so the server can start
/// while the database is still coming up; `/health/ready` reports when it is
/// reachable.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection string cannot be parsed.
pub fn create_lazy_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(0)
        .acquire_timeout(Duration::from_secs(10))
        .connect_lazy(database_url.expose_secret())
}
