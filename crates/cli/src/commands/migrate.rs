//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! PLANNER_DATABASE_URL=postgres://localhost/planner planner migrate
//! ```
//!
//! # Environment Variables
//!
//! - `PLANNER_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! # Migration Files
//!
//! Migrations live in `crates/server/migrations/` and are embedded in the
//! server crate as `daily_planner_server::db::MIGRATOR`.

use daily_planner_server::config::{ConfigError, ServerConfig};
use daily_planner_server::db::MIGRATOR;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use thiserror::Error;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Missing environment variable: PLANNER_DATABASE_URL (or DATABASE_URL)")]
    MissingDatabaseUrl,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Apply every pending migration to the task store database.
///
/// # Errors
///
/// Returns error if no database URL is configured, the database is
/// unreachable, or a migration fails.
pub async fn run() -> Result<(), MigrationError> {
    let config = ServerConfig::from_env()?;
    let database_url = config
        .database_url
        .ok_or(MigrationError::MissingDatabaseUrl)?;

    tracing::info!("Connecting to task store database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    tracing::info!("Running migrations...");
    MIGRATOR.run(&pool).await?;
    pool.close().await;

    #[allow(clippy::print_stdout)]
    {
        println!("Migrations complete");
    }
    Ok(())
}
