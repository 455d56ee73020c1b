//! `PostgreSQL` task store.
//!
//! Queries are built at runtime with `sqlx::query_as` so the crate compiles
//! without a live database.

use async_trait::async_trait;
use daily_planner_core::{NewTask, Task, TaskId};
use sqlx::PgPool;
use tracing::instrument;

use super::{RepositoryError, TaskStore};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for task queries.
#[derive(Debug, sqlx::FromRow)]
struct TaskRow {
    id: TaskId,
    date: String,
    todo: String,
    start_time: Option<String>,
    end_time: Option<String>,
    completed: bool,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Self {
            id: row.id,
            date: row.date,
            description: row.todo,
            start_time: row.start_time,
            end_time: row.end_time,
            completed: row.completed,
        }
    }
}

const TASK_COLUMNS: &str = "id, date, todo, start_time, end_time, completed";

// =============================================================================
// Store
// =============================================================================

/// Task store backed by the `planner.task` table.
#[derive(Debug, Clone)]
pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    #[instrument(skip(self))]
    async fn list(&self, date: Option<&str>) -> Result<Vec<Task>, RepositoryError> {
        let rows = sqlx::query_as::<_, TaskRow>(&format!(
            r"
            SELECT {TASK_COLUMNS}
            FROM planner.task
            WHERE $1::text IS NULL OR date = $1
            ORDER BY created_at ASC, id ASC
            "
        ))
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Task::from).collect())
    }

    #[instrument(skip(self, task), fields(date = %task.date))]
    async fn create(&self, task: NewTask) -> Result<Task, RepositoryError> {
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            r"
            INSERT INTO planner.task (date, todo, start_time, end_time)
            VALUES ($1, $2, $3, $4)
            RETURNING {TASK_COLUMNS}
            "
        ))
        .bind(&task.date)
        .bind(&task.description)
        .bind(&task.start_time)
        .bind(&task.end_time)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: TaskId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM planner.task WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_completed(&self, id: TaskId, completed: bool) -> Result<Task, RepositoryError> {
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            r"
            UPDATE planner.task
            SET completed = $2
            WHERE id = $1
            RETURNING {TASK_COLUMNS}
            "
        ))
        .bind(id)
        .bind(completed)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Task::from).ok_or(RepositoryError::NotFound)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        if self.pool.is_closed() {
            return Err(RepositoryError::Unavailable("pool closed".to_owned()));
        }

        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database pool closed");
    }
}
