//! HTTP route handlers for the task store service.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (store reachable)
//!
//! # Task API (JSON)
//! GET    /plan[?date=]         - List tasks
//! POST   /plan                 - Create task
//! DELETE /plan/{id}            - Delete task
//! PATCH  /plan/{id}            - Update completed flag
//!
//! # Planner page (HTML, HTMX fragments)
//! GET  /[?date=]               - Calendar and task list
//! POST /tasks                  - Add task
//! POST /tasks/{id}/complete    - Mark task completed
//! POST /tasks/{id}/delete      - Delete task
//! ```

pub mod health;
pub mod plan;
pub mod planner;

use axum::{Router, routing::get};
use daily_planner_core::TaskId;

use crate::error::AppError;
use crate::state::AppState;

/// Create all routes for the service.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(plan::router())
        .merge(planner::router())
}

/// Parse a task id path segment.
///
/// A malformed id cannot name any stored task, so it is reported the same way
/// as an unknown one.
fn parse_task_id(raw: &str) -> Result<TaskId, AppError> {
    TaskId::parse(raw).map_err(|_| AppError::NotFound("Task not found".to_string()))
}
