//! Task collection JSON API.
//!
//! ```text
//! GET    /plan[?date=YYYY-MM-DD]  - List tasks, optionally for one date
//! POST   /plan                    - Create a task
//! DELETE /plan/{id}               - Delete a task
//! PATCH  /plan/{id}               - Set a task's completed flag
//! ```

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, patch},
};
use daily_planner_core::{CompletionUpdate, CreateTaskRequest, Task};
use serde::Deserialize;
use tracing::instrument;

use super::parse_task_id;
use crate::error::Result;
use crate::state::AppState;

/// Build the task API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/plan", get(list).post(create))
        .route("/plan/{id}", patch(update_completion).delete(delete))
}

/// Query string of the list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub date: Option<String>,
}

impl ListQuery {
    /// The requested date string, compared verbatim. Blank counts as absent.
    fn date(&self) -> Option<&str> {
        self.date.as_deref().map(str::trim).filter(|d| !d.is_empty())
    }
}

/// List tasks in store order.
///
/// # Errors
///
/// Returns 500 if the store fails.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Task>>> {
    let tasks = state.store().list(query.date()).await?;
    tracing::debug!(count = tasks.len(), "Listed tasks");
    Ok(Json(tasks))
}

/// Create a task.
///
/// Responds 201 with the created task and its `Location`.
///
/// # Errors
///
/// Returns 400 if strict validation rejects the body and 500 if the store
/// fails.
#[instrument(skip(state, body))]
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateTaskRequest>,
) -> Result<impl IntoResponse> {
    let new_task = body.validate(state.validation())?;
    let task = state.store().create(new_task).await?;

    tracing::info!(task_id = %task.id, date = %task.date, "Task created");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/plan/{}", task.id))],
        Json(task),
    ))
}

/// Delete a task.
///
/// # Errors
///
/// Returns 404 if no task has this id and 500 if the store fails.
#[instrument(skip(state))]
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode> {
    let id = parse_task_id(&id)?;
    state.store().delete(id).await?;

    tracing::info!(task_id = %id, "Task deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Set a task's completed flag and return the updated task.
///
/// # Errors
///
/// Returns 404 if no task has this id and 500 if the store fails.
#[instrument(skip(state))]
pub async fn update_completion(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<CompletionUpdate>,
) -> Result<Json<Task>> {
    let id = parse_task_id(&id)?;
    let task = state.store().set_completed(id, update.completed).await?;

    tracing::info!(task_id = %id, completed = task.completed, "Task completion updated");
    Ok(Json(task))
}
