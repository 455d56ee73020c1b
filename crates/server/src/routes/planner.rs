//! Planner page: month calendar and the task list for one date.
//!
//! The page is server-rendered. Forms post to `/tasks/...` and work without
//! JavaScript (303 back to the page); with HTMX loaded they swap just the
//! task list fragment.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use daily_planner_core::{
    CalendarDay, ClockTime, CreateTaskRequest, MonthGrid, PlanDate, Task, TaskInputError,
    calendar::WEEKDAY_LABELS,
};
use serde::Deserialize;
use tracing::instrument;

use super::parse_task_id;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Build the planner page router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(show))
        .route("/tasks", post(add))
        .route("/tasks/{id}/complete", post(complete))
        .route("/tasks/{id}/delete", post(remove))
}

// =============================================================================
// View Types
// =============================================================================

/// One calendar cell. Blank cells pad the first and last week.
#[derive(Clone)]
pub struct DayCell {
    pub blank: bool,
    pub day: String,
    pub date: String,
    pub is_selected: bool,
    pub is_today: bool,
}

impl DayCell {
    const BLANK: Self = Self {
        blank: true,
        day: String::new(),
        date: String::new(),
        is_selected: false,
        is_today: false,
    };
}

impl From<&CalendarDay> for DayCell {
    fn from(day: &CalendarDay) -> Self {
        Self {
            blank: false,
            day: day.day.to_string(),
            date: day.date.to_string(),
            is_selected: day.is_selected,
            is_today: day.is_today,
        }
    }
}

/// Calendar display data for templates.
#[derive(Clone)]
pub struct CalendarView {
    pub title: String,
    pub previous: String,
    pub next: String,
    pub weekdays: Vec<&'static str>,
    pub weeks: Vec<Vec<DayCell>>,
}

impl From<&MonthGrid> for CalendarView {
    fn from(grid: &MonthGrid) -> Self {
        Self {
            title: grid.title(),
            previous: grid.previous_month().to_string(),
            next: grid.next_month().to_string(),
            weekdays: WEEKDAY_LABELS.to_vec(),
            weeks: grid
                .weeks
                .iter()
                .map(|week| {
                    week.iter()
                        .map(|cell| cell.as_ref().map_or(DayCell::BLANK, DayCell::from))
                        .collect()
                })
                .collect(),
        }
    }
}

/// Task display data for templates.
#[derive(Clone)]
pub struct TaskView {
    pub id: String,
    pub todo: String,
    /// `"09:00 - 10:00"`, or empty when either end is unset.
    pub time_range: String,
    pub completed: bool,
}

impl From<&Task> for TaskView {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.to_string(),
            todo: task.description.clone(),
            time_range: task.time_range().unwrap_or_default(),
            completed: task.completed,
        }
    }
}

/// Full planner page.
#[derive(Template, WebTemplate)]
#[template(path = "planner.html")]
pub struct PlannerTemplate {
    pub calendar: CalendarView,
    pub date: String,
    pub date_long: String,
    pub default_time: String,
    pub tasks: Vec<TaskView>,
    pub error: String,
}

/// Task list fragment (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/task_list.html")]
pub struct TaskListTemplate {
    pub date: String,
    pub date_long: String,
    pub default_time: String,
    pub tasks: Vec<TaskView>,
    pub error: String,
}

// =============================================================================
// Form and Query Types
// =============================================================================

/// Query string of the planner page.
#[derive(Debug, Default, Deserialize)]
pub struct PlannerQuery {
    pub date: Option<String>,
}

/// Add-task form data.
#[derive(Debug, Deserialize)]
pub struct AddTaskForm {
    pub date: String,
    #[serde(default)]
    pub todo: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
}

impl From<AddTaskForm> for CreateTaskRequest {
    fn from(form: AddTaskForm) -> Self {
        Self {
            date: Some(form.date),
            todo: Some(form.todo),
            start_time: Some(form.start_time),
            end_time: Some(form.end_time),
        }
    }
}

/// Complete/delete form data; carries the date to return to.
#[derive(Debug, Deserialize)]
pub struct DateForm {
    pub date: String,
}

// =============================================================================
// Helpers
// =============================================================================

fn parse_date(raw: Option<&str>) -> Result<PlanDate> {
    match raw.map(str::trim) {
        None | Some("") => Ok(PlanDate::today()),
        Some(raw) => PlanDate::parse(raw).map_err(|e| AppError::BadRequest(e.to_string())),
    }
}

fn is_htmx(headers: &HeaderMap) -> bool {
    headers.contains_key("hx-request")
}

/// Tasks visible on `date`, in store order.
async fn visible_tasks(state: &AppState, date: PlanDate) -> Result<Vec<TaskView>> {
    let tasks = state.store().list(Some(&date.to_string())).await?;
    Ok(tasks.iter().map(TaskView::from).collect())
}

async fn render_page(state: &AppState, date: PlanDate, error: String) -> Result<PlannerTemplate> {
    let grid = MonthGrid::new(date, PlanDate::today());
    Ok(PlannerTemplate {
        calendar: CalendarView::from(&grid),
        date: date.to_string(),
        date_long: date.long_form(),
        default_time: ClockTime::MIDNIGHT.to_string(),
        tasks: visible_tasks(state, date).await?,
        error,
    })
}

async fn render_list(state: &AppState, date: PlanDate, error: String) -> Result<TaskListTemplate> {
    Ok(TaskListTemplate {
        date: date.to_string(),
        date_long: date.long_form(),
        default_time: ClockTime::MIDNIGHT.to_string(),
        tasks: visible_tasks(state, date).await?,
        error,
    })
}

/// After a write: the fragment for HTMX, otherwise a redirect to the page.
async fn after_write(state: &AppState, headers: &HeaderMap, date: PlanDate) -> Result<Response> {
    if is_htmx(headers) {
        Ok(render_list(state, date, String::new()).await?.into_response())
    } else {
        Ok(Redirect::to(&format!("/?date={date}")).into_response())
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the planner page for `?date=` (default today).
///
/// # Errors
///
/// Returns 400 for an unparseable date and 500 if the store fails.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Query(query): Query<PlannerQuery>,
) -> Result<PlannerTemplate> {
    let date = parse_date(query.date.as_deref())?;
    render_page(&state, date, String::new()).await
}

/// Add a task from the page form.
///
/// Validation errors re-render the form with the message instead of failing
/// the request. A blank description is refused even in lenient mode.
///
/// # Errors
///
/// Returns 400 for an unparseable date and 500 if the store fails.
#[instrument(skip(state, headers))]
pub async fn add(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<AddTaskForm>,
) -> Result<Response> {
    let date = parse_date(Some(&form.date))?;

    // The form never stores a blank task, whatever the validation mode.
    if form.todo.trim().is_empty() {
        return render_rejected(&state, &headers, date, &TaskInputError::EmptyDescription).await;
    }

    let new_task = match CreateTaskRequest::from(form).validate(state.validation()) {
        Ok(task) => task,
        Err(err) => return render_rejected(&state, &headers, date, &err).await,
    };

    let task = state.store().create(new_task).await?;
    tracing::info!(task_id = %task.id, date = %task.date, "Task created from planner page");

    after_write(&state, &headers, date).await
}

async fn render_rejected(
    state: &AppState,
    headers: &HeaderMap,
    date: PlanDate,
    err: &TaskInputError,
) -> Result<Response> {
    tracing::debug!(error = %err, "Rejected task from planner page");

    // HTMX only swaps 2xx responses, so the fragment keeps 200.
    if is_htmx(headers) {
        Ok(render_list(state, date, err.to_string()).await?.into_response())
    } else {
        let page = render_page(state, date, err.to_string()).await?;
        Ok((StatusCode::BAD_REQUEST, page).into_response())
    }
}

/// Mark a task completed.
///
/// # Errors
///
/// Returns 404 if no task has this id and 500 if the store fails.
#[instrument(skip(state, headers))]
pub async fn complete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Form(form): Form<DateForm>,
) -> Result<Response> {
    let date = parse_date(Some(&form.date))?;
    let id = parse_task_id(&id)?;

    state.store().set_completed(id, true).await?;
    tracing::info!(task_id = %id, "Task completed from planner page");

    after_write(&state, &headers, date).await
}

/// Delete a task.
///
/// # Errors
///
/// Returns 404 if no task has this id and 500 if the store fails.
#[instrument(skip(state, headers))]
pub async fn remove(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Form(form): Form<DateForm>,
) -> Result<Response> {
    let date = parse_date(Some(&form.date))?;
    let id = parse_task_id(&id)?;

    state.store().delete(id).await?;
    tracing::info!(task_id = %id, "Task deleted from planner page");

    after_write(&state, &headers, date).await
}
