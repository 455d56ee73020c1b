//! Task commands: show, add, done, rm.
//!
//! Each command opens a [`Planner`] on the requested date, so it reuses a
//! fresh snapshot instead of fetching, and leaves the snapshot updated.

use std::fmt::Write;
use std::str::FromStr;

use daily_planner_client::config::ConfigError;
use daily_planner_client::{ClientConfig, ClientError, PlanApi, Planner, SnapshotStore};
use daily_planner_core::{ClockTime, CreateTaskRequest, PlanDate, Task, TaskId};
use thiserror::Error;

/// Errors that can occur while running a task command.
#[derive(Debug, Error)]
pub enum TaskCommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("No task {0} on {1}")]
    NoSuchTask(String, PlanDate),
}

/// A task named on the command line: 1-based position or id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskSelector {
    Position(usize),
    Id(TaskId),
}

impl FromStr for TaskSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(position) = s.parse::<usize>() {
            return if position == 0 {
                Err("positions start at 1".to_string())
            } else {
                Ok(Self::Position(position))
            };
        }

        TaskId::parse(s)
            .map(Self::Id)
            .map_err(|_| format!("expected a list position or task id, got '{s}'"))
    }
}

impl std::fmt::Display for TaskSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Position(n) => write!(f, "#{n}"),
            Self::Id(id) => write!(f, "{id}"),
        }
    }
}

async fn open(date: PlanDate) -> Result<Planner<PlanApi>, TaskCommandError> {
    let config = ClientConfig::from_env()?;
    let api = PlanApi::new(&config)?;
    let snapshots = SnapshotStore::new(config.snapshot_path.clone());

    Ok(Planner::open_on(api, snapshots, config.cache_max_age, date).await)
}

/// Turn a selector into an id. Positions are read from a fresh listing,
/// never from the snapshot.
async fn resolve(
    planner: &mut Planner<PlanApi>,
    selector: TaskSelector,
) -> Result<TaskId, TaskCommandError> {
    match selector {
        TaskSelector::Id(id) => Ok(id),
        TaskSelector::Position(n) => {
            let date = planner.selected();
            planner
                .current_task_at(n)
                .await?
                .map(|task| task.id)
                .ok_or_else(|| TaskCommandError::NoSuchTask(selector.to_string(), date))
        }
    }
}

#[allow(clippy::print_stdout)]
fn print_planner(planner: &Planner<PlanApi>) {
    print!(
        "{}",
        render_tasks(planner.selected(), planner.visible_tasks(), planner.is_stale())
    );
}

/// List the tasks for `date`.
///
/// # Errors
///
/// Returns error if the client cannot be configured. An unreachable service
/// is reported in the output, with the cached tasks.
pub async fn show(date: PlanDate) -> Result<(), TaskCommandError> {
    let planner = open(date).await?;
    print_planner(&planner);
    Ok(())
}

/// Add a task on `date`.
///
/// # Errors
///
/// Returns error if the service rejects the task or cannot be reached.
pub async fn add(
    date: PlanDate,
    todo: String,
    start: Option<ClockTime>,
    end: Option<ClockTime>,
) -> Result<(), TaskCommandError> {
    let mut planner = open(date).await?;

    let mut request = CreateTaskRequest::new(date, todo);
    request.start_time = start.map(|t| t.to_string());
    request.end_time = end.map(|t| t.to_string());

    planner.add_task(request).await?;
    print_planner(&planner);
    Ok(())
}

/// Mark a task completed.
///
/// # Errors
///
/// Returns error if the task does not exist or the service cannot be reached.
pub async fn complete(date: PlanDate, selector: TaskSelector) -> Result<(), TaskCommandError> {
    let mut planner = open(date).await?;
    let id = resolve(&mut planner, selector).await?;

    planner.complete_task(id).await?;
    print_planner(&planner);
    Ok(())
}

/// Delete a task.
///
/// # Errors
///
/// Returns error if the task does not exist or the service cannot be reached.
pub async fn remove(date: PlanDate, selector: TaskSelector) -> Result<(), TaskCommandError> {
    let mut planner = open(date).await?;
    let id = resolve(&mut planner, selector).await?;

    planner.delete_task(id).await?;
    print_planner(&planner);
    Ok(())
}

/// Render the task list for one date.
pub fn render_tasks<'a>(
    date: PlanDate,
    tasks: impl Iterator<Item = &'a Task>,
    stale: bool,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Tasks for {}", date.long_form());

    let mut count = 0;
    for (i, task) in tasks.enumerate() {
        count += 1;
        let check = if task.completed { 'x' } else { ' ' };
        let _ = write!(out, "{:>3}. [{check}] {}", i + 1, task.description);
        if let Some(range) = task.time_range() {
            let _ = write!(out, "  {range}");
        }
        out.push('\n');
    }

    if count == 0 {
        out.push_str("  (no tasks)\n");
    }
    if stale {
        out.push_str("  (service unreachable or cache expired; list may be out of date)\n");
    }
    out
}
