//! In-memory task store.
//!
//! Keeps tasks in insertion order, which is the order `list` returns them in.
//! Nothing survives a restart.

use async_trait::async_trait;
use daily_planner_core::{NewTask, Task, TaskId};
use tokio::sync::RwLock;

use super::{RepositoryError, TaskStore};

/// Task store held in process memory.
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    tasks: RwLock<Vec<Task>>,
}

impl MemoryTaskStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn list(&self, date: Option<&str>) -> Result<Vec<Task>, RepositoryError> {
        let tasks = self.tasks.read().await;
        Ok(match date {
            Some(date) => tasks.iter().filter(|t| t.date == date).cloned().collect(),
            None => tasks.clone(),
        })
    }

    async fn create(&self, task: NewTask) -> Result<Task, RepositoryError> {
        let mut tasks = self.tasks.write().await;

        let mut id = TaskId::generate();
        while tasks.iter().any(|t| t.id == id) {
            id = TaskId::generate();
        }

        let task = task.into_task(id);
        tasks.push(task.clone());
        Ok(task)
    }

    async fn delete(&self, id: TaskId) -> Result<(), RepositoryError> {
        let mut tasks = self.tasks.write().await;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);

        if tasks.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn set_completed(&self, id: TaskId, completed: bool) -> Result<Task, RepositoryError> {
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(RepositoryError::NotFound)?;

        task.completed = completed;
        Ok(task.clone())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn close(&self) {
        let count = self.tasks.read().await.len();
        tracing::info!(count, "Discarding in-memory tasks");
    }
}
