//! HTTP access to the task store's `/plan` endpoints.

use std::sync::Arc;

use async_trait::async_trait;
use daily_planner_core::{CompletionUpdate, CreateTaskRequest, PlanDate, Task, TaskId};
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, instrument};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ClientError, ErrorBody};

/// Operations the planner needs from a task store.
#[async_trait]
pub trait PlanBackend: Send + Sync {
    /// Tasks in store order, only those on `date` when given.
    async fn list_tasks(&self, date: Option<PlanDate>) -> Result<Vec<Task>, ClientError>;

    /// Create a task and return it as stored.
    async fn create_task(&self, request: &CreateTaskRequest) -> Result<Task, ClientError>;

    /// Delete a task.
    async fn delete_task(&self, id: TaskId) -> Result<(), ClientError>;

    /// Set a task's completed flag and return it as stored.
    async fn set_completed(&self, id: TaskId, completed: bool) -> Result<Task, ClientError>;
}

#[async_trait]
impl<T: PlanBackend + ?Sized> PlanBackend for Arc<T> {
    async fn list_tasks(&self, date: Option<PlanDate>) -> Result<Vec<Task>, ClientError> {
        (**self).list_tasks(date).await
    }

    async fn create_task(&self, request: &CreateTaskRequest) -> Result<Task, ClientError> {
        (**self).create_task(request).await
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), ClientError> {
        (**self).delete_task(id).await
    }

    async fn set_completed(&self, id: TaskId, completed: bool) -> Result<Task, ClientError> {
        (**self).set_completed(id, completed).await
    }
}

/// reqwest client for the task store service.
#[derive(Debug, Clone)]
pub struct PlanApi {
    client: Client,
    base_url: Url,
}

impl PlanApi {
    /// Create a client for `config.api_url` with the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self::with_client(client, config.api_url.clone()))
    }

    /// Create a client around an existing reqwest client.
    #[must_use]
    pub fn with_client(client: Client, mut base_url: Url) -> Self {
        // Url::join replaces the last segment unless the base ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Self { client, base_url }
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn collection_url(&self) -> Result<Url, ClientError> {
        Ok(self.base_url.join("plan")?)
    }

    fn task_url(&self, id: TaskId) -> Result<Url, ClientError> {
        Ok(self.base_url.join(&format!("plan/{id}"))?)
    }
}

#[async_trait]
impl PlanBackend for PlanApi {
    #[instrument(skip(self))]
    async fn list_tasks(&self, date: Option<PlanDate>) -> Result<Vec<Task>, ClientError> {
        let mut url = self.collection_url()?;
        if let Some(date) = date {
            url.query_pairs_mut().append_pair("date", &date.to_string());
        }

        let response = self.client.get(url).send().await?;
        let tasks: Vec<Task> = check(response, None).await?.json().await?;

        debug!(count = tasks.len(), "Fetched tasks");
        Ok(tasks)
    }

    #[instrument(skip(self, request))]
    async fn create_task(&self, request: &CreateTaskRequest) -> Result<Task, ClientError> {
        let response = self
            .client
            .post(self.collection_url()?)
            .json(request)
            .send()
            .await?;
        let task: Task = check(response, None).await?.json().await?;

        debug!(task_id = %task.id, "Task created");
        Ok(task)
    }

    #[instrument(skip(self))]
    async fn delete_task(&self, id: TaskId) -> Result<(), ClientError> {
        let response = self.client.delete(self.task_url(id)?).send().await?;
        check(response, Some(id)).await?;

        debug!(task_id = %id, "Task deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_completed(&self, id: TaskId, completed: bool) -> Result<Task, ClientError> {
        let response = self
            .client
            .patch(self.task_url(id)?)
            .json(&CompletionUpdate { completed })
            .send()
            .await?;

        Ok(check(response, Some(id)).await?.json().await?)
    }
}

/// Pass successful responses through and turn the rest into `ClientError`.
async fn check(response: Response, id: Option<TaskId>) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if let (StatusCode::NOT_FOUND, Some(id)) = (status, id) {
        return Err(ClientError::NotFound(id));
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status.canonical_reason().unwrap_or("unknown").to_string(),
    };

    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}
