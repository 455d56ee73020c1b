//! Error types for the planner client.

use daily_planner_core::TaskId;
use thiserror::Error;

/// Errors that can occur when talking to the task store.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connection, timeout, or undecodable body).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("service returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// `error` field of the response body, or the status reason.
        message: String,
    },

    /// No task has this id.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// A task was submitted without a description.
    #[error("task description cannot be blank")]
    EmptyTask,

    /// Request URL could not be built.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Errors reading or writing the local snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<tempfile::PersistError> for SnapshotError {
    fn from(err: tempfile::PersistError) -> Self {
        Self::Io(err.error)
    }
}

/// Error body returned by the task store.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}
