//! Task record store port.

use crate::board::domain::{NewTask, Task, TaskDomainError, TaskId, TaskPatch, User};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Durable storage of task and user records.
///
/// Each call is atomic per row. The store assigns identifiers and
/// timestamps; callers never set them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Returns every task in store-defined order.
    async fn list_tasks(&self) -> TaskStoreResult<Vec<Task>>;

    /// Returns every user in store-defined order.
    async fn list_users(&self) -> TaskStoreResult<Vec<User>>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_task(&self, id: TaskId) -> TaskStoreResult<Option<Task>>;

    /// Stores a new task and returns it with its assigned identifier and
    /// timestamps.
    async fn create_task(&self, draft: &NewTask) -> TaskStoreResult<Task>;

    /// Applies a partial update and refreshes `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Rejected`] for an empty patch and
    /// [`TaskStoreError::NotFound`] when the task does not exist.
    async fn update_task(&self, id: TaskId, patch: &TaskPatch) -> TaskStoreResult<Task>;

    /// Deletes a task permanently.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist,
    /// including when it was already deleted.
    async fn delete_task(&self, id: TaskId) -> TaskStoreResult<()>;
}

/// Errors returned by task store implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskStoreError {
    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The store refused malformed input.
    #[error("store rejected input: {0}")]
    Rejected(#[from] TaskDomainError),

    /// The store could not be reached or the query failed.
    #[error("store unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskStoreError {
    /// Wraps an infrastructure error.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}
