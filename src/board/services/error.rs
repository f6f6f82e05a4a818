//! Service-level error taxonomy.

use crate::board::{
    domain::{TaskDomainError, TaskId},
    ports::TaskStoreError,
};
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced by board operations.
///
/// None of these are retried automatically. A failed operation leaves the
/// cached snapshot as last successfully loaded.
#[derive(Debug, Clone, Error)]
pub enum BoardError {
    /// Malformed or incomplete mutation input.
    #[error(transparent)]
    Validation(#[from] TaskDomainError),

    /// The mutation targeted a task that does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The task store failed or could not be reached.
    #[error("task store unavailable: {0}")]
    StoreUnavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl From<TaskStoreError> for BoardError {
    fn from(err: TaskStoreError) -> Self {
        match err {
            TaskStoreError::NotFound(id) => Self::NotFound(id),
            TaskStoreError::Rejected(domain) => Self::Validation(domain),
            TaskStoreError::Unavailable(source) => Self::StoreUnavailable(source),
        }
    }
}

/// Result type for board service operations.
pub type BoardResult<T> = Result<T, BoardError>;
