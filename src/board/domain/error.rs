//! Error types for board domain validation and parsing.

use thiserror::Error;

/// Errors returned while validating task input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is missing or empty after trimming.
    #[error("task title is required")]
    EmptyTitle,

    /// An update carried no allow-listed fields.
    #[error("no valid fields provided")]
    EmptyPatch,

    /// The status value is not one of the board stages.
    #[error(transparent)]
    UnknownStage(#[from] ParseStageError),

    /// A field value has the wrong shape.
    #[error("invalid value for field '{field}': {reason}")]
    InvalidField {
        /// Wire name of the offending field.
        field: &'static str,
        /// Human-readable description of the problem.
        reason: String,
    },

    /// The request payload is not a JSON object.
    #[error("task payload must be a JSON object")]
    NotAnObject,
}

impl TaskDomainError {
    pub(crate) fn invalid_field(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

/// Error returned while parsing a stage from its wire representation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown stage: {0}")]
pub struct ParseStageError(pub String);
