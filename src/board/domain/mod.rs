//! Domain model for the task board.
//!
//! Everything in this module is free of I/O: tasks and users are plain values,
//! the projection is a pure function over snapshots, and the transition
//! engine only computes the status to persist.

mod error;
mod ids;
mod projection;
mod stage;
mod task;
mod transition;
mod user;

pub use error::{ParseStageError, TaskDomainError};
pub use ids::{TaskId, UserId};
pub use projection::{
    AssigneeFilter, BoardCard, BoardColumn, BoardView, UNASSIGNED_LABEL, initials, project,
};
pub use stage::Stage;
pub use task::{
    CreateTaskRequest, NewTask, PATCHABLE_FIELDS, PersistedTaskData, Task, TaskPatch, TaskStatus,
};
pub use transition::{Transition, TransitionTarget, resolve_transition};
pub use user::User;
