//! Transition engine: resolves the stage a task should move to.
//!
//! The engine performs no I/O. It only computes the target status; the
//! mutation coordinator persists it.

use super::{Stage, TaskStatus};
use serde::{Deserialize, Serialize};

/// Requested stage change, independent of the input mechanism that produced
/// it (pointer drag, menu selection, keyboard).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "stage", rename_all = "snake_case")]
pub enum TransitionTarget {
    /// Move to the given stage. Any stage is reachable from any other,
    /// including backwards.
    To(Stage),
    /// Move to the next stage, staying put at [`Stage::Done`].
    Advance,
}

/// Result of resolving a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Status before the transition.
    pub from: TaskStatus,
    /// Stage to persist.
    pub to: Stage,
}

impl Transition {
    /// Returns `true` when the target equals the current status.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.from.stage() == Some(self.to)
    }
}

/// Resolves the stage to persist for a task currently in `current`.
///
/// Advancing a task whose stored status is not a known stage moves it to
/// the first stage.
#[must_use]
pub fn resolve_transition(current: &TaskStatus, target: TransitionTarget) -> Transition {
    let to = match target {
        TransitionTarget::To(stage) => stage,
        TransitionTarget::Advance => current.stage().map_or(Stage::Todo, Stage::advanced),
    };
    Transition {
        from: current.clone(),
        to,
    }
}
