//! Last-fetched board snapshot and its cache.

use crate::board::domain::{AssigneeFilter, BoardView, Task, TaskId, User, project};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// Immutable copy of the store contents taken by one resync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    generation: u64,
    tasks: Vec<Task>,
    users: Vec<User>,
}

impl BoardSnapshot {
    /// Creates a snapshot. Higher generations were requested later.
    #[must_use]
    pub const fn new(generation: u64, tasks: Vec<Task>, users: Vec<User>) -> Self {
        Self {
            generation,
            tasks,
            users,
        }
    }

    /// Returns the resync ticket that produced this snapshot.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns the tasks in store order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Returns the users in store order.
    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Finds a task in the snapshot.
    #[must_use]
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    /// Projects this snapshot onto the board.
    #[must_use]
    pub fn project(&self, filter: Option<&AssigneeFilter>) -> BoardView {
        project(&self.tasks, &self.users, filter)
    }
}

/// Holds the newest snapshot installed so far.
///
/// Resyncs may complete out of order when several mutations fire close
/// together. Each resync takes a ticket before fetching, and a snapshot is
/// only installed if its ticket is newer than the installed one, so a slow
/// older fetch never overwrites a newer board.
#[derive(Debug, Default)]
pub struct SnapshotCache {
    tickets: AtomicU64,
    current: RwLock<Option<Arc<BoardSnapshot>>>,
}

impl SnapshotCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves the generation number for a resync about to start.
    pub fn next_ticket(&self) -> u64 {
        self.tickets.fetch_add(1, Ordering::SeqCst).saturating_add(1)
    }

    /// Returns the installed snapshot, if any resync has succeeded yet.
    #[must_use]
    pub fn current(&self) -> Option<Arc<BoardSnapshot>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Installs `snapshot` unless a newer one is already in place, and
    /// returns whichever snapshot is installed afterwards.
    pub fn install(&self, snapshot: BoardSnapshot) -> Arc<BoardSnapshot> {
        let mut current = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let newer = current
            .as_ref()
            .filter(|installed| installed.generation() >= snapshot.generation())
            .map(Arc::clone);
        if let Some(installed) = newer {
            tracing::debug!(
                installed = installed.generation(),
                discarded = snapshot.generation(),
                "discarding resync older than the installed snapshot"
            );
            return installed;
        }

        let fresh = Arc::new(snapshot);
        *current = Some(Arc::clone(&fresh));
        fresh
    }
}
