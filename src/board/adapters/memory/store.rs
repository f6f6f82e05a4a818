//! In-memory task store for tests and demos.

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::board::{
    domain::{NewTask, PersistedTaskData, Task, TaskDomainError, TaskId, TaskPatch, User},
    ports::{TaskStore, TaskStoreError, TaskStoreResult},
};

/// Thread-safe in-memory task store.
///
/// Tasks are listed in identifier order and users in insertion order.
/// Identifiers are assigned sequentially starting at 1 and never reused.
pub struct InMemoryTaskStore<C = DefaultClock> {
    state: Arc<RwLock<InMemoryBoardState>>,
    clock: Arc<C>,
}

#[derive(Debug)]
struct InMemoryBoardState {
    tasks: BTreeMap<TaskId, Task>,
    users: Vec<User>,
    next_id: i64,
    offline: bool,
}

impl Default for InMemoryBoardState {
    fn default() -> Self {
        Self {
            tasks: BTreeMap::new(),
            users: Vec::new(),
            next_id: 1,
            offline: false,
        }
    }
}

impl InMemoryTaskStore<DefaultClock> {
    /// Creates an empty store using the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }
}

impl Default for InMemoryTaskStore<DefaultClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for InMemoryTaskStore<C> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<C: Clock + Send + Sync> InMemoryTaskStore<C> {
    /// Creates an empty store stamping records with `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<C>) -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryBoardState::default())),
            clock,
        }
    }

    /// Replaces the user directory.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Unavailable`] if the lock is poisoned.
    pub fn set_users(&self, users: impl IntoIterator<Item = User>) -> TaskStoreResult<()> {
        let mut state = self.write()?;
        state.users = users.into_iter().collect();
        Ok(())
    }

    /// Inserts a record exactly as given, bypassing creation defaults.
    ///
    /// Used to load records written by other clients, including ones with a
    /// status outside the stage enumeration.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Unavailable`] if the lock is poisoned.
    pub fn seed_task(&self, data: PersistedTaskData) -> TaskStoreResult<Task> {
        let mut state = self.write()?;
        let task = Task::from_persisted(data);
        state.next_id = state.next_id.max(task.id().value().saturating_add(1));
        state.tasks.insert(task.id(), task.clone());
        Ok(task)
    }

    /// Simulates an outage: while offline, every store call fails with
    /// [`TaskStoreError::Unavailable`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Unavailable`] if the lock is poisoned.
    pub fn set_offline(&self, offline: bool) -> TaskStoreResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| TaskStoreError::unavailable(std::io::Error::other(err.to_string())))?;
        state.offline = offline;
        Ok(())
    }

    fn read(&self) -> TaskStoreResult<RwLockReadGuard<'_, InMemoryBoardState>> {
        let state = self
            .state
            .read()
            .map_err(|err| TaskStoreError::unavailable(std::io::Error::other(err.to_string())))?;
        ensure_online(&state)?;
        Ok(state)
    }

    fn write(&self) -> TaskStoreResult<RwLockWriteGuard<'_, InMemoryBoardState>> {
        let state = self
            .state
            .write()
            .map_err(|err| TaskStoreError::unavailable(std::io::Error::other(err.to_string())))?;
        ensure_online(&state)?;
        Ok(state)
    }
}

fn ensure_online(state: &InMemoryBoardState) -> TaskStoreResult<()> {
    if state.offline {
        return Err(TaskStoreError::unavailable(std::io::Error::new(
            std::io::ErrorKind::NotConnected,
            "in-memory store is offline",
        )));
    }
    Ok(())
}

#[async_trait]
impl<C: Clock + Send + Sync> TaskStore for InMemoryTaskStore<C> {
    async fn list_tasks(&self) -> TaskStoreResult<Vec<Task>> {
        let state = self.read()?;
        Ok(state.tasks.values().cloned().collect())
    }

    async fn list_users(&self) -> TaskStoreResult<Vec<User>> {
        let state = self.read()?;
        Ok(state.users.clone())
    }

    async fn find_task(&self, id: TaskId) -> TaskStoreResult<Option<Task>> {
        let state = self.read()?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn create_task(&self, draft: &NewTask) -> TaskStoreResult<Task> {
        let mut state = self.write()?;
        let id = TaskId::new(state.next_id);
        state.next_id = state.next_id.saturating_add(1);
        let task = Task::create(id, draft, &*self.clock);
        state.tasks.insert(id, task.clone());
        Ok(task)
    }

    async fn update_task(&self, id: TaskId, patch: &TaskPatch) -> TaskStoreResult<Task> {
        if patch.is_empty() {
            return Err(TaskStoreError::Rejected(TaskDomainError::EmptyPatch));
        }
        let mut state = self.write()?;
        let task = state
            .tasks
            .get_mut(&id)
            .ok_or(TaskStoreError::NotFound(id))?;
        task.apply_patch(patch, &*self.clock);
        Ok(task.clone())
    }

    async fn delete_task(&self, id: TaskId) -> TaskStoreResult<()> {
        let mut state = self.write()?;
        state
            .tasks
            .remove(&id)
            .map(|_| ())
            .ok_or(TaskStoreError::NotFound(id))
    }
}
