//! Task mutation coordinator.
//!
//! Every change to the board is two explicit steps: mutate the store, then
//! resynchronise the whole snapshot from it. The board is never patched in
//! place. Between a mutation and the end of its resync the cached board may
//! lag behind the store; that window is the only consistency guarantee.

use super::{BoardError, BoardResult, BoardSnapshot, SnapshotCache};
use crate::board::{
    domain::{
        AssigneeFilter, BoardView, CreateTaskRequest, Task, TaskId, TaskPatch, TransitionTarget,
        resolve_transition,
    },
    ports::TaskStore,
};
use std::sync::Arc;

/// A single store mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Create a task.
    Create(CreateTaskRequest),
    /// Apply a partial update.
    Update {
        /// Task to update.
        id: TaskId,
        /// Fields to change.
        patch: TaskPatch,
    },
    /// Delete a task.
    Delete(TaskId),
    /// Move a task to another stage.
    Transition {
        /// Task to move.
        id: TaskId,
        /// Requested stage change.
        target: TransitionTarget,
    },
}

/// Outcome of a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationReceipt {
    /// The stored task after creation.
    Created(Task),
    /// The stored task after an update or transition.
    Updated(Task),
    /// Identifier of the deleted task.
    Deleted(TaskId),
}

/// A mutation followed by its resync.
#[derive(Debug, Clone)]
pub struct SyncedMutation {
    /// What the mutation produced. Always present: the mutation succeeded.
    pub receipt: MutationReceipt,
    /// The snapshot installed by the follow-up resync, or why it failed. On
    /// failure the cache still holds the previous snapshot.
    pub resync: BoardResult<Arc<BoardSnapshot>>,
}

/// Board mutation and resynchronisation service.
pub struct BoardService<S>
where
    S: TaskStore,
{
    store: Arc<S>,
    cache: Arc<SnapshotCache>,
}

impl<S> Clone for BoardService<S>
where
    S: TaskStore,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<S> BoardService<S>
where
    S: TaskStore,
{
    /// Creates a service with an empty snapshot cache.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            cache: Arc::new(SnapshotCache::new()),
        }
    }

    /// Returns the underlying store.
    #[must_use]
    pub const fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Returns the last successfully loaded snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<BoardSnapshot>> {
        self.cache.current()
    }

    /// Projects the last successfully loaded snapshot.
    ///
    /// Returns `None` until the first resync succeeds.
    #[must_use]
    pub fn board(&self, filter: Option<&AssigneeFilter>) -> Option<BoardView> {
        self.cache.current().map(|snapshot| snapshot.project(filter))
    }

    /// Reloads every task and user from the store and installs the result.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::StoreUnavailable`] when either listing fails.
    /// The previously installed snapshot is kept.
    pub async fn resync(&self) -> BoardResult<Arc<BoardSnapshot>> {
        let ticket = self.cache.next_ticket();
        let fetched = tokio::try_join!(self.store.list_tasks(), self.store.list_users());
        match fetched {
            Ok((tasks, users)) => {
                tracing::debug!(
                    generation = ticket,
                    tasks = tasks.len(),
                    users = users.len(),
                    "board resynced"
                );
                Ok(self.cache.install(BoardSnapshot::new(ticket, tasks, users)))
            }
            Err(err) => {
                tracing::warn!(
                    generation = ticket,
                    error = %err,
                    "resync failed; keeping last loaded board"
                );
                Err(err.into())
            }
        }
    }

    /// Creates a task.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Validation`] without touching the store when
    /// the title is missing or blank, or the store error otherwise.
    pub async fn create_task(&self, request: CreateTaskRequest) -> BoardResult<Task> {
        let draft = request.validate()?;
        let task = self.store.create_task(&draft).await?;
        tracing::info!(task_id = %task.id(), status = %task.status().as_str(), "task created");
        Ok(task)
    }

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Validation`] without touching the store when
    /// the patch is empty or would blank the title, and
    /// [`BoardError::NotFound`] when the task does not exist.
    pub async fn update_task(&self, id: TaskId, patch: TaskPatch) -> BoardResult<Task> {
        patch.validate()?;
        let task = self.store.update_task(id, &patch).await?;
        tracing::info!(task_id = %id, fields = ?patch.changed_fields(), "task updated");
        Ok(task)
    }

    /// Deletes a task.
    ///
    /// Deleting a task that no longer exists is an error, not a no-op;
    /// callers wanting idempotence treat [`BoardError::NotFound`] as success.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NotFound`] when the task does not exist.
    pub async fn delete_task(&self, id: TaskId) -> BoardResult<()> {
        self.store.delete_task(id).await?;
        tracing::info!(task_id = %id, "task deleted");
        Ok(())
    }

    /// Moves a task according to `target` and persists the new stage.
    ///
    /// The current status is read from the store rather than the cached
    /// snapshot. When the resolved stage equals the current one (advancing
    /// a done task, dropping a card on its own column) nothing is written.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NotFound`] when the task does not exist.
    pub async fn request_transition(
        &self,
        id: TaskId,
        target: TransitionTarget,
    ) -> BoardResult<Task> {
        let current = self
            .store
            .find_task(id)
            .await?
            .ok_or(BoardError::NotFound(id))?;
        let transition = resolve_transition(current.status(), target);
        if transition.is_noop() {
            tracing::debug!(task_id = %id, stage = %transition.to, "transition is a no-op");
            return Ok(current);
        }

        let task = self
            .store
            .update_task(id, &TaskPatch::status(transition.to))
            .await?;
        tracing::info!(
            task_id = %id,
            from = transition.from.as_str(),
            to = %transition.to,
            "task moved"
        );
        Ok(task)
    }

    /// Advances a task to the next stage, staying put once done.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NotFound`] when the task does not exist.
    pub async fn advance_task(&self, id: TaskId) -> BoardResult<Task> {
        self.request_transition(id, TransitionTarget::Advance).await
    }

    /// Performs a mutation without resyncing.
    ///
    /// # Errors
    ///
    /// Returns the error of the underlying operation.
    pub async fn apply(&self, mutation: Mutation) -> BoardResult<MutationReceipt> {
        match mutation {
            Mutation::Create(request) => {
                self.create_task(request).await.map(MutationReceipt::Created)
            }
            Mutation::Update { id, patch } => {
                self.update_task(id, patch).await.map(MutationReceipt::Updated)
            }
            Mutation::Delete(id) => self
                .delete_task(id)
                .await
                .map(|()| MutationReceipt::Deleted(id)),
            Mutation::Transition { id, target } => self
                .request_transition(id, target)
                .await
                .map(MutationReceipt::Updated),
        }
    }

    /// Performs a mutation and then resyncs the snapshot.
    ///
    /// The resync runs after every successful mutation, whether or not
    /// anyone is still waiting for the board. A failed mutation skips the
    /// resync and leaves the cached board untouched.
    ///
    /// # Errors
    ///
    /// Returns the mutation's error. A resync failure is reported in
    /// [`SyncedMutation::resync`] instead, since the mutation itself
    /// succeeded.
    pub async fn apply_and_resync(&self, mutation: Mutation) -> BoardResult<SyncedMutation> {
        let receipt = self.apply(mutation).await?;
        let resync = self.resync().await;
        Ok(SyncedMutation { receipt, resync })
    }
}
