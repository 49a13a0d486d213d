//! Repository port for task persistence, conditional transitions, and the
//! task ownership ledger.

use crate::identity::domain::UserId;
use crate::task::domain::{
    ConditionalTransition, OwnedTask, Reassignment, Task, TaskId, TaskOwnership,
};
use crate::team::domain::TeamId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
///
/// Every mutating method is a single atomic operation against the store.
/// Implementations must never split a conditional update into a separate
/// read and write.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task together with its ownership record.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists. Nothing is persisted on error.
    async fn store_with_ownership(&self, entry: &OwnedTask) -> TaskRepositoryResult<()>;

    /// Stores every task of a batch with its ownership record, all or
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns the first failure; no task of the batch is persisted then.
    async fn store_batch(&self, entries: &[OwnedTask]) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier, including soft-deleted rows.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns the ownership record for a task.
    ///
    /// Returns `None` for tasks that predate the ownership ledger.
    async fn find_ownership(&self, id: TaskId) -> TaskRepositoryResult<Option<TaskOwnership>>;

    /// Returns live tasks of a team, newest first.
    async fn find_by_team(&self, team_id: TeamId) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns live tasks assigned to a user, newest first.
    async fn find_by_assignee(&self, user_id: UserId) -> TaskRepositoryResult<Vec<Task>>;

    /// Applies `transition` only if the stored row still matches its guard.
    ///
    /// Returns the updated task, or `None` when no row changed.
    async fn apply_transition(
        &self,
        transition: &ConditionalTransition,
    ) -> TaskRepositoryResult<Option<Task>>;

    /// Reassigns a live task regardless of its status.
    ///
    /// Returns the updated task, or `None` when the task is missing or
    /// soft-deleted.
    async fn reassign(
        &self,
        id: TaskId,
        reassignment: &Reassignment,
    ) -> TaskRepositoryResult<Option<Task>>;

    /// Sets the soft-delete flag on a live task.
    ///
    /// Returns `false` when the task is missing or already soft-deleted.
    async fn soft_delete(&self, id: TaskId, at: DateTime<Utc>) -> TaskRepositoryResult<bool>;

    /// Removes a task and its ownership record in one transaction.
    ///
    /// Returns `false` when the task does not exist.
    async fn hard_delete(&self, id: TaskId) -> TaskRepositoryResult<bool>;

    /// Removes every task of a team, soft-deleted ones included, with their
    /// ownership records in one transaction.
    ///
    /// Returns the number of tasks removed.
    async fn hard_delete_by_team(&self, team_id: TeamId) -> TaskRepositoryResult<usize>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task references a team or user the store does not know.
    #[error("task {task_id} references an unknown team or user ({constraint})")]
    UnknownReference {
        /// Task being written.
        task_id: TaskId,
        /// Violated constraint name, when the store reports one.
        constraint: String,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
