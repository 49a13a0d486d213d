//! Read-only audit projection of a task.

use super::lifecycle::{TaskLifecycleError, TaskLifecycleResult};
use crate::identity::ports::UserDirectory;
use crate::task::{
    domain::{TaskId, TaskOwnership, TaskWithAudit},
    ports::TaskRepository,
};
use std::sync::Arc;

/// Joins tasks with user profiles and derives their timeline.
#[derive(Clone)]
pub struct AuditComposer<R, U>
where
    R: TaskRepository,
    U: UserDirectory,
{
    repository: Arc<R>,
    directory: Arc<U>,
}

impl<R, U> AuditComposer<R, U>
where
    R: TaskRepository,
    U: UserDirectory,
{
    /// Creates a new audit composer.
    #[must_use]
    pub const fn new(repository: Arc<R>, directory: Arc<U>) -> Self {
        Self {
            repository,
            directory,
        }
    }

    /// Returns the task with resolved user profiles and its timeline.
    ///
    /// Soft-deleted tasks remain auditable. Users missing from the directory
    /// are rendered by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when no task row exists, or a
    /// repository/directory error when a lookup fails.
    pub async fn get_with_audit_trail(&self, task_id: TaskId) -> TaskLifecycleResult<TaskWithAudit> {
        let task = self
            .repository
            .find_by_id(task_id)
            .await?
            .ok_or(TaskLifecycleError::NotFound(task_id))?;
        let ownership = self.repository.find_ownership(task_id).await?;

        let mut user_ids = vec![task.assigned_to(), task.assigned_by()];
        user_ids.extend(task.completed_by());
        user_ids.extend(ownership.as_ref().map(TaskOwnership::creator_user_id));
        user_ids.sort();
        user_ids.dedup();

        let profiles = self.directory.find_profiles(&user_ids).await?;
        Ok(TaskWithAudit::compose(task, ownership.as_ref(), &profiles))
    }
}
