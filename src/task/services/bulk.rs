//! Fan-out of one task definition to several assignees.

use super::lifecycle::{TaskLifecycleError, TaskLifecycleResult};
use crate::identity::domain::{Caller, UserId};
use crate::task::{
    domain::{OwnedTask, Task, TaskId},
    ports::TaskRepository,
};
use mockable::Clock;
use std::sync::Arc;
use tracing::info;

/// Bulk assignment coordinator.
#[derive(Clone)]
pub struct BulkAssignmentService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> BulkAssignmentService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new bulk assignment service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates one independent `assigned` copy of the source task per entry
    /// in `targets`, all or nothing.
    ///
    /// Each copy shares title, description, team, and due date with the
    /// source and gets its own ownership record naming `actor`. Repeated
    /// target ids produce repeated copies.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NoAssignees`] for an empty target list,
    /// [`TaskLifecycleError::NotFound`] when the source task is missing or
    /// soft-deleted, and [`TaskLifecycleError::Repository`] when the batch
    /// insert fails; no copy is persisted in any of these cases.
    pub async fn assign_to_multiple_users(
        &self,
        source_id: TaskId,
        targets: &[UserId],
        actor: &Caller,
    ) -> TaskLifecycleResult<Vec<Task>> {
        if targets.is_empty() {
            return Err(TaskLifecycleError::NoAssignees);
        }
        let source = self
            .repository
            .find_by_id(source_id)
            .await?
            .filter(|task| !task.is_deleted())
            .ok_or(TaskLifecycleError::NotFound(source_id))?;

        let entries: Vec<OwnedTask> = targets
            .iter()
            .map(|target| {
                let copy = source.duplicate_for(*target, actor.user_id(), &*self.clock);
                OwnedTask::new(copy, actor)
            })
            .collect();
        self.repository.store_batch(&entries).await?;

        info!(
            source_task_id = %source_id,
            actor = %actor.user_id(),
            count = entries.len(),
            "task assigned to multiple users"
        );
        Ok(entries.into_iter().map(OwnedTask::into_task).collect())
    }
}
