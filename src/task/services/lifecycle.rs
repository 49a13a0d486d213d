//! Service layer for task creation, status transitions, reassignment, and
//! removal.

use crate::identity::domain::{Caller, UserId};
use crate::identity::ports::DirectoryError;
use crate::task::{
    domain::{
        ConditionalTransition, LateSubmissionReason, OwnedTask, Reassignment, StatusChange, Task,
        TaskDomainError, TaskDraft, TaskId, TaskStatus, TaskTitle,
    },
    ports::{TaskRepository, TaskRepositoryError},
};
use crate::team::domain::TeamId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    team_id: TeamId,
    description: Option<String>,
    assignee: Option<UserId>,
    due_date: Option<DateTime<Utc>>,
}

impl CreateTaskRequest {
    /// Creates a request with the required task fields.
    #[must_use]
    pub fn new(title: impl Into<String>, team_id: TeamId) -> Self {
        Self {
            title: title.into(),
            team_id,
            description: None,
            assignee: None,
            due_date: None,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the assignee. Without one the task is assigned to its creator.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: UserId) -> Self {
        self.assignee = Some(assignee);
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Result of a completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// The task is now completed.
    Completed(Task),
    /// The completion is late and no reason was given; nothing was changed.
    LateReasonRequired {
        /// Due date the completion would have missed.
        due_date: DateTime<Utc>,
    },
}

/// Service-level errors for task operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// User profile lookup failed.
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    /// The task does not exist or has been soft-deleted.
    #[error("task not found: {0}")]
    NotFound(TaskId),
    /// A conditional transition changed no row.
    #[error("transition refused for task {0}")]
    TransitionRefused(TaskId),
    /// A bulk assignment named no target users.
    #[error("at least one assignee is required")]
    NoAssignees,
}

/// Result type for task service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
#[derive(Clone)]
pub struct TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates a task in `assigned` and records `creator` in the ownership
    /// ledger in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the title is invalid or the
    /// repository rejects persistence.
    pub async fn create_task(
        &self,
        request: CreateTaskRequest,
        creator: &Caller,
    ) -> TaskLifecycleResult<Task> {
        let title = TaskTitle::new(request.title)?;
        let draft = TaskDraft {
            title,
            description: request.description,
            team_id: request.team_id,
            assigned_to: request.assignee.unwrap_or(creator.user_id()),
            assigned_by: creator.user_id(),
            due_date: request.due_date,
        };
        let entry = OwnedTask::new(Task::new(draft, &*self.clock), creator);
        self.repository.store_with_ownership(&entry).await?;

        let task = entry.into_task();
        info!(
            task_id = %task.id(),
            team_id = %task.team_id(),
            assignee = %task.assigned_to(),
            creator = %creator.user_id(),
            "task created"
        );
        Ok(task)
    }

    /// Retrieves a live task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task is missing or
    /// soft-deleted.
    pub async fn find_task(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.repository
            .find_by_id(task_id)
            .await?
            .filter(|task| !task.is_deleted())
            .ok_or(TaskLifecycleError::NotFound(task_id))
    }

    /// Lists live tasks of a team, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn tasks_for_team(&self, team_id: TeamId) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.repository.find_by_team(team_id).await?)
    }

    /// Lists live tasks assigned to a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn tasks_assigned_to(&self, user_id: UserId) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.repository.find_by_assignee(user_id).await?)
    }

    /// Moves a task from `assigned` to `in_progress` on behalf of its
    /// assignee.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TransitionRefused`] when the task is
    /// missing, soft-deleted, not `assigned`, or assigned to someone else.
    pub async fn start_task(&self, task_id: TaskId, caller: UserId) -> TaskLifecycleResult<Task> {
        let change = StatusChange::Start {
            at: self.clock.utc(),
        };
        let transition = ConditionalTransition::new(task_id, caller, change);
        let task = self.apply(&transition).await?;
        info!(task_id = %task_id, user_id = %caller, "task started");
        Ok(task)
    }

    /// Completes an `in_progress` task on behalf of its assignee.
    ///
    /// A completion after the due date needs a reason; without one the task
    /// is left untouched and [`CompletionOutcome::LateReasonRequired`] is
    /// returned. A reason given for an on-time completion is discarded.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] for a blank reason and
    /// [`TaskLifecycleError::TransitionRefused`] when the task is missing,
    /// soft-deleted, not `in_progress`, or assigned to someone else.
    pub async fn complete_task(
        &self,
        task_id: TaskId,
        caller: UserId,
        late_reason: Option<String>,
    ) -> TaskLifecycleResult<CompletionOutcome> {
        let reason = late_reason.map(LateSubmissionReason::new).transpose()?;
        let now = self.clock.utc();

        // Only the caller's own in-progress task is classified, so refusals
        // never reveal another user's due date.
        let Some(snapshot) = self.repository.find_by_id(task_id).await?.filter(|task| {
            !task.is_deleted()
                && task.status() == TaskStatus::InProgress
                && task.assigned_to() == caller
        }) else {
            debug!(task_id = %task_id, user_id = %caller, "completion refused before update");
            return Err(TaskLifecycleError::TransitionRefused(task_id));
        };

        let late_reason = match (snapshot.due_date().filter(|due| now > *due), reason) {
            (Some(due_date), None) => {
                debug!(task_id = %task_id, user_id = %caller, "late completion needs a reason");
                return Ok(CompletionOutcome::LateReasonRequired { due_date });
            }
            (Some(_), reason) => reason,
            (None, _) => None,
        };

        let change = StatusChange::Complete {
            at: now,
            by: caller,
            late_reason,
        };
        let transition = ConditionalTransition::new(task_id, caller, change);
        let task = self.apply(&transition).await?;
        info!(
            task_id = %task_id,
            user_id = %caller,
            late = task.is_late_submission(),
            "task completed"
        );
        Ok(CompletionOutcome::Completed(task))
    }

    /// Hands a task to `assignee`, resetting it to `assigned` whatever its
    /// current status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task is missing or
    /// soft-deleted.
    pub async fn assign_to_user(
        &self,
        task_id: TaskId,
        assignee: UserId,
        assigner: UserId,
    ) -> TaskLifecycleResult<Task> {
        let reassignment = Reassignment::new(assignee, assigner, self.clock.utc());
        let task = self
            .repository
            .reassign(task_id, &reassignment)
            .await?
            .ok_or(TaskLifecycleError::NotFound(task_id))?;
        info!(task_id = %task_id, assignee = %assignee, assigner = %assigner, "task assigned");
        Ok(task)
    }

    /// Sets the soft-delete flag, keeping the row and its ownership record.
    ///
    /// Authorization is the caller's responsibility; see
    /// [`crate::authorization::AuthorizationGate::can_delete_task`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task is missing or
    /// already soft-deleted.
    pub async fn soft_delete(&self, task_id: TaskId) -> TaskLifecycleResult<()> {
        if !self.repository.soft_delete(task_id, self.clock.utc()).await? {
            return Err(TaskLifecycleError::NotFound(task_id));
        }
        info!(task_id = %task_id, "task soft-deleted");
        Ok(())
    }

    /// Removes a task and its ownership record.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task does not exist.
    pub async fn hard_delete(&self, task_id: TaskId) -> TaskLifecycleResult<()> {
        if !self.repository.hard_delete(task_id).await? {
            return Err(TaskLifecycleError::NotFound(task_id));
        }
        info!(task_id = %task_id, "task hard-deleted");
        Ok(())
    }

    /// Removes every task of a team ahead of the team itself.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the store fails.
    pub async fn purge_team_tasks(&self, team_id: TeamId) -> TaskLifecycleResult<usize> {
        let removed = self.repository.hard_delete_by_team(team_id).await?;
        info!(team_id = %team_id, removed, "team tasks removed");
        Ok(removed)
    }

    async fn apply(&self, transition: &ConditionalTransition) -> TaskLifecycleResult<Task> {
        let task_id = transition.task_id();
        self.repository
            .apply_transition(transition)
            .await?
            .ok_or_else(|| {
                debug!(
                    task_id = %task_id,
                    user_id = %transition.assignee(),
                    target = %transition.change().target_status(),
                    "conditional transition changed no row"
                );
                TaskLifecycleError::TransitionRefused(task_id)
            })
    }
}
