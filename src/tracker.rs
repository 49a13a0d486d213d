//! Facade exposing every tracker operation with the closed
//! [`TrackerError`] taxonomy.
//!
//! The facade wires the lifecycle engine, bulk assignment, audit composer,
//! team registry, and authorization gate over shared repositories, and logs
//! each failure once with the identifiers involved.

use crate::authorization::AuthorizationGate;
use crate::error::{TrackerError, TrackerResult};
use crate::identity::{
    domain::{Caller, UserId},
    ports::UserDirectory,
};
use crate::task::{
    domain::{Task, TaskId, TaskWithAudit},
    ports::TaskRepository,
    services::{
        AuditComposer, BulkAssignmentService, CompletionOutcome, CreateTaskRequest,
        TaskLifecycleService,
    },
};
use crate::team::{
    domain::{Team, TeamId},
    ports::TeamRepository,
    services::{CreateTeamRequest, TeamService},
};
use mockable::Clock;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error};

/// How a task is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeletionMode {
    /// Set the soft-delete flag; the row and ownership record remain.
    Soft,
    /// Remove the row and its ownership record.
    Hard,
}

/// Entry point for callers that have already authenticated the request.
pub struct TaskTracker<T, M, U, C>
where
    T: TaskRepository,
    M: TeamRepository,
    U: UserDirectory,
    C: Clock + Send + Sync,
{
    lifecycle: TaskLifecycleService<T, C>,
    bulk: BulkAssignmentService<T, C>,
    audit: AuditComposer<T, U>,
    teams: TeamService<M, C>,
    gate: AuthorizationGate<T, M>,
}

impl<T, M, U, C> TaskTracker<T, M, U, C>
where
    T: TaskRepository,
    M: TeamRepository,
    U: UserDirectory,
    C: Clock + Send + Sync,
{
    /// Wires the tracker over the given adapters.
    #[must_use]
    pub fn new(tasks: Arc<T>, teams: Arc<M>, users: Arc<U>, clock: Arc<C>) -> Self {
        Self {
            lifecycle: TaskLifecycleService::new(Arc::clone(&tasks), Arc::clone(&clock)),
            bulk: BulkAssignmentService::new(Arc::clone(&tasks), Arc::clone(&clock)),
            audit: AuditComposer::new(Arc::clone(&tasks), users),
            teams: TeamService::new(Arc::clone(&teams), clock),
            gate: AuthorizationGate::new(tasks, teams),
        }
    }

    /// Creates a task; see [`TaskLifecycleService::create_task`].
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Validation`] for an invalid title or unknown
    /// team/user references, [`TrackerError::Storage`] otherwise.
    pub async fn create_task(
        &self,
        request: CreateTaskRequest,
        creator: &Caller,
    ) -> TrackerResult<Task> {
        observe(
            "create_task",
            &creator.user_id(),
            self.lifecycle.create_task(request, creator).await,
        )
    }

    /// Returns a live task.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] for missing or soft-deleted tasks.
    pub async fn find_task(&self, task_id: TaskId) -> TrackerResult<Task> {
        observe("find_task", &task_id, self.lifecycle.find_task(task_id).await)
    }

    /// Lists live tasks of a team, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Storage`] when the lookup fails.
    pub async fn tasks_for_team(&self, team_id: TeamId) -> TrackerResult<Vec<Task>> {
        observe(
            "tasks_for_team",
            &team_id,
            self.lifecycle.tasks_for_team(team_id).await,
        )
    }

    /// Lists live tasks assigned to a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Storage`] when the lookup fails.
    pub async fn tasks_assigned_to(&self, user_id: UserId) -> TrackerResult<Vec<Task>> {
        observe(
            "tasks_assigned_to",
            &user_id,
            self.lifecycle.tasks_assigned_to(user_id).await,
        )
    }

    /// Starts a task on behalf of its assignee.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Validation`] whenever no row was changed.
    pub async fn start_task(&self, task_id: TaskId, caller: UserId) -> TrackerResult<Task> {
        observe(
            "start_task",
            &task_id,
            self.lifecycle.start_task(task_id, caller).await,
        )
    }

    /// Completes a task on behalf of its assignee.
    ///
    /// A late completion without a reason yields
    /// [`CompletionOutcome::LateReasonRequired`] and changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Validation`] for a blank reason or whenever no
    /// row was changed.
    pub async fn complete_task(
        &self,
        task_id: TaskId,
        caller: UserId,
        late_reason: Option<String>,
    ) -> TrackerResult<CompletionOutcome> {
        observe(
            "complete_task",
            &task_id,
            self.lifecycle
                .complete_task(task_id, caller, late_reason)
                .await,
        )
    }

    /// Reassigns a task, resetting it to `assigned`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] for missing or soft-deleted tasks.
    pub async fn assign_to_user(
        &self,
        task_id: TaskId,
        assignee: UserId,
        assigner: UserId,
    ) -> TrackerResult<Task> {
        observe(
            "assign_to_user",
            &task_id,
            self.lifecycle
                .assign_to_user(task_id, assignee, assigner)
                .await,
        )
    }

    /// Copies a task once per target user, all or nothing. Repeated targets
    /// receive repeated copies.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Validation`] for an empty target list and
    /// [`TrackerError::NotFound`] for a missing or soft-deleted source.
    pub async fn assign_to_multiple_users(
        &self,
        source_id: TaskId,
        targets: Vec<UserId>,
        actor: &Caller,
    ) -> TrackerResult<Vec<Task>> {
        observe(
            "assign_to_multiple_users",
            &source_id,
            self.bulk
                .assign_to_multiple_users(source_id, &targets, actor)
                .await,
        )
    }

    /// Soft-deletes a task without an authorization check.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] for missing or already soft-deleted
    /// tasks.
    pub async fn soft_delete(&self, task_id: TaskId) -> TrackerResult<()> {
        observe(
            "soft_delete",
            &task_id,
            self.lifecycle.soft_delete(task_id).await,
        )
    }

    /// Hard-deletes a task without an authorization check.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] when the task does not exist.
    pub async fn hard_delete(&self, task_id: TaskId) -> TrackerResult<()> {
        observe(
            "hard_delete",
            &task_id,
            self.lifecycle.hard_delete(task_id).await,
        )
    }

    /// Deletes a task after checking that `caller` may do so.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Authorization`] on denial and
    /// [`TrackerError::NotFound`] when the task is missing.
    pub async fn delete_task(
        &self,
        task_id: TaskId,
        caller: &Caller,
        mode: DeletionMode,
    ) -> TrackerResult<()> {
        observe(
            "delete_task",
            &task_id,
            self.gate.require_task_deletion(task_id, caller).await,
        )?;
        match mode {
            DeletionMode::Soft => self.soft_delete(task_id).await,
            DeletionMode::Hard => self.hard_delete(task_id).await,
        }
    }

    /// Returns whether `caller` may delete the task.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] when an administrator asks about a
    /// missing task.
    pub async fn can_delete_task(&self, task_id: TaskId, caller: &Caller) -> TrackerResult<bool> {
        observe(
            "can_delete_task",
            &task_id,
            self.gate.can_delete_task(task_id, caller).await,
        )
    }

    /// Returns whether `user_id` may delete the team.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] when the team is missing.
    pub async fn can_delete_team(&self, team_id: TeamId, user_id: UserId) -> TrackerResult<bool> {
        observe(
            "can_delete_team",
            &team_id,
            self.gate.can_delete_team(team_id, user_id).await,
        )
    }

    /// Returns a task with resolved user profiles and its timeline.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] when no task row exists.
    pub async fn get_with_audit_trail(&self, task_id: TaskId) -> TrackerResult<TaskWithAudit> {
        observe(
            "get_with_audit_trail",
            &task_id,
            self.audit.get_with_audit_trail(task_id).await,
        )
    }

    /// Creates a team owned by `creator`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Validation`] for an invalid name.
    pub async fn create_team(
        &self,
        request: CreateTeamRequest,
        creator: &Caller,
    ) -> TrackerResult<Team> {
        observe(
            "create_team",
            &creator.user_id(),
            self.teams.create_team(request, creator).await,
        )
    }

    /// Returns a team.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] when the team is missing.
    pub async fn find_team(&self, team_id: TeamId) -> TrackerResult<Team> {
        observe("find_team", &team_id, self.teams.find_team(team_id).await)
    }

    /// Deletes a team after checking that `caller` created it.
    ///
    /// Every task of the team, soft-deleted ones included, is removed with
    /// its ownership record before the team row.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Authorization`] on denial and
    /// [`TrackerError::NotFound`] when the team is missing.
    pub async fn delete_team(&self, team_id: TeamId, caller: &Caller) -> TrackerResult<()> {
        observe(
            "delete_team",
            &team_id,
            self.gate.require_team_deletion(team_id, caller).await,
        )?;
        observe(
            "delete_team",
            &team_id,
            self.lifecycle.purge_team_tasks(team_id).await,
        )?;
        observe(
            "delete_team",
            &team_id,
            self.teams.delete_team(team_id).await,
        )
    }
}

/// Converts a layered result into the facade taxonomy, logging failures.
fn observe<T, E>(
    operation: &'static str,
    resource_id: &(dyn fmt::Display + Sync),
    result: Result<T, E>,
) -> TrackerResult<T>
where
    E: Into<TrackerError>,
{
    result.map_err(|err| {
        let err = err.into();
        match &err {
            TrackerError::Storage(source) => error!(
                operation,
                resource_id = %resource_id,
                error = %source,
                "storage failure"
            ),
            other => debug!(
                operation,
                resource_id = %resource_id,
                status = other.status_code(),
                error = %other,
                "request rejected"
            ),
        }
        err
    })
}
