//! Evidence loading around the authorization policy.

use super::{
    AuthorizationError, AuthorizationResult, Decision, Operation, OwnershipEvidence, authorize,
    precheck,
};
use crate::identity::domain::{Caller, Role, UserId};
use crate::task::{domain::TaskId, ports::TaskRepository};
use crate::team::{domain::TeamId, ports::TeamRepository};
use std::sync::Arc;
use tracing::{debug, warn};

/// Loads ownership evidence and applies [`authorize`].
#[derive(Clone)]
pub struct AuthorizationGate<T, M>
where
    T: TaskRepository,
    M: TeamRepository,
{
    tasks: Arc<T>,
    teams: Arc<M>,
}

impl<T, M> AuthorizationGate<T, M>
where
    T: TaskRepository,
    M: TeamRepository,
{
    /// Creates a gate over the task and team repositories.
    #[must_use]
    pub const fn new(tasks: Arc<T>, teams: Arc<M>) -> Self {
        Self { tasks, teams }
    }

    /// Returns whether `caller` may delete the task.
    ///
    /// Non-administrators are refused without a store lookup. Soft-deleted
    /// tasks are still evaluated.
    ///
    /// # Errors
    ///
    /// Returns [`AuthorizationError::TaskNotFound`] when an administrator asks
    /// about a task that does not exist.
    pub async fn can_delete_task(
        &self,
        task_id: TaskId,
        caller: &Caller,
    ) -> AuthorizationResult<bool> {
        Ok(self.task_decision(task_id, caller).await?.is_allowed())
    }

    /// Returns whether `user_id` may delete the team.
    ///
    /// # Errors
    ///
    /// Returns [`AuthorizationError::TeamNotFound`] when the team does not
    /// exist.
    pub async fn can_delete_team(
        &self,
        team_id: TeamId,
        user_id: UserId,
    ) -> AuthorizationResult<bool> {
        // Team deletion never consults the caller's current role.
        let caller = Caller::new(user_id, Role::Member);
        Ok(self.team_decision(team_id, &caller).await?.is_allowed())
    }

    /// Fails unless `caller` may delete the task.
    ///
    /// # Errors
    ///
    /// Returns [`AuthorizationError::Denied`] on denial, or the lookup errors
    /// of [`Self::can_delete_task`].
    pub async fn require_task_deletion(
        &self,
        task_id: TaskId,
        caller: &Caller,
    ) -> AuthorizationResult<()> {
        match self.task_decision(task_id, caller).await? {
            Decision::Allow => Ok(()),
            Decision::Deny(_) => Err(AuthorizationError::Denied(Operation::DeleteTask)),
        }
    }

    /// Fails unless `caller` may delete the team.
    ///
    /// # Errors
    ///
    /// Returns [`AuthorizationError::Denied`] on denial, or the lookup errors
    /// of [`Self::can_delete_team`].
    pub async fn require_team_deletion(
        &self,
        team_id: TeamId,
        caller: &Caller,
    ) -> AuthorizationResult<()> {
        match self.team_decision(team_id, caller).await? {
            Decision::Allow => Ok(()),
            Decision::Deny(_) => Err(AuthorizationError::Denied(Operation::DeleteTeam)),
        }
    }

    async fn task_decision(
        &self,
        task_id: TaskId,
        caller: &Caller,
    ) -> AuthorizationResult<Decision> {
        let decision = match precheck(Operation::DeleteTask, caller) {
            Some(decision) => decision,
            None => {
                let task = self
                    .tasks
                    .find_by_id(task_id)
                    .await?
                    .ok_or(AuthorizationError::TaskNotFound(task_id))?;
                let ownership = self.tasks.find_ownership(task_id).await?;
                let evidence = OwnershipEvidence::for_task(&task, ownership.as_ref());
                authorize(Operation::DeleteTask, caller, &evidence)
            }
        };
        log_decision(Operation::DeleteTask, &task_id.to_string(), caller, decision);
        Ok(decision)
    }

    async fn team_decision(
        &self,
        team_id: TeamId,
        caller: &Caller,
    ) -> AuthorizationResult<Decision> {
        let team = self
            .teams
            .find_by_id(team_id)
            .await?
            .ok_or(AuthorizationError::TeamNotFound(team_id))?;
        let ownership = self.teams.find_ownership(team_id).await?;
        let evidence = OwnershipEvidence::for_team(&team, ownership.as_ref());
        let decision = authorize(Operation::DeleteTeam, caller, &evidence);
        log_decision(Operation::DeleteTeam, &team_id.to_string(), caller, decision);
        Ok(decision)
    }
}

fn log_decision(operation: Operation, resource_id: &str, caller: &Caller, decision: Decision) {
    match decision {
        Decision::Allow => debug!(
            %operation,
            resource_id,
            user_id = %caller.user_id(),
            "authorization granted"
        ),
        Decision::Deny(reason) => warn!(
            %operation,
            resource_id,
            user_id = %caller.user_id(),
            role = %caller.role(),
            %reason,
            "authorization denied"
        ),
    }
}
