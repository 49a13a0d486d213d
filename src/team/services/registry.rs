//! Service layer for team creation, lookup, and removal.

use crate::identity::domain::Caller;
use crate::team::{
    domain::{Team, TeamDomainError, TeamId, TeamName, TeamOwnership},
    ports::{TeamRepository, TeamRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Request payload for creating a team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTeamRequest {
    name: String,
    description: Option<String>,
}

impl CreateTeamRequest {
    /// Creates a request with the team name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    /// Sets the team description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Service-level errors for team operations.
#[derive(Debug, Error)]
pub enum TeamServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TeamDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TeamRepositoryError),
    /// The team does not exist.
    #[error("team not found: {0}")]
    NotFound(TeamId),
}

/// Result type for team service operations.
pub type TeamServiceResult<T> = Result<T, TeamServiceError>;

/// Team registry service.
#[derive(Clone)]
pub struct TeamService<R, C>
where
    R: TeamRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> TeamService<R, C>
where
    R: TeamRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new team service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates a team owned by `creator` and records the creator in the
    /// ownership ledger in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns [`TeamServiceError`] when the name is invalid or persistence
    /// fails.
    pub async fn create_team(
        &self,
        request: CreateTeamRequest,
        creator: &Caller,
    ) -> TeamServiceResult<Team> {
        let name = TeamName::new(request.name)?;
        let team = Team::new(name, request.description, creator.user_id(), &*self.clock);
        let ownership = TeamOwnership::record(team.id(), creator, team.created_at());
        self.repository
            .store_with_ownership(&team, &ownership)
            .await?;
        info!(team_id = %team.id(), creator = %creator.user_id(), "team created");
        Ok(team)
    }

    /// Retrieves a team by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TeamServiceError::NotFound`] when the team does not exist.
    pub async fn find_team(&self, team_id: TeamId) -> TeamServiceResult<Team> {
        self.repository
            .find_by_id(team_id)
            .await?
            .ok_or(TeamServiceError::NotFound(team_id))
    }

    /// Removes a team and its ownership record.
    ///
    /// The team's tasks must already be gone; [`crate::TaskTracker::delete_team`]
    /// purges them first. Authorization is the caller's responsibility; see
    /// [`crate::authorization::AuthorizationGate::can_delete_team`].
    ///
    /// # Errors
    ///
    /// Returns [`TeamServiceError::NotFound`] when the team does not exist.
    pub async fn delete_team(&self, team_id: TeamId) -> TeamServiceResult<()> {
        if !self.repository.delete(team_id).await? {
            return Err(TeamServiceError::NotFound(team_id));
        }
        info!(team_id = %team_id, "team deleted");
        Ok(())
    }
}
