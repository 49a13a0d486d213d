//! Repository port for teams and their ownership records.

use crate::team::domain::{Team, TeamId, TeamOwnership};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for team repository operations.
pub type TeamRepositoryResult<T> = Result<T, TeamRepositoryError>;

/// Team persistence contract.
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Stores a new team together with its ownership record.
    ///
    /// Both rows are written atomically: if either insert fails neither is
    /// persisted.
    ///
    /// # Errors
    ///
    /// Returns [`TeamRepositoryError::DuplicateTeam`] when the team ID already
    /// exists.
    async fn store_with_ownership(
        &self,
        team: &Team,
        ownership: &TeamOwnership,
    ) -> TeamRepositoryResult<()>;

    /// Finds a team by identifier.
    async fn find_by_id(&self, id: TeamId) -> TeamRepositoryResult<Option<Team>>;

    /// Returns the ownership record for a team.
    ///
    /// Returns `None` for teams that predate the ownership ledger.
    async fn find_ownership(&self, id: TeamId) -> TeamRepositoryResult<Option<TeamOwnership>>;

    /// Removes a team and its ownership record.
    ///
    /// Returns `false` when no team matched.
    async fn delete(&self, id: TeamId) -> TeamRepositoryResult<bool>;
}

/// Errors returned by team repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TeamRepositoryError {
    /// A team with the same identifier already exists.
    #[error("duplicate team identifier: {0}")]
    DuplicateTeam(TeamId),

    /// The team owner does not reference a known user.
    #[error("team {0} references an unknown owner")]
    UnknownOwner(TeamId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TeamRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
