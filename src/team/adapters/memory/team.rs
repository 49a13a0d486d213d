//! In-memory repository for teams.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::team::{
    domain::{Team, TeamId, TeamOwnership},
    ports::{TeamRepository, TeamRepositoryError, TeamRepositoryResult},
};

/// Thread-safe in-memory team repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTeamRepository {
    state: Arc<RwLock<InMemoryTeamState>>,
}

#[derive(Debug, Default)]
struct InMemoryTeamState {
    teams: HashMap<TeamId, Team>,
    ownerships: HashMap<TeamId, TeamOwnership>,
}

impl InMemoryTeamRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a team without an ownership record, mirroring rows that
    /// predate the ownership ledger.
    ///
    /// # Errors
    ///
    /// Returns [`TeamRepositoryError::DuplicateTeam`] when the team already
    /// exists.
    pub fn store_legacy(&self, team: &Team) -> TeamRepositoryResult<()> {
        let mut state = self.write()?;
        if state.teams.contains_key(&team.id()) {
            return Err(TeamRepositoryError::DuplicateTeam(team.id()));
        }
        state.teams.insert(team.id(), team.clone());
        Ok(())
    }

    fn read(&self) -> TeamRepositoryResult<RwLockReadGuard<'_, InMemoryTeamState>> {
        self.state.read().map_err(|err| {
            TeamRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> TeamRepositoryResult<RwLockWriteGuard<'_, InMemoryTeamState>> {
        self.state.write().map_err(|err| {
            TeamRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl TeamRepository for InMemoryTeamRepository {
    async fn store_with_ownership(
        &self,
        team: &Team,
        ownership: &TeamOwnership,
    ) -> TeamRepositoryResult<()> {
        let mut state = self.write()?;
        if state.teams.contains_key(&team.id()) {
            return Err(TeamRepositoryError::DuplicateTeam(team.id()));
        }
        state.teams.insert(team.id(), team.clone());
        state.ownerships.insert(team.id(), *ownership);
        Ok(())
    }

    async fn find_by_id(&self, id: TeamId) -> TeamRepositoryResult<Option<Team>> {
        let state = self.read()?;
        Ok(state.teams.get(&id).cloned())
    }

    async fn find_ownership(&self, id: TeamId) -> TeamRepositoryResult<Option<TeamOwnership>> {
        let state = self.read()?;
        Ok(state.ownerships.get(&id).copied())
    }

    async fn delete(&self, id: TeamId) -> TeamRepositoryResult<bool> {
        let mut state = self.write()?;
        state.ownerships.remove(&id);
        Ok(state.teams.remove(&id).is_some())
    }
}
