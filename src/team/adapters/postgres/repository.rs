//! `PostgreSQL` repository implementation for teams.

use super::{
    models::{TeamOwnershipRow, TeamRow},
    schema::{team_ownerships, teams},
};
use crate::identity::domain::{Role, UserId};
use crate::persistence::{PgPool, get_conn_with, run_blocking_with};
use crate::team::{
    domain::{PersistedTeamData, Team, TeamId, TeamName, TeamOwnership},
    ports::{TeamRepository, TeamRepositoryError, TeamRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed team repository.
#[derive(Debug, Clone)]
pub struct PostgresTeamRepository {
    pool: PgPool,
}

impl PostgresTeamRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TeamRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TeamRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        run_blocking_with(
            move || {
                let mut connection = get_conn_with(&pool, TeamRepositoryError::persistence)?;
                f(&mut connection)
            },
            TeamRepositoryError::persistence,
        )
        .await
    }
}

impl From<DieselError> for TeamRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl TeamRepository for PostgresTeamRepository {
    async fn store_with_ownership(
        &self,
        team: &Team,
        ownership: &TeamOwnership,
    ) -> TeamRepositoryResult<()> {
        let team_id = team.id();
        let team_row = to_team_row(team);
        let ownership_row = to_ownership_row(ownership);

        self.run_blocking(move |connection| {
            connection.transaction::<_, TeamRepositoryError, _>(|tx| {
                diesel::insert_into(teams::table)
                    .values(&team_row)
                    .execute(tx)
                    .map_err(|err| map_insert_error(err, team_id))?;
                diesel::insert_into(team_ownerships::table)
                    .values(&ownership_row)
                    .execute(tx)?;
                Ok(())
            })
        })
        .await
    }

    async fn find_by_id(&self, id: TeamId) -> TeamRepositoryResult<Option<Team>> {
        self.run_blocking(move |connection| {
            let row = teams::table
                .filter(teams::id.eq(id.into_inner()))
                .select(TeamRow::as_select())
                .first::<TeamRow>(connection)
                .optional()?;
            row.map(row_to_team).transpose()
        })
        .await
    }

    async fn find_ownership(&self, id: TeamId) -> TeamRepositoryResult<Option<TeamOwnership>> {
        self.run_blocking(move |connection| {
            let row = team_ownerships::table
                .filter(team_ownerships::team_id.eq(id.into_inner()))
                .select(TeamOwnershipRow::as_select())
                .first::<TeamOwnershipRow>(connection)
                .optional()?;
            row.map(row_to_ownership).transpose()
        })
        .await
    }

    async fn delete(&self, id: TeamId) -> TeamRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, TeamRepositoryError, _>(|tx| {
                diesel::delete(
                    team_ownerships::table.filter(team_ownerships::team_id.eq(id.into_inner())),
                )
                .execute(tx)?;
                let deleted =
                    diesel::delete(teams::table.filter(teams::id.eq(id.into_inner()))).execute(tx)?;
                Ok(deleted > 0)
            })
        })
        .await
    }
}

fn map_insert_error(err: DieselError, team_id: TeamId) -> TeamRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            TeamRepositoryError::DuplicateTeam(team_id)
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            TeamRepositoryError::UnknownOwner(team_id)
        }
        _ => TeamRepositoryError::persistence(err),
    }
}

fn to_team_row(team: &Team) -> TeamRow {
    TeamRow {
        id: team.id().into_inner(),
        name: team.name().as_str().to_owned(),
        description: team.description().map(ToOwned::to_owned),
        owner_id: team.owner_id().into_inner(),
        created_at: team.created_at(),
        updated_at: team.updated_at(),
    }
}

fn to_ownership_row(ownership: &TeamOwnership) -> TeamOwnershipRow {
    TeamOwnershipRow {
        team_id: ownership.team_id().into_inner(),
        creator_user_id: ownership.creator_user_id().into_inner(),
        creator_role: ownership.creator_role().as_str().to_owned(),
        created_at: ownership.recorded_at(),
    }
}

fn row_to_team(row: TeamRow) -> TeamRepositoryResult<Team> {
    let name = TeamName::new(row.name).map_err(TeamRepositoryError::persistence)?;
    Ok(Team::from_persisted(PersistedTeamData {
        id: TeamId::from_uuid(row.id),
        name,
        description: row.description,
        owner_id: UserId::from_uuid(row.owner_id),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

fn row_to_ownership(row: TeamOwnershipRow) -> TeamRepositoryResult<TeamOwnership> {
    let role = Role::try_from(row.creator_role.as_str()).map_err(TeamRepositoryError::persistence)?;
    Ok(TeamOwnership::from_persisted(
        TeamId::from_uuid(row.team_id),
        UserId::from_uuid(row.creator_user_id),
        role,
        row.created_at,
    ))
}
