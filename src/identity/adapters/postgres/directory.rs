//! `PostgreSQL` implementation of the user directory.

use super::schema::users;
use crate::identity::{
    domain::{Role, UserId, UserProfile},
    ports::{DirectoryError, DirectoryResult, UserDirectory},
};
use crate::persistence::{PgPool, get_conn_with, run_blocking_with};
use async_trait::async_trait;
use diesel::prelude::*;
use std::collections::HashMap;

/// Query result row for user profiles.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct UserRow {
    id: uuid::Uuid,
    name: String,
    email: Option<String>,
    role: String,
}

/// `PostgreSQL`-backed user directory.
#[derive(Debug, Clone)]
pub struct PostgresUserDirectory {
    pool: PgPool,
}

impl PostgresUserDirectory {
    /// Creates a directory from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn find_profiles(&self, ids: &[UserId]) -> DirectoryResult<HashMap<UserId, UserProfile>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let pool = self.pool.clone();
        let lookup: Vec<uuid::Uuid> = ids.iter().map(|id| id.into_inner()).collect();

        run_blocking_with(
            move || {
                let mut connection = get_conn_with(&pool, DirectoryError::persistence)?;
                let rows = users::table
                    .filter(users::id.eq_any(&lookup))
                    .select(UserRow::as_select())
                    .load::<UserRow>(&mut connection)
                    .map_err(DirectoryError::persistence)?;
                rows.into_iter()
                    .map(|row| {
                        let profile = row_to_profile(row)?;
                        Ok((profile.id(), profile))
                    })
                    .collect()
            },
            DirectoryError::persistence,
        )
        .await
    }
}

fn row_to_profile(row: UserRow) -> DirectoryResult<UserProfile> {
    let role = Role::try_from(row.role.as_str()).map_err(DirectoryError::persistence)?;
    let profile = UserProfile::new(UserId::from_uuid(row.id), row.name, role);
    Ok(match row.email {
        Some(email) => profile.with_email(email),
        None => profile,
    })
}
