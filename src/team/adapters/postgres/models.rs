//! Diesel row models for team persistence.

use super::schema::{team_ownerships, teams};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Row model for team records, used for both reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = teams)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TeamRow {
    /// Team identifier.
    pub id: uuid::Uuid,
    /// Team name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Owner column.
    pub owner_id: uuid::Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Row model for team ownership records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = team_ownerships)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TeamOwnershipRow {
    /// Owned team.
    pub team_id: uuid::Uuid,
    /// Creating user.
    pub creator_user_id: uuid::Uuid,
    /// Creator role at creation time.
    pub creator_role: String,
    /// Ledger write timestamp.
    pub created_at: DateTime<Utc>,
}
