//! Diesel row models for task persistence.

use super::schema::{task_ownerships, tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result model for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Lifecycle status.
    pub status: String,
    /// Current assignee.
    pub assigned_to: uuid::Uuid,
    /// User who made the current assignment.
    pub assigned_by: uuid::Uuid,
    /// Completing user.
    pub completed_by: Option<uuid::Uuid>,
    /// Owning team.
    pub team_id: uuid::Uuid,
    /// Optional deadline.
    pub due_date: Option<DateTime<Utc>>,
    /// Late completion reason.
    pub late_submission_reason: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest assignment timestamp.
    pub assigned_at: DateTime<Utc>,
    /// Start timestamp.
    pub started_at: Option<DateTime<Utc>>,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete flag.
    pub is_deleted: bool,
}

/// Insert model for new task records.
///
/// Completion fields are omitted: a new task is always `assigned`.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Lifecycle status.
    pub status: String,
    /// Assignee.
    pub assigned_to: uuid::Uuid,
    /// Assigner.
    pub assigned_by: uuid::Uuid,
    /// Owning team.
    pub team_id: uuid::Uuid,
    /// Optional deadline.
    pub due_date: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Assignment timestamp.
    pub assigned_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Row model for task ownership records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = task_ownerships)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskOwnershipRow {
    /// Owned task.
    pub task_id: uuid::Uuid,
    /// Creating user.
    pub creator_user_id: uuid::Uuid,
    /// Creator role at creation time.
    pub creator_role: String,
    /// Ledger write timestamp.
    pub created_at: DateTime<Utc>,
}
