//! `PostgreSQL` repository implementation for task lifecycle storage.
//!
//! Conditional transitions compile to a single
//! `UPDATE ... WHERE <guard> RETURNING *`, so the database row lock decides
//! which of several racing requests wins.

use super::{
    models::{NewTaskRow, TaskOwnershipRow, TaskRow},
    schema::{task_ownerships, tasks},
};
use crate::identity::domain::{Role, UserId};
use crate::persistence::{PgPool, get_conn_with, run_blocking_with};
use crate::task::{
    domain::{
        ConditionalTransition, LateSubmissionReason, OwnedTask, PersistedTaskData, Reassignment,
        StatusChange, Task, TaskId, TaskOwnership, TaskStatus, TaskTitle,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use crate::team::domain::TeamId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        run_blocking_with(
            move || {
                let mut connection = get_conn_with(&pool, TaskRepositoryError::persistence)?;
                f(&mut connection)
            },
            TaskRepositoryError::persistence,
        )
        .await
    }
}

impl From<DieselError> for TaskRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store_with_ownership(&self, entry: &OwnedTask) -> TaskRepositoryResult<()> {
        let rows = vec![to_insert_rows(entry)];
        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx| insert_all(tx, &rows))
        })
        .await
    }

    async fn store_batch(&self, entries: &[OwnedTask]) -> TaskRepositoryResult<()> {
        let rows: Vec<_> = entries.iter().map(to_insert_rows).collect();
        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx| insert_all(tx, &rows))
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn find_ownership(&self, id: TaskId) -> TaskRepositoryResult<Option<TaskOwnership>> {
        self.run_blocking(move |connection| {
            let row = task_ownerships::table
                .filter(task_ownerships::task_id.eq(id.into_inner()))
                .select(TaskOwnershipRow::as_select())
                .first::<TaskOwnershipRow>(connection)
                .optional()?;
            row.map(row_to_ownership).transpose()
        })
        .await
    }

    async fn find_by_team(&self, team_id: TeamId) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::team_id.eq(team_id.into_inner()))
                .filter(tasks::is_deleted.eq(false))
                .order(tasks::created_at.desc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn find_by_assignee(&self, user_id: UserId) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::assigned_to.eq(user_id.into_inner()))
                .filter(tasks::is_deleted.eq(false))
                .order(tasks::created_at.desc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn apply_transition(
        &self,
        transition: &ConditionalTransition,
    ) -> TaskRepositoryResult<Option<Task>> {
        let transition = transition.clone();
        self.run_blocking(move |connection| {
            let guarded = tasks::table
                .filter(tasks::id.eq(transition.task_id().into_inner()))
                .filter(tasks::status.eq(transition.change().required_status().as_str()))
                .filter(tasks::assigned_to.eq(transition.assignee().into_inner()))
                .filter(tasks::is_deleted.eq(false));
            let target = transition.change().target_status().as_str();

            let row = match transition.change() {
                StatusChange::Start { at } => diesel::update(guarded)
                    .set((
                        tasks::status.eq(target),
                        tasks::started_at.eq(Some(*at)),
                        tasks::updated_at.eq(*at),
                    ))
                    .returning(TaskRow::as_returning())
                    .get_result::<TaskRow>(connection)
                    .optional()?,
                StatusChange::Complete {
                    at,
                    by,
                    late_reason,
                } => {
                    let values = (
                        tasks::status.eq(target),
                        tasks::completed_at.eq(Some(*at)),
                        tasks::completed_by.eq(Some(by.into_inner())),
                        tasks::late_submission_reason
                            .eq(late_reason.as_ref().map(|reason| reason.as_str().to_owned())),
                        tasks::updated_at.eq(*at),
                    );
                    match transition.change().on_time_deadline() {
                        Some(deadline) => diesel::update(guarded.filter(
                            tasks::due_date.is_null().or(tasks::due_date.ge(deadline)),
                        ))
                        .set(values)
                        .returning(TaskRow::as_returning())
                        .get_result::<TaskRow>(connection)
                        .optional()?,
                        None => diesel::update(guarded)
                            .set(values)
                            .returning(TaskRow::as_returning())
                            .get_result::<TaskRow>(connection)
                            .optional()?,
                    }
                }
            };
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn reassign(
        &self,
        id: TaskId,
        reassignment: &Reassignment,
    ) -> TaskRepositoryResult<Option<Task>> {
        let reassignment = *reassignment;
        self.run_blocking(move |connection| {
            let at = reassignment.at();
            let row = diesel::update(
                tasks::table
                    .filter(tasks::id.eq(id.into_inner()))
                    .filter(tasks::is_deleted.eq(false)),
            )
            .set((
                tasks::status.eq(TaskStatus::Assigned.as_str()),
                tasks::assigned_to.eq(reassignment.assignee().into_inner()),
                tasks::assigned_by.eq(reassignment.assigner().into_inner()),
                tasks::assigned_at.eq(at),
                tasks::started_at.eq(None::<DateTime<Utc>>),
                tasks::completed_at.eq(None::<DateTime<Utc>>),
                tasks::completed_by.eq(None::<uuid::Uuid>),
                tasks::late_submission_reason.eq(None::<String>),
                tasks::updated_at.eq(at),
            ))
            .returning(TaskRow::as_returning())
            .get_result::<TaskRow>(connection)
            .optional()
            .map_err(|err| map_write_error(err, id))?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn soft_delete(&self, id: TaskId, at: DateTime<Utc>) -> TaskRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            let updated = diesel::update(
                tasks::table
                    .filter(tasks::id.eq(id.into_inner()))
                    .filter(tasks::is_deleted.eq(false)),
            )
            .set((tasks::is_deleted.eq(true), tasks::updated_at.eq(at)))
            .execute(connection)?;
            Ok(updated > 0)
        })
        .await
    }

    async fn hard_delete(&self, id: TaskId) -> TaskRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx| {
                diesel::delete(
                    task_ownerships::table.filter(task_ownerships::task_id.eq(id.into_inner())),
                )
                .execute(tx)?;
                let deleted =
                    diesel::delete(tasks::table.filter(tasks::id.eq(id.into_inner()))).execute(tx)?;
                Ok(deleted > 0)
            })
        })
        .await
    }

    async fn hard_delete_by_team(&self, team_id: TeamId) -> TaskRepositoryResult<usize> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx| {
                let team_tasks = tasks::table
                    .filter(tasks::team_id.eq(team_id.into_inner()))
                    .select(tasks::id);
                diesel::delete(
                    task_ownerships::table.filter(task_ownerships::task_id.eq_any(team_tasks)),
                )
                .execute(tx)?;
                let deleted =
                    diesel::delete(tasks::table.filter(tasks::team_id.eq(team_id.into_inner())))
                        .execute(tx)?;
                Ok(deleted)
            })
        })
        .await
    }
}

/// Inserts each task row followed by its ownership row.
///
/// Must run inside a transaction so a failure leaves nothing behind.
fn insert_all(
    connection: &mut PgConnection,
    rows: &[(NewTaskRow, TaskOwnershipRow)],
) -> TaskRepositoryResult<()> {
    for (task_row, ownership_row) in rows {
        let task_id = TaskId::from_uuid(task_row.id);
        diesel::insert_into(tasks::table)
            .values(task_row)
            .execute(connection)
            .map_err(|err| map_write_error(err, task_id))?;
        diesel::insert_into(task_ownerships::table)
            .values(ownership_row)
            .execute(connection)
            .map_err(|err| map_write_error(err, task_id))?;
    }
    Ok(())
}

fn map_write_error(err: DieselError, task_id: TaskId) -> TaskRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            TaskRepositoryError::DuplicateTask(task_id)
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, ref info) => {
            TaskRepositoryError::UnknownReference {
                task_id,
                constraint: info.constraint_name().unwrap_or("unknown").to_owned(),
            }
        }
        _ => TaskRepositoryError::persistence(err),
    }
}

fn to_insert_rows(entry: &OwnedTask) -> (NewTaskRow, TaskOwnershipRow) {
    let task = entry.task();
    let ownership = entry.ownership();
    let task_row = NewTaskRow {
        id: task.id().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().map(ToOwned::to_owned),
        status: task.status().as_str().to_owned(),
        assigned_to: task.assigned_to().into_inner(),
        assigned_by: task.assigned_by().into_inner(),
        team_id: task.team_id().into_inner(),
        due_date: task.due_date(),
        created_at: task.created_at(),
        assigned_at: task.assigned_at(),
        updated_at: task.updated_at(),
    };
    let ownership_row = TaskOwnershipRow {
        task_id: ownership.task_id().into_inner(),
        creator_user_id: ownership.creator_user_id().into_inner(),
        creator_role: ownership.creator_role().as_str().to_owned(),
        created_at: ownership.recorded_at(),
    };
    (task_row, ownership_row)
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let title = TaskTitle::new(row.title).map_err(TaskRepositoryError::persistence)?;
    let status = TaskStatus::try_from(row.status.as_str()).map_err(TaskRepositoryError::persistence)?;
    let late_submission_reason = row
        .late_submission_reason
        .map(LateSubmissionReason::new)
        .transpose()
        .map_err(TaskRepositoryError::persistence)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(row.id),
        title,
        description: row.description,
        status,
        assigned_to: UserId::from_uuid(row.assigned_to),
        assigned_by: UserId::from_uuid(row.assigned_by),
        completed_by: row.completed_by.map(UserId::from_uuid),
        team_id: TeamId::from_uuid(row.team_id),
        due_date: row.due_date,
        late_submission_reason,
        created_at: row.created_at,
        assigned_at: row.assigned_at,
        started_at: row.started_at,
        completed_at: row.completed_at,
        updated_at: row.updated_at,
        deleted: row.is_deleted,
    }))
}

fn row_to_ownership(row: TaskOwnershipRow) -> TaskRepositoryResult<TaskOwnership> {
    let role = Role::try_from(row.creator_role.as_str()).map_err(TaskRepositoryError::persistence)?;
    Ok(TaskOwnership::from_persisted(
        TaskId::from_uuid(row.task_id),
        UserId::from_uuid(row.creator_user_id),
        role,
        row.created_at,
    ))
}
