//! Task ownership ledger entries.

use super::{Task, TaskId};
use crate::identity::domain::{Caller, Role, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable record of who created a task and with which role.
///
/// The record is frozen at creation: later role changes of the creator do
/// not affect it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOwnership {
    task_id: TaskId,
    creator_user_id: UserId,
    creator_role: Role,
    recorded_at: DateTime<Utc>,
}

impl TaskOwnership {
    /// Records `creator` as the creator of `task`.
    #[must_use]
    pub const fn record(task: &Task, creator: &Caller) -> Self {
        Self {
            task_id: task.id(),
            creator_user_id: creator.user_id(),
            creator_role: creator.role(),
            recorded_at: task.created_at(),
        }
    }

    /// Reconstructs an ownership record from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        task_id: TaskId,
        creator_user_id: UserId,
        creator_role: Role,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            task_id,
            creator_user_id,
            creator_role,
            recorded_at,
        }
    }

    /// Returns the owned task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the creating user.
    #[must_use]
    pub const fn creator_user_id(&self) -> UserId {
        self.creator_user_id
    }

    /// Returns the creator's role at creation time.
    #[must_use]
    pub const fn creator_role(&self) -> Role {
        self.creator_role
    }

    /// Returns when the record was written.
    #[must_use]
    pub const fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

/// A new task paired with the ownership record that must be written in the
/// same transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedTask {
    task: Task,
    ownership: TaskOwnership,
}

impl OwnedTask {
    /// Pairs `task` with an ownership record naming `creator`.
    #[must_use]
    pub fn new(task: Task, creator: &Caller) -> Self {
        let ownership = TaskOwnership::record(&task, creator);
        Self { task, ownership }
    }

    /// Returns the task.
    #[must_use]
    pub const fn task(&self) -> &Task {
        &self.task
    }

    /// Returns the ownership record.
    #[must_use]
    pub const fn ownership(&self) -> &TaskOwnership {
        &self.ownership
    }

    /// Consumes the pair, returning the task.
    #[must_use]
    pub fn into_task(self) -> Task {
        self.task
    }
}
