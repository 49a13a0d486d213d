//! Conditional status changes and administrative reassignment.

use super::{LateSubmissionReason, Task, TaskId, TaskStatus};
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};

/// A state-machine edge together with the values it writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusChange {
    /// `assigned` → `in_progress`.
    Start {
        /// Start instant.
        at: DateTime<Utc>,
    },
    /// `in_progress` → `completed`.
    Complete {
        /// Completion instant.
        at: DateTime<Utc>,
        /// Completing user.
        by: UserId,
        /// Reason recorded when the completion is late.
        late_reason: Option<LateSubmissionReason>,
    },
}

impl StatusChange {
    /// Returns the status the task must currently have.
    #[must_use]
    pub const fn required_status(&self) -> TaskStatus {
        match self {
            Self::Start { .. } => TaskStatus::Assigned,
            Self::Complete { .. } => TaskStatus::InProgress,
        }
    }

    /// Returns the status the task has afterwards.
    #[must_use]
    pub const fn target_status(&self) -> TaskStatus {
        match self {
            Self::Start { .. } => TaskStatus::InProgress,
            Self::Complete { .. } => TaskStatus::Completed,
        }
    }

    /// Returns the instant written as the task's `updated_at`.
    #[must_use]
    pub const fn at(&self) -> DateTime<Utc> {
        match self {
            Self::Start { at } | Self::Complete { at, .. } => *at,
        }
    }

    /// Returns the instant the task must not yet be overdue at.
    ///
    /// Only a completion without a late reason carries one: it may only
    /// land on a task whose due date is absent or not before `at`.
    #[must_use]
    pub const fn on_time_deadline(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Complete {
                at,
                late_reason: None,
                ..
            } => Some(*at),
            Self::Start { .. } | Self::Complete { .. } => None,
        }
    }
}

/// A status change that may only be applied when the stored task still
/// matches the expected status and assignee.
///
/// A completion without a late reason is additionally guarded on the task
/// not being overdue at the completion instant.
///
/// Stores must evaluate [`ConditionalTransition::matches`] and apply the
/// change as one atomic step so racing requests yield at most one success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalTransition {
    task_id: TaskId,
    assignee: UserId,
    change: StatusChange,
}

impl ConditionalTransition {
    /// Creates a transition guarded on `assignee` being the current
    /// assignee.
    #[must_use]
    pub const fn new(task_id: TaskId, assignee: UserId, change: StatusChange) -> Self {
        Self {
            task_id,
            assignee,
            change,
        }
    }

    /// Returns the targeted task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the user who must be the current assignee.
    #[must_use]
    pub const fn assignee(&self) -> UserId {
        self.assignee
    }

    /// Returns the change to apply.
    #[must_use]
    pub const fn change(&self) -> &StatusChange {
        &self.change
    }

    /// Returns whether `task` satisfies the guard predicate.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        task.id() == self.task_id
            && !task.is_deleted()
            && task.status() == self.change.required_status()
            && task.assigned_to() == self.assignee
            && self
                .change
                .on_time_deadline()
                .is_none_or(|at| !task.is_late_at(at))
    }
}

/// Administrative override handing a task to a new assignee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reassignment {
    assignee: UserId,
    assigner: UserId,
    at: DateTime<Utc>,
}

impl Reassignment {
    /// Creates a reassignment.
    #[must_use]
    pub const fn new(assignee: UserId, assigner: UserId, at: DateTime<Utc>) -> Self {
        Self {
            assignee,
            assigner,
            at,
        }
    }

    /// Returns the new assignee.
    #[must_use]
    pub const fn assignee(&self) -> UserId {
        self.assignee
    }

    /// Returns the user making the assignment.
    #[must_use]
    pub const fn assigner(&self) -> UserId {
        self.assigner
    }

    /// Returns the assignment instant.
    #[must_use]
    pub const fn at(&self) -> DateTime<Utc> {
        self.at
    }
}
