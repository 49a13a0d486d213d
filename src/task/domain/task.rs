//! Task aggregate root and related task lifecycle types.

use super::{
    LateSubmissionReason, ParseTaskStatusError, Reassignment, StatusChange, TaskDomainError,
    TaskId, TaskTitle,
};
use crate::identity::domain::UserId;
use crate::team::domain::TeamId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task has been assigned but work has not started.
    Assigned,
    /// The assignee is working on the task.
    InProgress,
    /// The assignee has completed the task.
    Completed,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Assigned => "assigned",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// Returns whether the state machine has an edge from `self` to `next`.
    ///
    /// Reassignment is an administrative override and is not an
    /// edge: it resets any status back to [`TaskStatus::Assigned`].
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Assigned, Self::InProgress) | (Self::InProgress, Self::Completed)
        )
    }

    /// Returns `true` when no transition leaves this status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "assigned" => Ok(Self::Assigned),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameter object describing a task about to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    /// Validated title.
    pub title: TaskTitle,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Team the task belongs to.
    pub team_id: TeamId,
    /// User who will work on the task.
    pub assigned_to: UserId,
    /// User who assigned the task.
    pub assigned_by: UserId,
    /// Optional deadline.
    pub due_date: Option<DateTime<Utc>>,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    description: Option<String>,
    status: TaskStatus,
    assigned_to: UserId,
    assigned_by: UserId,
    completed_by: Option<UserId>,
    team_id: TeamId,
    due_date: Option<DateTime<Utc>>,
    late_submission_reason: Option<LateSubmissionReason>,
    created_at: DateTime<Utc>,
    assigned_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    updated_at: DateTime<Utc>,
    deleted: bool,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description.
    pub description: Option<String>,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted assignee.
    pub assigned_to: UserId,
    /// Persisted assigner.
    pub assigned_by: UserId,
    /// Persisted completer, if completed.
    pub completed_by: Option<UserId>,
    /// Persisted team.
    pub team_id: TeamId,
    /// Persisted deadline.
    pub due_date: Option<DateTime<Utc>>,
    /// Persisted late-submission reason.
    pub late_submission_reason: Option<LateSubmissionReason>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted assignment timestamp.
    pub assigned_at: DateTime<Utc>,
    /// Persisted start timestamp.
    pub started_at: Option<DateTime<Utc>>,
    /// Persisted completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Persisted soft-delete flag.
    pub deleted: bool,
}

impl Task {
    /// Creates a new task in [`TaskStatus::Assigned`].
    #[must_use]
    pub fn new(draft: TaskDraft, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            title: draft.title,
            description: draft.description,
            status: TaskStatus::Assigned,
            assigned_to: draft.assigned_to,
            assigned_by: draft.assigned_by,
            completed_by: None,
            team_id: draft.team_id,
            due_date: draft.due_date,
            late_submission_reason: None,
            created_at: timestamp,
            assigned_at: timestamp,
            started_at: None,
            completed_at: None,
            updated_at: timestamp,
            deleted: false,
        }
    }

    /// Creates an independent copy of this task's definition for another
    /// assignee.
    ///
    /// The copy shares title, description, team, and due date, but has its
    /// own identifier and starts its own lifecycle in
    /// [`TaskStatus::Assigned`].
    #[must_use]
    pub fn duplicate_for(&self, assignee: UserId, assigner: UserId, clock: &impl Clock) -> Self {
        Self::new(
            TaskDraft {
                title: self.title.clone(),
                description: self.description.clone(),
                team_id: self.team_id,
                assigned_to: assignee,
                assigned_by: assigner,
                due_date: self.due_date,
            },
            clock,
        )
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            status: data.status,
            assigned_to: data.assigned_to,
            assigned_by: data.assigned_by,
            completed_by: data.completed_by,
            team_id: data.team_id,
            due_date: data.due_date,
            late_submission_reason: data.late_submission_reason,
            created_at: data.created_at,
            assigned_at: data.assigned_at,
            started_at: data.started_at,
            completed_at: data.completed_at,
            updated_at: data.updated_at,
            deleted: data.deleted,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the current assignee.
    #[must_use]
    pub const fn assigned_to(&self) -> UserId {
        self.assigned_to
    }

    /// Returns the user who made the current assignment.
    #[must_use]
    pub const fn assigned_by(&self) -> UserId {
        self.assigned_by
    }

    /// Returns the user who completed the task, if completed.
    #[must_use]
    pub const fn completed_by(&self) -> Option<UserId> {
        self.completed_by
    }

    /// Returns the owning team.
    #[must_use]
    pub const fn team_id(&self) -> TeamId {
        self.team_id
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    /// Returns the late-submission reason, if the task was completed late.
    #[must_use]
    pub const fn late_submission_reason(&self) -> Option<&LateSubmissionReason> {
        self.late_submission_reason.as_ref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest assignment timestamp.
    #[must_use]
    pub const fn assigned_at(&self) -> DateTime<Utc> {
        self.assigned_at
    }

    /// Returns when work started, if it has.
    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Returns when the task was completed, if it has been.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns `true` when the task has been soft-deleted.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Returns whether completing at `at` would be a late submission.
    ///
    /// Tasks without a due date are never late.
    #[must_use]
    pub fn is_late_at(&self, at: DateTime<Utc>) -> bool {
        self.due_date.is_some_and(|due| at > due)
    }

    /// Returns whether the task was completed after its due date.
    #[must_use]
    pub fn is_late_submission(&self) -> bool {
        self.completed_at.is_some_and(|completed| self.is_late_at(completed))
    }

    /// Applies a state-machine transition.
    ///
    /// A late-submission reason is only retained when the completion instant
    /// is past the due date.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStatusTransition`] when the current
    /// status has no edge to the change's target status.
    pub fn apply_change(&mut self, change: &StatusChange) -> Result<(), TaskDomainError> {
        let target = change.target_status();
        if !self.status.can_transition_to(target) {
            return Err(TaskDomainError::InvalidStatusTransition {
                task_id: self.id,
                from: self.status,
                to: target,
            });
        }

        match change {
            StatusChange::Start { at } => {
                self.started_at = Some(*at);
            }
            StatusChange::Complete {
                at,
                by,
                late_reason,
            } => {
                let is_late = self.is_late_at(*at);
                self.completed_at = Some(*at);
                self.completed_by = Some(*by);
                self.late_submission_reason = late_reason.clone().filter(|_| is_late);
            }
        }
        self.status = target;
        self.updated_at = change.at();
        Ok(())
    }

    /// Hands the task to a new assignee, resetting it to
    /// [`TaskStatus::Assigned`] whatever its current status.
    ///
    /// Start and completion fields are cleared so a reassigned task carries
    /// no trace of the previous assignee's progress.
    pub fn reassign(&mut self, reassignment: &Reassignment) {
        self.status = TaskStatus::Assigned;
        self.assigned_to = reassignment.assignee();
        self.assigned_by = reassignment.assigner();
        self.assigned_at = reassignment.at();
        self.started_at = None;
        self.completed_at = None;
        self.completed_by = None;
        self.late_submission_reason = None;
        self.updated_at = reassignment.at();
    }

    /// Sets the soft-delete flag.
    pub fn mark_deleted(&mut self, at: DateTime<Utc>) {
        self.deleted = true;
        self.updated_at = at;
    }
}
