//! Read-side audit projection of a task.

use super::{Task, TaskOwnership};
use crate::identity::domain::{UserId, UserProfile};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// Kind of timeline entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineEvent {
    /// The task row was created.
    Created,
    /// The task was (most recently) assigned.
    Assigned,
    /// The assignee started work.
    Started,
    /// The task was completed.
    Completed,
}

/// One human-readable step in a task's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    event: TimelineEvent,
    at: DateTime<Utc>,
    actor: Option<UserId>,
    description: String,
}

impl TimelineEntry {
    /// Returns the entry kind.
    #[must_use]
    pub const fn event(&self) -> TimelineEvent {
        self.event
    }

    /// Returns when the step happened.
    #[must_use]
    pub const fn at(&self) -> DateTime<Utc> {
        self.at
    }

    /// Returns the acting user, when known.
    #[must_use]
    pub const fn actor(&self) -> Option<UserId> {
        self.actor
    }

    /// Returns the rendered description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// A task joined with the profiles of the users who acted on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskWithAudit {
    task: Task,
    assignee: Option<UserProfile>,
    assigner: Option<UserProfile>,
    completer: Option<UserProfile>,
    is_late_submission: bool,
    timeline: Vec<TimelineEntry>,
}

impl TaskWithAudit {
    /// Builds the projection from a task, its ownership record (if any), and
    /// whatever profiles could be resolved.
    ///
    /// Absent timestamps omit their timeline entry; unresolved users are
    /// rendered by identifier.
    #[must_use]
    pub fn compose(
        task: Task,
        ownership: Option<&TaskOwnership>,
        profiles: &HashMap<UserId, UserProfile>,
    ) -> Self {
        let label = |id: UserId| {
            profiles
                .get(&id)
                .map_or_else(|| id.to_string(), |profile| profile.display_name().to_owned())
        };

        let creator = ownership.map_or(task.assigned_by(), TaskOwnership::creator_user_id);
        let mut timeline = vec![
            TimelineEntry {
                event: TimelineEvent::Created,
                at: task.created_at(),
                actor: Some(creator),
                description: format!("Created by {}", label(creator)),
            },
            TimelineEntry {
                event: TimelineEvent::Assigned,
                at: task.assigned_at(),
                actor: Some(task.assigned_by()),
                description: format!(
                    "Assigned to {} by {}",
                    label(task.assigned_to()),
                    label(task.assigned_by())
                ),
            },
        ];

        if let Some(started_at) = task.started_at() {
            timeline.push(TimelineEntry {
                event: TimelineEvent::Started,
                at: started_at,
                actor: Some(task.assigned_to()),
                description: format!("Started by {}", label(task.assigned_to())),
            });
        }

        let is_late_submission = task.is_late_submission();
        if let Some(completed_at) = task.completed_at() {
            let completer = task
                .completed_by()
                .map_or_else(|| "an unknown user".to_owned(), label);
            let description = match (is_late_submission, task.late_submission_reason()) {
                (true, Some(reason)) => {
                    format!("Completed by {completer} after the due date: {reason}")
                }
                (true, None) => format!("Completed by {completer} after the due date"),
                (false, _) => format!("Completed by {completer}"),
            };
            timeline.push(TimelineEntry {
                event: TimelineEvent::Completed,
                at: completed_at,
                actor: task.completed_by(),
                description,
            });
        }
        timeline.sort_by_key(TimelineEntry::at);

        let lookup = |id: Option<UserId>| id.and_then(|user| profiles.get(&user).cloned());
        Self {
            assignee: lookup(Some(task.assigned_to())),
            assigner: lookup(Some(task.assigned_by())),
            completer: lookup(task.completed_by()),
            is_late_submission,
            timeline,
            task,
        }
    }

    /// Returns the underlying task.
    #[must_use]
    pub const fn task(&self) -> &Task {
        &self.task
    }

    /// Returns the assignee's profile, if resolved.
    #[must_use]
    pub const fn assignee(&self) -> Option<&UserProfile> {
        self.assignee.as_ref()
    }

    /// Returns the assigner's profile, if resolved.
    #[must_use]
    pub const fn assigner(&self) -> Option<&UserProfile> {
        self.assigner.as_ref()
    }

    /// Returns the completer's profile, if completed and resolved.
    #[must_use]
    pub const fn completer(&self) -> Option<&UserProfile> {
        self.completer.as_ref()
    }

    /// Returns whether the task was completed after its due date.
    #[must_use]
    pub const fn is_late_submission(&self) -> bool {
        self.is_late_submission
    }

    /// Returns the chronological timeline.
    #[must_use]
    pub fn timeline(&self) -> &[TimelineEntry] {
        &self.timeline
    }
}
