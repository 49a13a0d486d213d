//! Pure authorization rules.

use crate::identity::domain::{Caller, Role, UserId};
use crate::task::domain::{Task, TaskOwnership};
use crate::team::domain::{Team, TeamOwnership};
use std::fmt;

/// Destructive operation subject to ownership checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Soft or hard deletion of a task.
    DeleteTask,
    /// Deletion of a team.
    DeleteTeam,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::DeleteTask => "delete task",
            Self::DeleteTeam => "delete team",
        })
    }
}

/// Who created the target resource, as far as the store can tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnershipEvidence {
    /// An ownership ledger entry exists.
    Recorded {
        /// Creating user.
        creator: UserId,
        /// Creator role frozen at creation time.
        creator_role: Role,
    },
    /// No ledger entry; the resource's own owner column is used instead.
    Legacy {
        /// Team `owner_id` or task `assigned_by`.
        owner: UserId,
    },
}

impl OwnershipEvidence {
    /// Builds task evidence, falling back to `assigned_by` without a ledger
    /// entry.
    #[must_use]
    pub fn for_task(task: &Task, ownership: Option<&TaskOwnership>) -> Self {
        ownership.map_or(
            Self::Legacy {
                owner: task.assigned_by(),
            },
            |record| Self::Recorded {
                creator: record.creator_user_id(),
                creator_role: record.creator_role(),
            },
        )
    }

    /// Builds team evidence, falling back to `owner_id` without a ledger
    /// entry.
    #[must_use]
    pub fn for_team(team: &Team, ownership: Option<&TeamOwnership>) -> Self {
        ownership.map_or(
            Self::Legacy {
                owner: team.owner_id(),
            },
            |record| Self::Recorded {
                creator: record.creator_user_id(),
                creator_role: record.creator_role(),
            },
        )
    }
}

/// Why a request was denied. Only ever logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DenialReason {
    /// The caller is not an administrator.
    NotAdmin,
    /// The caller did not create the resource.
    NotCreator,
    /// The caller created the resource but was not an administrator then.
    CreatorNotAdmin,
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotAdmin => "caller is not an administrator",
            Self::NotCreator => "caller did not create the resource",
            Self::CreatorNotAdmin => "resource was not created with the administrator role",
        })
    }
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The operation may proceed.
    Allow,
    /// The operation must be rejected.
    Deny(DenialReason),
}

impl Decision {
    /// Returns `true` for [`Decision::Allow`].
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Decides what can be decided from the caller alone.
///
/// Returns `Some` when no evidence lookup is needed: task deletion by a
/// non-administrator is always denied.
#[must_use]
pub const fn precheck(operation: Operation, caller: &Caller) -> Option<Decision> {
    match operation {
        Operation::DeleteTask if !caller.role().is_admin() => {
            Some(Decision::Deny(DenialReason::NotAdmin))
        }
        Operation::DeleteTask | Operation::DeleteTeam => None,
    }
}

/// Decides whether `caller` may perform `operation` on a resource with the
/// given ownership evidence.
#[must_use]
pub fn authorize(operation: Operation, caller: &Caller, evidence: &OwnershipEvidence) -> Decision {
    if let Some(decision) = precheck(operation, caller) {
        return decision;
    }
    let is_caller = |user: UserId| user == caller.user_id();
    match (operation, *evidence) {
        (Operation::DeleteTask, OwnershipEvidence::Recorded { creator, creator_role }) => {
            if !is_caller(creator) {
                Decision::Deny(DenialReason::NotCreator)
            } else if !creator_role.is_admin() {
                Decision::Deny(DenialReason::CreatorNotAdmin)
            } else {
                Decision::Allow
            }
        }
        (Operation::DeleteTeam, OwnershipEvidence::Recorded { creator: owner, .. })
        | (_, OwnershipEvidence::Legacy { owner }) => {
            if is_caller(owner) {
                Decision::Allow
            } else {
                Decision::Deny(DenialReason::NotCreator)
            }
        }
    }
}
