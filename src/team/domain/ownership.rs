//! Team ownership ledger entries.

use super::TeamId;
use crate::identity::domain::{Caller, Role, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable record of who created a team and with which role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamOwnership {
    team_id: TeamId,
    creator_user_id: UserId,
    creator_role: Role,
    recorded_at: DateTime<Utc>,
}

impl TeamOwnership {
    /// Records `creator` as the creator of `team_id`.
    #[must_use]
    pub const fn record(team_id: TeamId, creator: &Caller, recorded_at: DateTime<Utc>) -> Self {
        Self {
            team_id,
            creator_user_id: creator.user_id(),
            creator_role: creator.role(),
            recorded_at,
        }
    }

    /// Reconstructs an ownership record from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        team_id: TeamId,
        creator_user_id: UserId,
        creator_role: Role,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            team_id,
            creator_user_id,
            creator_role,
            recorded_at,
        }
    }

    /// Returns the owned team.
    #[must_use]
    pub const fn team_id(&self) -> TeamId {
        self.team_id
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
