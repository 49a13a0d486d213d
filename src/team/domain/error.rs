//! Error types for team domain validation.

use thiserror::Error;

/// Errors returned while constructing team values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TeamDomainError {
    /// The team name is empty after trimming.
    #[error("team name must not be empty")]
    EmptyTeamName,

    /// The team name exceeds the persisted column width.
    #[error("team name exceeds {max} characters")]
    TeamNameTooLong {
        /// Maximum number of characters accepted.
        max: usize,
    },
}
