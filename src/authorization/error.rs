//! Errors raised by the authorization gate.

use super::Operation;
use crate::task::{domain::TaskId, ports::TaskRepositoryError};
use crate::team::{domain::TeamId, ports::TeamRepositoryError};
use thiserror::Error;

/// Authorization gate errors.
#[derive(Debug, Error)]
pub enum AuthorizationError {
    /// The caller may not perform the operation.
    #[error("not permitted to {0}")]
    Denied(Operation),
    /// The target task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
    /// The target team does not exist.
    #[error("team not found: {0}")]
    TeamNotFound(TeamId),
    /// Task evidence lookup failed.
    #[error(transparent)]
    TaskRepository(#[from] TaskRepositoryError),
    /// Team evidence lookup failed.
    #[error(transparent)]
    TeamRepository(#[from] TeamRepositoryError),
}

/// Result type for authorization gate operations.
pub type AuthorizationResult<T> = Result<T, AuthorizationError>;
