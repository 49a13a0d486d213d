//! Closed error taxonomy returned by the [`TaskTracker`](crate::TaskTracker)
//! facade.
//!
//! Every layered error (domain, repository, service, authorization) folds
//! into one of four variants. Callers see a stable message per variant;
//! storage sources stay attached for diagnostics but are never rendered.

use crate::authorization::{AuthorizationError, Operation};
use crate::identity::ports::DirectoryError;
use crate::task::{ports::TaskRepositoryError, services::TaskLifecycleError};
use crate::team::{ports::TeamRepositoryError, services::TeamServiceError};
use serde_json::{Value, json};
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Message returned for every refused conditional transition.
pub const TRANSITION_REFUSED_MESSAGE: &str =
    "task cannot be transitioned: it is not in the required status or not assigned to you";

/// Result type for facade operations.
pub type TrackerResult<T> = Result<T, TrackerError>;

/// Kind of resource named in a [`TrackerError::NotFound`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// A task.
    Task,
    /// A team.
    Team,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Task => "task",
            Self::Team => "team",
        })
    }
}

/// Errors returned by the tracker facade.
#[derive(Debug, Clone, Error)]
pub enum TrackerError {
    /// The request is malformed or the resource is not in a state that
    /// permits it.
    #[error("{0}")]
    Validation(String),

    /// The addressed resource does not exist.
    #[error("{resource} not found: {id}")]
    NotFound {
        /// Resource kind.
        resource: ResourceKind,
        /// Resource identifier.
        id: Uuid,
    },

    /// The caller may not perform the operation.
    #[error("not permitted to {0}")]
    Authorization(Operation),

    /// The store failed.
    #[error("storage failure")]
    Storage(#[source] Arc<dyn Error + Send + Sync>),
}

impl TrackerError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Authorization(_) => 403,
            Self::NotFound { .. } => 404,
            Self::Storage(_) => 500,
        }
    }

    /// Returns the message safe to show to the caller.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::NotFound { resource, .. } => format!("{resource} not found"),
            Self::Authorization(_) => "you are not permitted to perform this action".to_owned(),
            Self::Storage(_) => "storage failure".to_owned(),
        }
    }

    /// Renders the `{ "status": "error", "message": … }` response body.
    #[must_use]
    pub fn to_body(&self) -> Value {
        json!({
            "status": "error",
            "message": self.public_message(),
        })
    }

    fn storage(err: impl Error + Send + Sync + 'static) -> Self {
        Self::Storage(Arc::new(err))
    }
}

impl From<TaskRepositoryError> for TrackerError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::UnknownReference { .. } => {
                Self::Validation("task references an unknown team or user".to_owned())
            }
            TaskRepositoryError::DuplicateTask(_) | TaskRepositoryError::Persistence(_) => {
                Self::storage(err)
            }
        }
    }
}

impl From<TeamRepositoryError> for TrackerError {
    fn from(err: TeamRepositoryError) -> Self {
        match err {
            TeamRepositoryError::UnknownOwner(_) => {
                Self::Validation("team references an unknown owner".to_owned())
            }
            TeamRepositoryError::DuplicateTeam(_) | TeamRepositoryError::Persistence(_) => {
                Self::storage(err)
            }
        }
    }
}

impl From<DirectoryError> for TrackerError {
    fn from(err: DirectoryError) -> Self {
        Self::storage(err)
    }
}

impl From<TaskLifecycleError> for TrackerError {
    fn from(err: TaskLifecycleError) -> Self {
        match err {
            TaskLifecycleError::Domain(domain) => Self::Validation(domain.to_string()),
            TaskLifecycleError::Repository(repository) => repository.into(),
            TaskLifecycleError::Directory(directory) => directory.into(),
            TaskLifecycleError::NotFound(id) => Self::NotFound {
                resource: ResourceKind::Task,
                id: id.into_inner(),
            },
            TaskLifecycleError::TransitionRefused(_) => {
                Self::Validation(TRANSITION_REFUSED_MESSAGE.to_owned())
            }
            TaskLifecycleError::NoAssignees => Self::Validation(err.to_string()),
        }
    }
}

impl From<TeamServiceError> for TrackerError {
    fn from(err: TeamServiceError) -> Self {
        match err {
            TeamServiceError::Domain(domain) => Self::Validation(domain.to_string()),
            TeamServiceError::Repository(repository) => repository.into(),
            TeamServiceError::NotFound(id) => Self::NotFound {
                resource: ResourceKind::Team,
                id: id.into_inner(),
            },
        }
    }
}

impl From<AuthorizationError> for TrackerError {
    fn from(err: AuthorizationError) -> Self {
        match err {
            AuthorizationError::Denied(operation) => Self::Authorization(operation),
            AuthorizationError::TaskNotFound(id) => Self::NotFound {
                resource: ResourceKind::Task,
                id: id.into_inner(),
            },
            AuthorizationError::TeamNotFound(id) => Self::NotFound {
                resource: ResourceKind::Team,
                id: id.into_inner(),
            },
            AuthorizationError::TaskRepository(repository) => repository.into(),
            AuthorizationError::TeamRepository(repository) => repository.into(),
        }
    }
}
