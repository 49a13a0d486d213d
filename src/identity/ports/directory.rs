//! Directory port for resolving user profiles.

use crate::identity::domain::{UserId, UserProfile};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Result type for directory lookups.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Read-only access to user profiles.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Resolves profiles for the given identifiers.
    ///
    /// Unknown identifiers are omitted from the returned map rather than
    /// reported as errors.
    async fn find_profiles(&self, ids: &[UserId]) -> DirectoryResult<HashMap<UserId, UserProfile>>;
}

/// Errors returned by directory implementations.
#[derive(Debug, Clone, Error)]
pub enum DirectoryError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl DirectoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
