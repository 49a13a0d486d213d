//! Error types for identity parsing.

use thiserror::Error;

/// Error returned while parsing roles from tokens or persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);
