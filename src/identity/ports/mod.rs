//! Port contracts for identity lookups.

pub mod directory;

pub use directory::{DirectoryError, DirectoryResult, UserDirectory};
