//! `PostgreSQL` adapter for user profile lookups.

mod directory;
mod schema;

pub use directory::PostgresUserDirectory;
