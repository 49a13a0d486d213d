//! Domain model for teams and their ownership records.

mod error;
mod ids;
mod ownership;
mod team;

pub use error::TeamDomainError;
pub use ids::{TeamId, TeamName};
pub use ownership::TeamOwnership;
pub use team::{PersistedTeamData, Team};
