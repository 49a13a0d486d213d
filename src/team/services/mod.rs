//! Application services for team management.

mod registry;

pub use registry::{CreateTeamRequest, TeamService, TeamServiceError, TeamServiceResult};
