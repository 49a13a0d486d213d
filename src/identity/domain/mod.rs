//! Domain model for callers and user profiles.

mod caller;
mod error;
mod ids;
mod profile;
mod role;

pub use caller::Caller;
pub use error::ParseRoleError;
pub use ids::UserId;
pub use profile::UserProfile;
pub use role::Role;
