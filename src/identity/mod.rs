//! Identity primitives shared by every tracker module.
//!
//! Users, their credentials, and their roles are owned by the authentication
//! collaborator. This module only models what the tracker needs from them:
//! stable identifiers, the caller's role, and a read-only directory used to
//! render audit timelines.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]

pub mod adapters;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod tests;
