//! Team registry for the tracker.
//!
//! Teams scope tasks. Each team carries an immutable ownership record naming
//! the user (and that user's role) who created it; only that user may delete
//! the team later, whatever roles change in the meantime.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
