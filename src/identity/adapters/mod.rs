//! Adapter implementations of the [`UserDirectory`] port.
//!
//! [`UserDirectory`]: crate::identity::ports::UserDirectory

pub mod memory;
pub mod postgres;
