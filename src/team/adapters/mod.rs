//! Adapter implementations of the [`TeamRepository`] port.
//!
//! [`TeamRepository`]: crate::team::ports::TeamRepository

pub mod memory;
pub mod postgres;
