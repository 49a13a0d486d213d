//! Adapter implementations of the [`TaskRepository`] port.
//!
//! - [`memory::InMemoryTaskRepository`]: thread-safe in-memory storage for
//!   tests
//! - [`postgres::PostgresTaskRepository`]: Diesel-backed `PostgreSQL`
//!   persistence
//!
//! [`TaskRepository`]: crate::task::ports::TaskRepository

pub mod memory;
pub mod postgres;
