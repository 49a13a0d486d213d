//! Teamtask: multi-tenant task tracking with ownership-based authorization.
//!
//! This crate provides the task lifecycle engine for a team task tracker:
//! conditional status transitions, late-submission auditing, bulk
//! assignment, and an ownership ledger that decides who may delete tasks and
//! teams.
//!
//! # Architecture
//!
//! Teamtask follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, in-memory)
//!
//! # Modules
//!
//! - [`identity`]: User identifiers, roles, and the read-only user directory
//! - [`team`]: Team registry and team ownership records
//! - [`task`]: Task lifecycle, bulk assignment, and audit composition
//! - [`authorization`]: Ownership-based delete authorization
//! - [`tracker`]: Facade exposing every operation with a closed error type

pub mod authorization;
pub mod config;
pub mod error;
pub mod identity;
pub mod persistence;
pub mod task;
pub mod team;
pub mod telemetry;
pub mod tracker;

pub use error::{ResourceKind, TrackerError, TrackerResult};
pub use tracker::TaskTracker;
