//! Task lifecycle management for the tracker.
//!
//! This module owns the task state machine (`assigned` → `in_progress` →
//! `completed`), the conditional transitions that make concurrent requests
//! safe, the per-task ownership ledger, late-submission tracking, bulk
//! assignment, and the audit timeline projection. It follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
