//! In-memory adapters for team tests.

mod team;

pub use team::InMemoryTeamRepository;
