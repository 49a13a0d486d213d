//! Shared `PostgreSQL` plumbing for the Diesel adapters.
//!
//! Provides the pool type, the blocking-offload helpers used by every
//! repository, and the schema bootstrap used by the `teamtask` binary and the
//! integration tests.

use diesel::PgConnection;
use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError, PooledConnection};

/// `PostgreSQL` connection pool type shared by all adapters.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Pooled connection type for internal use.
pub(crate) type PooledConn = PooledConnection<ConnectionManager<PgConnection>>;

/// Schema for users, teams, tasks, and both ownership ledgers.
pub const SCHEMA_SQL: &str =
    include_str!("../migrations/2026-10-01-000000_create_tracker_schema/up.sql");

/// Applies [`SCHEMA_SQL`] to the given connection.
///
/// Every statement is idempotent, so running it against an already migrated
/// database is a no-op.
///
/// # Errors
///
/// Returns the Diesel error raised by the first failing statement.
pub fn apply_schema(connection: &mut PgConnection) -> diesel::QueryResult<()> {
    connection.batch_execute(SCHEMA_SQL)
}

/// Runs a blocking task and maps join errors into the caller's error type.
///
/// Wraps the closure in [`tokio::task::spawn_blocking`] so synchronous Diesel
/// work never stalls the async executor's worker threads.
pub(crate) async fn run_blocking_with<F, T, E, M>(f: F, map_err: M) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
    M: FnOnce(tokio::task::JoinError) -> E,
{
    tokio::task::spawn_blocking(f).await.map_err(map_err)?
}

/// Obtains a connection from the pool with a caller-provided error mapper.
pub(crate) fn get_conn_with<E, M>(pool: &PgPool, map_err: M) -> Result<PooledConn, E>
where
    M: FnOnce(PoolError) -> E,
{
    pool.get().map_err(map_err)
}
