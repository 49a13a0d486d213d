//! Operational entry point for the tracker database.
//!
//! ```text
//! teamtask migrate   # create tables and indexes
//! teamtask check     # verify that the database is reachable
//! ```
//!
//! Configuration comes from the environment (or a `.env` file); see
//! [`teamtask::config::TrackerConfig`].

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use diesel::connection::SimpleConnection;
use teamtask::config::TrackerConfig;
use teamtask::persistence::apply_schema;
use teamtask::telemetry::init_tracing;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "teamtask", version, about = "Team task tracker database operations")]
struct Cli {
    /// Log filter directive, overriding `TEAMTASK_LOG`.
    #[arg(long)]
    log_filter: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply the tracker schema. Safe to repeat.
    Migrate,
    /// Open a pooled connection and run a trivial query.
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = TrackerConfig::from_env().context("failed to load configuration")?;
    init_tracing(cli.log_filter.as_deref().unwrap_or(config.log_filter()))?;

    let pool = config
        .build_pool()
        .context("failed to connect to the database")?;
    let mut connection = pool
        .get()
        .context("failed to check out a database connection")?;

    match cli.command {
        Command::Migrate => {
            apply_schema(&mut connection).context("failed to apply the tracker schema")?;
            info!("tracker schema applied");
        }
        Command::Check => {
            connection
                .batch_execute("SELECT 1")
                .context("database connectivity check failed")?;
            info!(pool_size = config.pool_size(), "database reachable");
        }
    }
    Ok(())
}
