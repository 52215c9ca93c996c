//! Apply pending schema migrations to the configured PostgreSQL database.

use std::env;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use lister::outbound::persistence::run_migrations;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

/// `migrate` command arguments.
#[derive(Debug, Parser)]
#[command(name = "migrate", about = "Apply pending database migrations", version)]
struct CliArgs {
    /// Database connection URL. Falls back to `LISTER_DATABASE_URL`, then
    /// `DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = CliArgs::parse();
    let url = args
        .database_url
        .or_else(|| env::var("LISTER_DATABASE_URL").ok())
        .or_else(|| env::var("DATABASE_URL").ok())
        .ok_or_else(|| eyre!("no database URL given; pass --database-url or set LISTER_DATABASE_URL"))?;

    let applied = run_migrations(&url).wrap_err("failed to migrate database")?;
    if applied.is_empty() {
        info!("database already up to date");
    }
    for version in applied {
        println!("applied {version}");
    }
    Ok(())
}
