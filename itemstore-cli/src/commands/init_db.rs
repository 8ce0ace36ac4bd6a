//! Schema initialization command

use anyhow::{Context, Result};
use clap::Parser;

use itemstore_server::db::{create_pool, ensure_schema};

/// Arguments for the init-db command
#[derive(Parser, Debug)]
pub struct InitDbArgs {
    /// Postgres connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,
}

/// Create the `items` and `files` tables if missing
pub async fn run_init_db(args: InitDbArgs) -> Result<()> {
    let pool = create_pool(&args.database_url)
        .await
        .context("Failed to create database pool")?;

    ensure_schema(&pool)
        .await
        .context("Failed to create tables")?;
    pool.close().await;

    tracing::info!("Schema ready");
    Ok(())
}
