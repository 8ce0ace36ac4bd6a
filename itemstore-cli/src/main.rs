//! itemstore CLI - runs the item/file REST service
//!
//! - `serve`: start the HTTP server
//! - `init-db`: create the `items` and `files` tables and exit
//!
//! Every option can also come from the environment (or a `.env` file in the
//! working directory); flags win over the environment.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "itemstore",
    author,
    version,
    about = "REST CRUD service for key-value items and binary files",
    long_about = "Serve items from Postgres and files from Postgres, an S3-compatible bucket, \
                  or memory, selected once at startup."
)]
struct Cli {
    /// Debug logging (default filter `debug` unless RUST_LOG is set)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server
    Serve(commands::serve::ServeArgs),

    /// Create the database tables if they do not exist
    InitDb(commands::init_db::InitDbArgs),
}

/// A missing `.env` is fine; a present but unreadable or malformed one is reported.
fn env_file_problem(result: Result<PathBuf, dotenvy::Error>) -> Option<dotenvy::Error> {
    match result {
        Ok(_) => None,
        Err(e) if e.not_found() => None,
        Err(e) => Some(e),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Loaded before parsing so clap's env fallbacks see it
    let env_problem = env_file_problem(dotenvy::dotenv());

    let cli = Cli::parse();
    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug })?;
    if let Some(e) = env_problem {
        tracing::warn!("ignoring .env file: {}", e);
    }

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::InitDb(args) => commands::run_init_db(args).await?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn missing_env_file_is_silent() {
        let missing = dotenvy::Error::Io(std::io::Error::from(std::io::ErrorKind::NotFound));
        assert!(env_file_problem(Err(missing)).is_none());
        assert!(env_file_problem(Ok(PathBuf::from(".env"))).is_none());
    }

    #[test]
    fn malformed_env_file_is_reported() {
        let parse = dotenvy::Error::LineParse("NOT VALID=\"".into(), 4);
        assert!(env_file_problem(Err(parse)).is_some());

        let denied = dotenvy::Error::Io(std::io::Error::from(std::io::ErrorKind::PermissionDenied));
        assert!(env_file_problem(Err(denied)).is_some());
    }

    #[test]
    fn serve_defaults() {
        let cli = Cli::try_parse_from(["itemstore", "serve"]).unwrap();
        let Commands::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.file_store, commands::serve::FileStoreArg::Auto);
        assert_eq!(args.connection_policy, commands::serve::PolicyArg::Shared);
    }

    #[test]
    fn serve_flags_parse() {
        let cli = Cli::try_parse_from([
            "itemstore",
            "--debug",
            "serve",
            "--port",
            "4000",
            "--connection-policy",
            "per-request",
            "--file-store",
            "memory",
        ])
        .unwrap();
        assert!(cli.debug);
        let Commands::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.port, 4000);
        assert_eq!(
            args.connection_policy,
            commands::serve::PolicyArg::PerRequest
        );
        assert_eq!(args.file_store, commands::serve::FileStoreArg::Memory);
    }
}
