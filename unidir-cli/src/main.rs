//! unidir CLI - university directory service
//!
//! Entry point for the `unidir` binary:
//! - `serve`: run the HTTP API
//! - `migrate`: create the schema
//! - `seed`: load sample data
//! - `check-db`: verify connectivity and schema

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod tracing_setup;

use config::ServiceConfig;
use tracing_setup::{init_tracing, TracingConfig};

#[derive(Parser, Debug)]
#[command(
    name = "unidir",
    author,
    version,
    about = "University directory service - departments, faculty and admin API",
    long_about = "Serve and manage a PostgreSQL-backed directory of departments, faculty, \
                  their images and contacts, with bearer-token administrator access."
)]
struct Cli {
    /// Config file (default: ~/.unidir/config.toml if present)
    #[arg(long, global = true, env = "UNIDIR_CONFIG")]
    config: Option<PathBuf>,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Create missing tables and indexes
    Migrate,
    /// Clear all data and load the sample directory
    Seed,
    /// Check database connectivity and schema
    CheckDb,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&TracingConfig { debug: cli.debug }).ok();

    let config = ServiceConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args, config).await?,
        Commands::Migrate => commands::run_migrate(config).await?,
        Commands::Seed => commands::run_seed(config).await?,
        Commands::CheckDb => commands::run_check_db(config).await?,
    }

    Ok(())
}
