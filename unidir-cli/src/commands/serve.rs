//! HTTP server command
//!
//! Runs migrations, then serves the directory API until Ctrl+C/SIGTERM.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;

use unidir_server::http::{run_server, ServerConfig};

use crate::config::ServiceConfig;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default: 127.0.0.1:3000, or 0.0.0.0:$PORT)
    #[arg(long, short = 'b', env = "UNIDIR_BIND")]
    pub bind: Option<SocketAddr>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Database URL (overrides config/environment)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs, mut config: ServiceConfig) -> Result<()> {
    if let Some(url) = args.database_url {
        config.database_url = Some(url);
    }
    if let Some(bind) = args.bind {
        config.bind = Some(bind);
    }

    let auth = config.auth_config()?;
    let server = ServerConfig {
        bind_addr: config.bind_addr(),
        cors_permissive: args.cors_permissive || config.cors_permissive,
    };

    tracing::info!("Starting unidir server on {}", server.bind_addr);

    let pool = super::connect(&config).await?;

    // Blocks until shutdown; the pool is closed on the way out
    run_server(pool, auth, server)
        .await
        .context("Server error")?;

    Ok(())
}
