//! Command implementations for the unidir CLI

pub mod check_db;
pub mod migrate;
pub mod seed;
pub mod serve;

// Re-export dispatcher functions for flat access from main.rs
pub use check_db::run_check_db;
pub use migrate::run_migrate;
pub use seed::run_seed;
pub use serve::run_serve;

use anyhow::{Context, Result};
use sqlx::PgPool;
use unidir_server::db::create_pool_with_options;

use crate::config::ServiceConfig;

/// Open the configured pool with a consistent error message.
pub(crate) async fn connect(config: &ServiceConfig) -> Result<PgPool> {
    let database_url = config.database_url()?;
    create_pool_with_options(database_url, config.max_connections())
        .await
        .context("Failed to create database pool")
}
