//! Schema creation command

use anyhow::{Context, Result};

use unidir_server::db::migrations;

use crate::config::ServiceConfig;

/// Create missing tables and indexes
pub async fn run_migrate(config: ServiceConfig) -> Result<()> {
    let pool = super::connect(&config).await?;

    migrations::run(&pool)
        .await
        .context("Failed to run migrations")?;
    pool.close().await;

    println!("✅ Schema up to date ({} tables)", migrations::TABLES.len());
    Ok(())
}
