//! Database connectivity check

use anyhow::{Context, Result};

use unidir_server::db::migrations;

use crate::config::ServiceConfig;

/// Connect, print the server version and which tables exist.
///
/// Exits with an error when any table is missing.
pub async fn run_check_db(config: ServiceConfig) -> Result<()> {
    let pool = super::connect(&config).await?;

    let (version,): (String,) = sqlx::query_as("SHOW server_version")
        .fetch_one(&pool)
        .await
        .context("Failed to query server version")?;
    println!("✅ Connected to PostgreSQL {version}");

    let mut missing = 0;
    for table in migrations::TABLES {
        let (exists,): (bool,) = sqlx::query_as("SELECT to_regclass($1) IS NOT NULL")
            .bind(*table)
            .fetch_one(&pool)
            .await
            .with_context(|| format!("Failed to check table {table}"))?;

        if exists {
            println!("   ✓ {table}");
        } else {
            println!("   ✗ {table}");
            missing += 1;
        }
    }
    pool.close().await;

    if missing > 0 {
        anyhow::bail!("{missing} table(s) missing; run `unidir migrate`");
    }
    Ok(())
}
