//! Sample data command

use anyhow::{Context, Result};

use unidir_server::db::{migrations, seed};

use crate::config::ServiceConfig;

/// Replace all data with the sample directory
pub async fn run_seed(config: ServiceConfig) -> Result<()> {
    let pool = super::connect(&config).await?;

    migrations::run(&pool)
        .await
        .context("Failed to run migrations")?;
    let summary = seed::run(&pool, config.bcrypt_cost())
        .await
        .context("Failed to seed database")?;
    pool.close().await;

    println!("🌱 Database seeded");
    println!("   users:       {}", summary.users);
    println!("   departments: {}", summary.departments);
    println!("   faculty:     {}", summary.faculty);
    println!("   memberships: {}", summary.memberships);
    Ok(())
}
