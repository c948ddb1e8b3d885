use anyhow::Context;

use crate::config::{AppConfig, StorageBackend};
use crate::database::Database;

pub async fn handle(config: AppConfig) -> anyhow::Result<()> {
    if config.database.backend == StorageBackend::Memory {
        anyhow::bail!("migrate needs DATABASE_BACKEND=postgres; the memory backend has no schema");
    }

    let database = Database::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    database.migrate().await.context("failed to apply schema")?;
    database.close().await;

    println!("✓ Schema is up to date");
    Ok(())
}
