//! Database schema migrations.
//!
//! All statements are idempotent; running them against an initialized
//! database is a no-op.

use anyhow::Result;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;

/// Create the schema on an existing pool.
pub async fn migrate_pool(pool: &SqlitePool) -> Result<()> {
    // Timestamps are Unix milliseconds (UTC).
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS snippets (
            id TEXT PRIMARY KEY,
            text TEXT NOT NULL,
            summary TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_snippets_created_at ON snippets(created_at)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Open the configured database, create the schema, and close the pool.
pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    migrate_pool(&pool).await?;
    pool.close().await;
    Ok(())
}
