//! Database setup and initialization.
//!
//! Entry points call [`setup_database`] with the resolved database path.

use std::path::Path;

use anyhow::Result;
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;
use tracing::info;

/// Open the `SQLite` database at `db_path`, creating it if needed, and
/// ensure the schema exists.
///
/// # Example
///
/// ```rust,no_run
/// use calmwave_db::setup_database;
/// use std::path::Path;
///
/// # async fn example() -> anyhow::Result<()> {
/// let pool = setup_database(Path::new("data/calmwave.db")).await?;
/// # Ok(())
/// # }
/// ```
pub async fn setup_database(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let pool = SqlitePool::connect_with(
        SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true),
    )
    .await?;

    create_schema(&pool).await?;
    info!(path = %db_path.display(), "Database ready");
    Ok(pool)
}

/// An in-memory database with the production schema.
///
/// Limited to one connection: each `:memory:` connection is its own database.
#[cfg(any(test, feature = "test-utils"))]
pub async fn setup_test_database() -> Result<SqlitePool> {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    create_schema(&pool).await?;
    Ok(pool)
}

/// Create all tables and indexes. Safe to call repeatedly.
async fn create_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS meditations (
            id TEXT PRIMARY KEY NOT NULL,
            user_id TEXT NOT NULL,
            user_input TEXT NOT NULL,
            meditation_script TEXT NOT NULL,
            audio_file_path TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        ",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_meditations_user_created ON meditations(user_id, created_at DESC)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
