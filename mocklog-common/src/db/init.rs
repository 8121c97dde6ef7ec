//! Database initialization
//!
//! Creates the database file and the `records` table on first run. Safe to
//! call against an existing database.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Open (creating if needed) the record database at `db_path`
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // WAL lets the statistics reads proceed while an import is appending
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    create_records_table(&pool).await?;

    Ok(pool)
}

/// Private in-memory database with the same schema
///
/// Limited to one connection: every SQLite `:memory:` connection is a
/// separate database.
pub async fn init_memory_database() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    create_records_table(&pool).await?;

    Ok(pool)
}

async fn create_records_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS records (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            test_no INTEGER NOT NULL CHECK (test_no >= 1),
            date TEXT,
            q_no INTEGER NOT NULL CHECK (q_no BETWEEN 1 AND 25),
            chapter TEXT NOT NULL,
            attempted TEXT NOT NULL CHECK (attempted IN ('Yes', 'No')),
            correct TEXT CHECK (correct IN ('Yes', 'No')),
            difficulty TEXT NOT NULL,
            remarks TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_records_test_no ON records(test_no)")
        .execute(pool)
        .await?;

    Ok(())
}
