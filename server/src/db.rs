//! Volatile SQLite storage for the `todos` table.
//!
//! # Design
//! Each connection to `:memory:` gets its own private database, so the pool
//! is pinned to a single connection that is never recycled. That connection
//! holds the whole dataset for the life of the process and serializes writes.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS todos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    completed BOOLEAN NOT NULL DEFAULT 0
)
"#;

/// Open a fresh in-memory database and create the `todos` table.
pub async fn connect() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    sqlx::query(SCHEMA).execute(&pool).await?;
    tracing::debug!("created in-memory todos table");
    Ok(pool)
}
