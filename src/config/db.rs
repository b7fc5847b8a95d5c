// src/config/db.rs
// DOCUMENTATION: Database connection pool initialization
// PURPOSE: Setup the SQLite pool backing the favorites store

use crate::config::Config;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

/// Initialize SQLite connection pool
/// DOCUMENTATION: Creates the database file when missing and ensures the
/// favorites schema exists. Called once during application startup
pub async fn init_db_pool(config: &Config) -> Result<SqlitePool, sqlx::Error> {
    log::info!("Initializing database pool: {}", config.database_url);

    let options = SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        // Maximum concurrent connections
        .max_connections(config.db_max_connections.max(1))
        // Timeout waiting for connection from pool
        .acquire_timeout(Duration::from_secs(30))
        .connect_with(options)
        .await?;

    // Verify connection works
    sqlx::query("SELECT 1").execute(&pool).await?;

    init_schema(&pool).await?;

    log::info!("Database pool initialized successfully");
    Ok(pool)
}

/// Single-connection in-memory pool
/// DOCUMENTATION: Every SQLite memory connection is its own database, so the
/// pool is pinned to one connection that never expires
pub async fn init_memory_pool() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    init_schema(&pool).await?;
    Ok(pool)
}

/// Create the favorites table and its ordering index
async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS favorite_photos (
            photo_id        TEXT PRIMARY KEY NOT NULL,
            image_url       TEXT NOT NULL,
            thumbnail_url   TEXT NOT NULL,
            description     TEXT NOT NULL,
            user_name       TEXT NOT NULL,
            user_username   TEXT NOT NULL,
            timestamp       INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_favorite_photos_timestamp
        ON favorite_photos(timestamp DESC)
        "#,
    )
    .execute(pool)
    .await?;

    log::debug!("Favorites schema initialized");
    Ok(())
}
