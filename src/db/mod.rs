//! Database initialization and migration runner.

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::error::AppError;

/// Open the SQLite pool and run migrations.
///
/// Foreign keys are switched on for every connection so deleting a checklist
/// cascades to its checks. An in-memory URL gets a single long-lived
/// connection, since each new connection would see an empty database.
///
/// # Errors
///
/// Returns an error if the URL is malformed, the connection fails, or a
/// migration fails.
pub async fn init_pool(database_url: &str) -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");
    let pool = SqlitePoolOptions::new()
        .max_connections(if in_memory { 1 } else { 5 })
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    sqlx::migrate!("src/db/migrations").run(&pool).await?;

    Ok(pool)
}
