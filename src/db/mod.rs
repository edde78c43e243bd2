//! Connection pool setup and migration runner.
//!
//! SYSTEM CONTEXT
//! ==============
//! Startup builds the shared SQLx pool from the typed [`DbConfig`] and runs
//! the embedded migrations before the router starts taking order traffic.
//! Pool sizing comes from config, validated at boot rather than read ad hoc
//! here.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::config::DbConfig;

/// Connect to `PostgreSQL` and bring the schema up to date.
///
/// # Errors
///
/// Returns an error if the connection or a migration fails.
pub async fn init_pool(cfg: &DbConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(cfg.max_connections)
        .connect(&cfg.url)
        .await?;

    sqlx::migrate!("src/db/migrations").run(&pool).await?;

    Ok(pool)
}
