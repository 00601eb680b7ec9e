use std::sync::OnceLock;

use anyhow::Result;
use sqlx::{PgPool, Postgres, migrate::MigrateDatabase, postgres::PgPoolOptions};

pub mod models;
pub mod repositories;
pub mod transaction;
pub mod utils;

static POOL: OnceLock<PgPool> = OnceLock::new();

pub async fn init_database(database_url: &str) -> Result<PgPool> {
    // Create database if it doesn't exist
    if !Postgres::database_exists(database_url).await.unwrap_or(false) {
        log::info!("Creating database {}", database_url);
        Postgres::create_database(database_url).await?;
    }

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    log::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    log::info!("Migrations completed successfully");

    if POOL.set(pool.clone()).is_err() {
        log::warn!("Database pool was already initialized; keeping the existing pool");
    }

    Ok(pool)
}

/// Process-wide pool set by `init_database`.
pub fn get_pool() -> Result<&'static PgPool, sqlx::Error> {
    POOL.get()
        .ok_or_else(|| sqlx::Error::Configuration("database pool is not initialized".into()))
}
