//! # SQLite order store
//!
//! The "low-level" SQLite interactions live in [`orders`] as simple functions that accept a `&mut SqliteConnection`.
//! Callers can obtain a connection from a pool, or open a transaction and pass `&mut *tx` without any other changes.
//! [`SqliteDatabase`] wraps them up as an [`crate::traits::OrderManagement`] backend.
mod db;
mod errors;

pub mod orders;

use std::env;

pub use db::SqliteDatabase;
pub use errors::SqliteDatabaseError;
use log::info;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

const SQLITE_DB_URL: &str = "sqlite://data/payfast_store.db";

pub fn db_url() -> String {
    let result = env::var("PFG_DATABASE_URL").unwrap_or_else(|_| {
        info!("PFG_DATABASE_URL is not set. Using the default.");
        SQLITE_DB_URL.to_string()
    });
    info!("Using database URL: {result}");
    result
}

pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqliteDatabaseError> {
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect(url).await?;
    Ok(pool)
}
