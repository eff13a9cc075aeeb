//! Database operations for the order store.
//!
//! # Database: `SQLite`
//!
//! A single `orders` table holds every customer purchase request. The table
//! is append-mostly: rows are inserted at intake and read back for the
//! back-office listing. No update or delete operations are exposed.
//!
//! The schema is created idempotently at startup via
//! [`OrderStore::init_schema`], so no separate migration step is needed.

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use thiserror::Error;

pub mod orders;

pub use orders::{OrderStore, SqliteOrderStore};

/// Errors from the persistence layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Create a `SQLite` connection pool with sensible defaults.
///
/// The database file is created if it does not exist yet.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection string is invalid or the
/// database cannot be opened.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}
