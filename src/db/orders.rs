//! Order repository over the `orders` table.
//!
//! The store is behind the [`OrderStore`] trait so tests can substitute
//! in-memory doubles for the `SQLite`-backed implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::models::{NewOrder, Order, STATUS_PENDING};

use super::RepositoryError;

/// Durable store of customer orders.
///
/// Inserts are append-only; rows are never mutated after creation.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Idempotently ensure the `orders` table exists.
    ///
    /// Safe to call on every startup; existing rows are untouched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the DDL statement fails.
    async fn init_schema(&self) -> Result<(), RepositoryError>;

    /// Insert a new order and return the stored row.
    ///
    /// `status` and `created_at` are assigned here, never taken from the
    /// caller. The returned row carries the store-assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails. Failures are
    /// surfaced to the caller, not retried.
    async fn insert_order(&self, new: &NewOrder) -> Result<Order, RepositoryError>;

    /// Return all orders, newest first (`id` descending), fully materialized.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the read fails.
    async fn list_orders(&self) -> Result<Vec<Order>, RepositoryError>;
}

/// Production [`OrderStore`] backed by a `SQLite` pool.
#[derive(Clone)]
pub struct SqliteOrderStore {
    pool: SqlitePool,
}

impl SqliteOrderStore {
    /// Create a new store over an existing pool.
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl OrderStore for SqliteOrderStore {
    async fn init_schema(&self) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS orders (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                product    TEXT,
                quantity   INTEGER,
                name       TEXT,
                phone      TEXT,
                address    TEXT,
                status     TEXT,
                created_at TEXT
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn insert_order(&self, new: &NewOrder) -> Result<Order, RepositoryError> {
        let created_at = Utc::now().to_rfc3339();

        let order = sqlx::query_as::<_, Order>(
            r"
            INSERT INTO orders (product, quantity, name, phone, address, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id, product, quantity, name, phone, address, status, created_at
            ",
        )
        .bind(&new.product)
        .bind(new.quantity)
        .bind(&new.name)
        .bind(&new.phone)
        .bind(&new.address)
        .bind(STATUS_PENDING)
        .bind(&created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(order)
    }

    async fn list_orders(&self) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(
            r"
            SELECT id, product, quantity, name, phone, address, status, created_at
            FROM orders
            ORDER BY id DESC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }
}
