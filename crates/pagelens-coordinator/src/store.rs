//! Key-value record storage for the coordinator.
//!
//! Records are stored as JSON in a single `SQLite` table, keeping the
//! aggregate schema-less so new fields deserialize with their defaults.

use crate::error::{CoordinatorError, Result};
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// JSON record storage backed by `SQLite`.
#[derive(Debug, Clone)]
pub struct AggregateStore {
    pool: SqlitePool,
}

impl AggregateStore {
    /// Open (or create) a store at the given path.
    pub async fn connect(path: &str) -> Result<Self> {
        Self::connect_with_limit(path, 5).await
    }

    /// Open an in-memory store for tests and ephemeral sessions.
    pub async fn in_memory() -> Result<Self> {
        // A pooled :memory: database is one database per connection, so the
        // pool is capped at a single connection.
        Self::connect_with_limit("sqlite::memory:", 1).await
    }

    async fn connect_with_limit(path: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(path)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.init_schema().await?;
        tracing::debug!(path, "aggregate store opened");
        Ok(store)
    }

    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS records (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Store a JSON record, replacing any existing value under the key.
    pub async fn set(&self, key: &str, value: &Value) -> Result<()> {
        let value_str = serde_json::to_string(value)
            .map_err(|e| CoordinatorError::Serialization(e.to_string()))?;

        sqlx::query(
            r"
            INSERT INTO records (key, value, updated_at)
            VALUES (?, ?, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = datetime('now')
            ",
        )
        .bind(key)
        .bind(value_str)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Fetch a JSON record by key.
    pub async fn get(&self, key: &str) -> Result<Option<Value>> {
        let row: Option<(String,)> = sqlx::query_as(
            r"
            SELECT value
            FROM records
            WHERE key = ?
            ",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some((value_str,)) => {
                let value: Value = serde_json::from_str(&value_str)
                    .map_err(|e| CoordinatorError::Serialization(e.to_string()))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Delete a record by key. Deleting a missing key is a no-op.
    pub async fn delete(&self, key: &str) -> Result<()> {
        sqlx::query(
            r"
            DELETE FROM records
            WHERE key = ?
            ",
        )
        .bind(key)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Direct access to the underlying pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
