use chrono::Utc;
use pradon_core::StoreError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::debug;

/// Flat key-value store of item fullnames the bot has already replied to.
/// Cloning shares the underlying pool, so one store serves all watcher
/// tasks concurrently.
#[derive(Clone)]
pub struct ResponseStore {
    pool: SqlitePool,
}

impl ResponseStore {
    /// Opens the store at the given path, creating the file and schema if
    /// missing.
    pub async fn open(path: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", path))
            .map_err(|e| StoreError::ConnectionFailed {
                reason: e.to_string(),
            })?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::ConnectionFailed {
                reason: e.to_string(),
            })?;

        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    /// In-memory store for tests. A single connection keeps every query on
    /// the same database.
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        let options =
            SqliteConnectOptions::from_str("sqlite::memory:").map_err(|e| {
                StoreError::ConnectionFailed {
                    reason: e.to_string(),
                }
            })?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::ConnectionFailed {
                reason: e.to_string(),
            })?;

        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS replied_items (
                fullname TEXT PRIMARY KEY,
                replied_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn is_replied(&self, fullname: &str) -> Result<bool, StoreError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM replied_items WHERE fullname = ?")
                .bind(fullname)
                .fetch_one(&self.pool)
                .await?;
        Ok(count > 0)
    }

    /// Records a reply and returns whether this call inserted the row.
    /// `false` means another caller already holds the fullname, so marking
    /// is also how a watcher claims an item before replying.
    pub async fn mark_replied(&self, fullname: &str) -> Result<bool, StoreError> {
        let result =
            sqlx::query("INSERT OR IGNORE INTO replied_items (fullname, replied_at) VALUES (?, ?)")
                .bind(fullname)
                .bind(Utc::now().to_rfc3339())
                .execute(&self.pool)
                .await?;
        let inserted = result.rows_affected() > 0;
        if inserted {
            debug!("Recorded reply for {}", fullname);
        }
        Ok(inserted)
    }

    pub async fn replied_count(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM replied_items")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
