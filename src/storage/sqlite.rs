//! SQLite-backed cache store.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Sqlite};

use super::migrations::run_migrations;
use super::pool::init_db_pool_with_path;
use super::CacheStore;
use crate::error_handling::StoreError;

/// Cache entries in a `geo_cache(key, value)` table.
///
/// `set` is an upsert, so a later run overwrites earlier entries in place.
pub struct SqliteStore {
    pool: Arc<Pool<Sqlite>>,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `path` and applies migrations.
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        let pool = init_db_pool_with_path(path).await?;
        Self::from_pool(pool).await
    }

    /// Wraps an existing pool, applying migrations first.
    pub async fn from_pool(pool: Arc<Pool<Sqlite>>) -> Result<Self, StoreError> {
        run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    /// Number of stored entries.
    pub async fn count(&self) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM geo_cache")
            .fetch_one(self.pool.as_ref())
            .await?;
        Ok(count)
    }

    /// Folds outstanding WAL pages into the main database file.
    pub async fn checkpoint(&self) -> Result<(), StoreError> {
        sqlx::query("PRAGMA wal_checkpoint(TRUNCATE)")
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }
}

#[async_trait]
impl CacheStore for SqliteStore {
    async fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO geo_cache (key, value) VALUES (?, ?) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(self.pool.as_ref())
        .await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let value = sqlx::query_scalar("SELECT value FROM geo_cache WHERE key = ?")
            .bind(key)
            .fetch_optional(self.pool.as_ref())
            .await?;
        Ok(value)
    }

    async fn flush(&self) -> Result<(), StoreError> {
        self.checkpoint().await
    }
}
