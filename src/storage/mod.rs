// storage/mod.rs
// Key-value cache stores and the point writer

mod memory;
mod migrations;
mod pool;
mod redis;
mod sqlite;
mod writer;

use async_trait::async_trait;

use crate::error_handling::StoreError;

pub use memory::MemoryStore;
pub use migrations::run_migrations;
pub use pool::init_db_pool_with_path;
pub use redis::RedisStore;
pub use sqlite::SqliteStore;
pub use writer::{decode_point, CacheWriter};

/// External key-value cache holding encoded points.
///
/// Keys are the decimal strings produced by `encode_key`; values are opaque
/// bytes. `set` always overwrites.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Returns `None` when the key was never written.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Makes prior writes durable. Called once at the end of a run.
    async fn flush(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
