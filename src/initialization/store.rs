//! Cache store initialization.

use std::sync::Arc;

use log::info;

use crate::config::{CacheBackend, CacheConfig};
use crate::error_handling::InitializationError;
use crate::storage::{CacheStore, MemoryStore, RedisStore, SqliteStore};

/// Opens the cache store selected by `config.backend`.
///
/// # Errors
///
/// Returns `InitializationError::CacheStoreError` if the SQLite file cannot be
/// opened or migrated, or Redis cannot be reached.
pub async fn init_cache_store(
    config: &CacheConfig,
) -> Result<Arc<dyn CacheStore>, InitializationError> {
    let store: Arc<dyn CacheStore> = match config.backend {
        CacheBackend::Memory => {
            info!("Using in-memory cache store; entries are discarded at exit");
            Arc::new(MemoryStore::new())
        }
        CacheBackend::Sqlite => {
            info!("Using SQLite cache store at {}", config.db_path.display());
            Arc::new(SqliteStore::open(&config.db_path).await?)
        }
        CacheBackend::Redis => {
            info!("Using Redis cache store at {}", config.redis_url);
            Arc::new(RedisStore::connect(&config.redis_url).await?)
        }
    };
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_memory_store() {
        let config = CacheConfig {
            backend: CacheBackend::Memory,
            ..CacheConfig::default()
        };
        let store = init_cache_store(&config).await.unwrap();
        store.set("k", b"v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(b"v".to_vec()));
    }

    #[tokio::test]
    async fn test_init_sqlite_store_creates_file() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("geo_cache.db");
        let config = CacheConfig {
            backend: CacheBackend::Sqlite,
            db_path: db_path.clone(),
            ..CacheConfig::default()
        };
        init_cache_store(&config).await.unwrap();
        assert!(db_path.exists());
    }

    #[tokio::test]
    async fn test_init_sqlite_store_in_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let config = CacheConfig {
            backend: CacheBackend::Sqlite,
            db_path: dir.path().join("no_such_dir").join("geo_cache.db"),
            ..CacheConfig::default()
        };
        let result = init_cache_store(&config).await;
        assert!(matches!(
            result,
            Err(InitializationError::CacheStoreError(_))
        ));
    }
}
