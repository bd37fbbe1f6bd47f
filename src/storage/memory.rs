//! In-process cache store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::CacheStore;
use crate::error_handling::StoreError;

/// `HashMap`-backed store; never fails, forgets everything on drop.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Copy of every entry, for comparing cache states.
    pub async fn snapshot(&self) -> HashMap<String, Vec<u8>> {
        self.entries.read().await.clone()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_set_get_overwrite() {
        let store = MemoryStore::new();
        assert!(store.is_empty().await);
        assert_eq!(store.get("k").await.unwrap(), None);

        store.set("k", b"one").await.unwrap();
        store.set("k", b"two").await.unwrap();

        assert_eq!(store.get("k").await.unwrap(), Some(b"two".to_vec()));
        assert_eq!(store.len().await, 1);
        assert_eq!(store.snapshot().await.get("k"), Some(&b"two".to_vec()));
    }
}
