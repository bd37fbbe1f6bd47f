//! Serializes looked-up points into the cache.

use std::sync::Arc;

use log::debug;

use super::CacheStore;
use crate::error_handling::CacheWriteError;
use crate::grid::{encode_key, Coordinate};
use crate::search::GeoPoint;

/// Writes one point per coordinate under its encoded key.
///
/// Values are the JSON encoding of [`GeoPoint`], the same shape the search
/// backend returns in `_source`, so readers need nothing but `serde_json`.
#[derive(Clone)]
pub struct CacheWriter {
    store: Arc<dyn CacheStore>,
}

impl CacheWriter {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// Serializes `point` and stores it under `encode_key(coordinate)`.
    ///
    /// # Errors
    ///
    /// Returns `CacheWriteError::Serialization` if the point cannot be
    /// encoded, `CacheWriteError::Store` if the store rejects the write.
    /// Either way the caller skips the coordinate.
    pub async fn store(&self, coordinate: Coordinate, point: &GeoPoint) -> Result<(), CacheWriteError> {
        let key = encode_key(coordinate);
        let value = serde_json::to_vec(point)?;
        self.store.set(&key, &value).await?;
        debug!("Stored {coordinate} under key {key}");
        Ok(())
    }
}

/// Decodes a cached value written by [`CacheWriter::store`].
pub fn decode_point(value: &[u8]) -> Result<GeoPoint, serde_json::Error> {
    serde_json::from_slice(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::StoreError;
    use crate::search::Location;
    use crate::storage::MemoryStore;
    use async_trait::async_trait;

    struct RejectingStore;

    #[async_trait]
    impl CacheStore for RejectingStore {
        async fn set(&self, _key: &str, _value: &[u8]) -> Result<(), StoreError> {
            Err(StoreError::FileCreation(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }

        async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, StoreError> {
            Ok(None)
        }
    }

    fn sample_point() -> GeoPoint {
        GeoPoint {
            location: Location { lat: 7.0, lon: 68.7 },
            state: "Kerala".into(),
            zip: "682001".into(),
            city: "Kochi".into(),
            index: 42,
        }
    }

    #[tokio::test]
    async fn test_store_round_trips_through_key() {
        let store = Arc::new(MemoryStore::new());
        let writer = CacheWriter::new(store.clone());
        let coordinate = Coordinate::new(700, 6870);

        writer.store(coordinate, &sample_point()).await.unwrap();

        let raw = store.get(&encode_key(coordinate)).await.unwrap().unwrap();
        assert_eq!(decode_point(&raw).unwrap(), sample_point());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_store_overwrites_previous_value() {
        let store = Arc::new(MemoryStore::new());
        let writer = CacheWriter::new(store.clone());
        let coordinate = Coordinate::new(700, 6870);

        writer.store(coordinate, &sample_point()).await.unwrap();
        let mut updated = sample_point();
        updated.city = "Ernakulam".into();
        writer.store(coordinate, &updated).await.unwrap();

        let raw = store.get(&encode_key(coordinate)).await.unwrap().unwrap();
        assert_eq!(decode_point(&raw).unwrap().city, "Ernakulam");
    }

    #[tokio::test]
    async fn test_store_failure_is_reported() {
        let writer = CacheWriter::new(Arc::new(RejectingStore));
        let err = writer
            .store(Coordinate::new(700, 6870), &sample_point())
            .await
            .unwrap_err();
        assert!(matches!(err, CacheWriteError::Store(_)));
    }

    #[test]
    fn test_cached_value_uses_backend_field_names() {
        let value = serde_json::to_value(sample_point()).unwrap();
        assert_eq!(value["zipcode"], "682001");
        assert_eq!(value["location"]["lon"], 68.7);
    }
}
