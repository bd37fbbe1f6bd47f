//! Point queries against a populated cache.

use log::debug;

use crate::config::MAX_GRID_LONGITUDE;
use crate::error_handling::QueryError;
use crate::grid::{encode_key, Coordinate};
use crate::search::GeoPoint;
use crate::storage::{decode_point, CacheStore};

/// Looks up the cached point for a position given in degrees.
///
/// The position is rounded onto the grid the same way the population run
/// rounds it, so `7.004, 68.71` and `7.0, 68.71` read the same entry.
///
/// Returns `Ok(None)` when the coordinate was never populated.
///
/// # Errors
///
/// - `QueryError::InvalidCoordinate` for NaN, infinite or off-grid input
/// - `QueryError::Store` if the store cannot be read
/// - `QueryError::Decode` if the stored value is not a point
pub async fn lookup_location(
    store: &dyn CacheStore,
    latitude: f64,
    longitude: f64,
) -> Result<Option<GeoPoint>, QueryError> {
    let coordinate = Coordinate::from_degrees(latitude, longitude)
        .filter(|c| (0..=MAX_GRID_LONGITUDE).contains(&c.lon))
        .ok_or(QueryError::InvalidCoordinate {
            latitude,
            longitude,
        })?;

    let key = encode_key(coordinate);
    debug!("Looking up {coordinate} under key {key}");

    match store.get(&key).await? {
        Some(value) => Ok(Some(decode_point(&value)?)),
        None => Ok(None),
    }
}
