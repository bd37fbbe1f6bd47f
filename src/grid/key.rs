//! Cache key encoding.

use super::Coordinate;

/// Encodes a grid coordinate as its cache key: `(lat << 16) + lon` in decimal.
///
/// Injective as long as `0 <= lon < 2^16`, which `GridBounds::validate`
/// guarantees for every coordinate a run visits.
pub fn encode_key(coordinate: Coordinate) -> String {
    let key = (i64::from(coordinate.lat) << 16) + i64::from(coordinate.lon);
    key.to_string()
}
