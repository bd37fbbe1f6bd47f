//! Configuration constants.
//!
//! This module defines the defaults used when a value is not supplied on the
//! command line or through the library `Config`.

use std::time::Duration;

/// Scale factor between degrees and grid units (two decimal places).
pub const COORDINATE_PRECISION: f64 = 100.0;

/// Largest longitude, in grid units, that still encodes to a unique key.
///
/// Keys are `(lat << 16) + lon`, so longitudes must fit in 16 bits.
pub const MAX_GRID_LONGITUDE: i32 = (1 << 16) - 1;

/// Search radius sent with every nearest-point query.
pub const DEFAULT_SEARCH_RADIUS: &str = "25km";

/// Latitude units covered by one band (bands are `[start, start + width]`).
pub const DEFAULT_BAND_WIDTH: u32 = 310;

/// Maximum number of bands issuing lookups at the same time.
pub const DEFAULT_MAX_CONCURRENT_BANDS: usize = 5;

/// Outbound lookups per second across all bands (0 disables limiting).
pub const DEFAULT_RATE_LIMIT_RPS: u32 = 100;

/// Token bucket burst capacity.
pub const DEFAULT_RATE_BURST: usize = 1;

/// Lookup attempts per coordinate (initial attempt included).
pub const RETRY_MAX_ATTEMPTS: u32 = 3;

/// Backoff unit; the delay after attempt `n` is `n² * unit`.
pub const RETRY_BACKOFF_UNIT: Duration = Duration::from_secs(1);

/// Per-request timeout for the search backend, in seconds.
pub const SEARCH_TIMEOUT_SECS: u64 = 120;

/// Seconds between progress log lines during a population run.
pub const LOGGING_INTERVAL: u64 = 5;

/// Refill tick floor for the rate limiter.
pub const RATE_LIMITER_MIN_TICK: Duration = Duration::from_millis(1);

/// Default SQLite cache file.
pub const DB_PATH: &str = "./geo_cache.db";

/// Default Redis connection URL.
pub const REDIS_URL: &str = "redis://127.0.0.1:6379/";

/// Message returned by the point query when a coordinate was never populated.
pub const NOT_FOUND_MESSAGE: &str = "No nearest Zip found for provided latitude and longitude";

/// Characters of a non-success search response body kept in the error.
pub const MAX_ERROR_BODY_CHARS: usize = 512;
