//! Error type definitions.
//!
//! This module defines the typed errors raised by the population pipeline and
//! the `ErrorType` categories used to count per-coordinate failures.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

use crate::grid::Coordinate;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error")]
    HttpClientError(#[from] ReqwestError),

    /// The search endpoint is not a usable URL.
    #[error("Invalid search endpoint {endpoint:?}")]
    EndpointError {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    /// Error connecting to or preparing the cache store.
    #[error("Cache store initialization error")]
    CacheStoreError(#[from] StoreError),
}

/// Invalid run configuration, detected before any work starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("grid bound is not a finite coordinate")]
    NonFiniteBound,

    #[error("latitude start {start} is after latitude end {end}")]
    InvertedLatitude { start: i32, end: i32 },

    #[error("longitude start {start} is after longitude end {end}")]
    InvertedLongitude { start: i32, end: i32 },

    #[error("longitude {0} does not fit in 16 bits; cache keys would collide")]
    LongitudeOutOfRange(i32),

    #[error("search radius must not be empty")]
    EmptyRadius,

    #[error("at least one band must be allowed to run at a time")]
    ZeroConcurrency,

    #[error("at least one lookup attempt is required")]
    ZeroAttempts,

    #[error("rate limit of {rps}/s is above the {ceiling}/s the token bucket can refill; raise the burst")]
    RateAboveCeiling { rps: u32, ceiling: u64 },
}

/// Failure to get a usable answer out of the search backend.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Connection, timeout, or body read failure.
    #[error("request failed")]
    Request(#[from] ReqwestError),

    /// The backend answered with a non-success status.
    #[error("search backend returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The response body is not a search result envelope.
    #[error("malformed search response")]
    Decode(#[from] serde_json::Error),
}

/// Outcome of a failed nearest-point lookup.
#[derive(Error, Debug)]
pub enum LookupError {
    /// The backend has no point within the radius. Retrying will not change that.
    #[error("no hits found for {coordinate} within {radius}")]
    NoMatch { coordinate: Coordinate, radius: String },

    /// Network, HTTP or parse failure; may succeed on a later attempt.
    #[error("lookup failed for {coordinate}")]
    Transport {
        coordinate: Coordinate,
        #[source]
        source: TransportError,
    },
}

impl LookupError {
    pub fn is_no_match(&self) -> bool {
        matches!(self, LookupError::NoMatch { .. })
    }

    /// Only transport failures are worth another attempt.
    pub fn is_retriable(&self) -> bool {
        matches!(self, LookupError::Transport { .. })
    }

    pub fn coordinate(&self) -> Coordinate {
        match self {
            LookupError::NoMatch { coordinate, .. } | LookupError::Transport { coordinate, .. } => {
                *coordinate
            }
        }
    }
}

/// Error types for cache store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite execution error.
    #[error("SQLite error")]
    Sqlite(#[from] sqlx::Error),

    /// Redis command or connection error.
    #[error("Redis error")]
    Redis(#[from] redis::RedisError),

    /// Error applying the cache schema.
    #[error("Migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Error creating the database file.
    #[error("Database file creation error")]
    FileCreation(#[from] std::io::Error),
}

/// Failure to persist one resolved point.
#[derive(Error, Debug)]
pub enum CacheWriteError {
    #[error("failed to serialize point")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to write cache entry")]
    Store(#[from] StoreError),
}

/// Failure of a point query against the cache.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("({latitude}, {longitude}) is not a valid grid coordinate")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    #[error("cache read failed")]
    Store(#[from] StoreError),

    #[error("cached entry is not a valid point")]
    Decode(#[from] serde_json::Error),
}

/// Renders an error and each of its sources as `outer: inner: root`.
///
/// Wrapper messages leave their source out, so this is how logs show the cause.
pub fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    std::iter::successors(Some(error), |e| e.source())
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(": ")
}

/// A wait was abandoned because the run is shutting down.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("cancelled")]
pub struct Cancelled;

/// Categories of per-coordinate failures.
///
/// Every variant is terminal for its coordinate only; the sweep moves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    /// Backend found nothing within the radius
    NoMatch,
    /// Lookup still failing after the last attempt
    Transport,
    /// Point could not be encoded for the cache
    Serialization,
    /// Cache write rejected
    Store,
    /// Run shut down before the coordinate was resolved
    Cancelled,
    /// Band task panicked before reaching the coordinate
    BandAborted,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::NoMatch => "No match within radius",
            ErrorType::Transport => "Search transport error",
            ErrorType::Serialization => "Serialization error",
            ErrorType::Store => "Cache store error",
            ErrorType::Cancelled => "Cancelled",
            ErrorType::BandAborted => "Band task aborted",
        }
    }
}

impl From<&LookupError> for ErrorType {
    fn from(error: &LookupError) -> Self {
        match error {
            LookupError::NoMatch { .. } => ErrorType::NoMatch,
            LookupError::Transport { .. } => ErrorType::Transport,
        }
    }
}

impl From<&CacheWriteError> for ErrorType {
    fn from(error: &CacheWriteError) -> Self {
        match error {
            CacheWriteError::Serialization(_) => ErrorType::Serialization,
            CacheWriteError::Store(_) => ErrorType::Store,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use strum::IntoEnumIterator;

    fn decode_error() -> serde_json::Error {
        serde_json::from_str::<serde_json::Value>("{").unwrap_err()
    }

    #[test]
    fn test_error_type_as_str_unique() {
        let labels: HashSet<_> = ErrorType::iter().map(|e| e.as_str()).collect();
        assert_eq!(labels.len(), ErrorType::iter().count());
    }

    #[test]
    fn test_error_type_display_matches_as_str() {
        for error_type in ErrorType::iter() {
            assert_eq!(error_type.to_string(), error_type.as_str());
        }
    }

    #[test]
    fn test_no_match_is_not_retriable() {
        let err = LookupError::NoMatch {
            coordinate: Coordinate::new(700, 6870),
            radius: "25km".into(),
        };
        assert!(err.is_no_match());
        assert!(!err.is_retriable());
        assert_eq!(ErrorType::from(&err), ErrorType::NoMatch);
        assert_eq!(err.coordinate(), Coordinate::new(700, 6870));
    }

    #[test]
    fn test_transport_is_retriable() {
        let err = LookupError::Transport {
            coordinate: Coordinate::new(700, 6871),
            source: TransportError::Decode(decode_error()),
        };
        assert!(!err.is_no_match());
        assert!(err.is_retriable());
        assert_eq!(ErrorType::from(&err), ErrorType::Transport);
    }

    #[test]
    fn test_transport_message_names_coordinate() {
        let err = LookupError::Transport {
            coordinate: Coordinate::new(700, 6871),
            source: TransportError::Status {
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                body: "overloaded".into(),
            },
        };
        let message = error_chain(&err);
        assert!(message.contains("lat: 700, lon: 6871"), "{message}");
        assert!(message.contains("503"), "{message}");
    }

    #[test]
    fn test_cache_write_error_categories() {
        let serialization = CacheWriteError::Serialization(decode_error());
        assert_eq!(ErrorType::from(&serialization), ErrorType::Serialization);

        let store = CacheWriteError::Store(StoreError::Sqlite(sqlx::Error::PoolClosed));
        assert_eq!(ErrorType::from(&store), ErrorType::Store);
    }

    #[test]
    fn test_wrapped_cause_printed_once() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only volume");
        let err = InitializationError::from(StoreError::FileCreation(io));

        assert_eq!(err.to_string(), "Cache store initialization error");
        let chain = error_chain(&err);
        assert_eq!(
            chain,
            "Cache store initialization error: Database file creation error: read-only volume"
        );
        let report = format!("{:#}", anyhow::Error::from(err));
        assert_eq!(report.matches("read-only volume").count(), 1, "{report}");
    }
}
