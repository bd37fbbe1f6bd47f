//! Configuration types.
//!
//! This module defines the library configuration and the enums shared with the
//! command-line interface.

use std::path::PathBuf;

use clap::ValueEnum;

use crate::config::constants::*;
use crate::error_handling::ConfigError;
use crate::grid::GridBounds;
use crate::initialization::max_rate;
use crate::utils::RetryPolicy;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Which key-value store receives the populated entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CacheBackend {
    /// Process-local map; contents are lost when the process exits
    Memory,
    /// SQLite file (see `CacheConfig::db_path`)
    Sqlite,
    /// Redis server (see `CacheConfig::redis_url`)
    Redis,
}

/// Cache store selection and connection settings.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Store implementation
    pub backend: CacheBackend,
    /// SQLite database file, used by `CacheBackend::Sqlite`
    pub db_path: PathBuf,
    /// Redis connection URL, used by `CacheBackend::Redis`
    pub redis_url: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Sqlite,
            db_path: PathBuf::from(DB_PATH),
            redis_url: REDIS_URL.to_string(),
        }
    }
}

/// Search backend endpoint and credentials.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Full search URL, e.g. `https://es.example.com/zipcodes/_search`
    pub endpoint: String,
    /// Basic auth user
    pub username: String,
    /// Basic auth password
    pub password: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            username: String::new(),
            password: None,
            timeout_seconds: SEARCH_TIMEOUT_SECS,
        }
    }
}

/// Library configuration (no CLI dependencies).
///
/// The grid has no sensible default, so a `Config` is always built from one:
///
/// ```no_run
/// use geo_cache::{Config, GridBounds};
///
/// let grid = GridBounds::new(700, 3800, 6870, 9740);
/// let config = Config {
///     band_width: 100,
///     max_concurrent_bands: 8,
///     ..Config::new(grid)
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Coordinate space to populate, in grid units
    pub grid: GridBounds,

    /// Search radius sent with every lookup (e.g. `25km`)
    pub radius: String,

    /// Latitude units per band
    pub band_width: u32,

    /// Maximum bands issuing lookups at once
    pub max_concurrent_bands: usize,

    /// Outbound lookups per second across all bands (0 disables limiting)
    pub rate_limit_rps: u32,

    /// Token bucket burst capacity
    pub rate_burst: usize,

    /// Attempts and backoff for transient lookup failures
    pub retry: RetryPolicy,

    /// Search backend settings
    pub search: SearchConfig,

    /// Cache store settings
    pub cache: CacheConfig,
}

impl Config {
    /// Creates a configuration for `grid` with every other field defaulted.
    pub fn new(grid: GridBounds) -> Self {
        Self {
            grid,
            radius: DEFAULT_SEARCH_RADIUS.to_string(),
            band_width: DEFAULT_BAND_WIDTH,
            max_concurrent_bands: DEFAULT_MAX_CONCURRENT_BANDS,
            rate_limit_rps: DEFAULT_RATE_LIMIT_RPS,
            rate_burst: DEFAULT_RATE_BURST,
            retry: RetryPolicy::new(RETRY_MAX_ATTEMPTS, RETRY_BACKOFF_UNIT),
            search: SearchConfig::default(),
            cache: CacheConfig::default(),
        }
    }

    /// Checks everything the population run relies on before any task starts.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint as a `ConfigError`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid.validate()?;
        if self.radius.trim().is_empty() {
            return Err(ConfigError::EmptyRadius);
        }
        if self.max_concurrent_bands == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        let ceiling = max_rate(self.rate_burst);
        if u64::from(self.rate_limit_rps) > ceiling {
            return Err(ConfigError::RateAboveCeiling {
                rps: self.rate_limit_rps,
                ceiling,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn grid() -> GridBounds {
        GridBounds::new(700, 1010, 6870, 9740)
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_config_new_defaults() {
        let config = Config::new(grid());
        assert_eq!(config.radius, "25km");
        assert_eq!(config.band_width, 310);
        assert_eq!(config.max_concurrent_bands, 5);
        assert_eq!(config.rate_limit_rps, 100);
        assert_eq!(config.rate_burst, 1);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.backoff_unit, Duration::from_secs(1));
        assert_eq!(config.search.timeout_seconds, 120);
        assert_eq!(config.cache.backend, CacheBackend::Sqlite);
        assert_eq!(config.cache.db_path, PathBuf::from("./geo_cache.db"));
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(Config::new(grid()).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let config = Config {
            max_concurrent_bands: 0,
            ..Config::new(grid())
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroConcurrency)
        ));
    }

    #[test]
    fn test_validate_rejects_blank_radius() {
        let config = Config {
            radius: "  ".to_string(),
            ..Config::new(grid())
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyRadius)));
    }

    #[test]
    fn test_validate_rejects_zero_attempts() {
        let config = Config {
            retry: RetryPolicy::new(0, Duration::from_millis(1)),
            ..Config::new(grid())
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroAttempts)));
    }

    #[test]
    fn test_validate_rate_ceiling_scales_with_burst() {
        let too_fast = Config {
            rate_limit_rps: 501,
            rate_burst: 1,
            ..Config::new(grid())
        };
        assert!(matches!(
            too_fast.validate(),
            Err(ConfigError::RateAboveCeiling { rps: 501, ceiling: 500 })
        ));

        let bigger_bucket = Config {
            rate_burst: 2,
            ..too_fast.clone()
        };
        assert!(bigger_bucket.validate().is_ok());

        let unlimited = Config {
            rate_limit_rps: 0,
            rate_burst: 0,
            ..Config::new(grid())
        };
        assert!(unlimited.validate().is_ok());
    }

    #[test]
    fn test_validate_propagates_grid_errors() {
        let config = Config::new(GridBounds::new(800, 700, 6870, 9740));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedLatitude { .. })
        ));
    }
}
