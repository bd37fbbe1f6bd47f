//! Command-line interface definitions.
//!
//! The CLI is a thin layer that turns flags (and `ELASTIC_*` environment
//! variables, usually loaded from `.env`) into the library `Config`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::constants::*;
use crate::config::types::{
    CacheBackend, CacheConfig, Config, LogFormat, LogLevel, SearchConfig,
};
use crate::error_handling::ConfigError;
use crate::grid::GridBounds;
use crate::utils::RetryPolicy;

/// Top-level command line.
///
/// # Examples
///
/// ```bash
/// # Populate the cache for a bounding box (degrees)
/// geo_cache populate --lat-start 7.00 --lat-end 38.00 --lon-start 68.70 --lon-end 97.40
///
/// # Smaller bands, more of them in flight
/// geo_cache populate --lat-start 7 --lat-end 38 --lon-start 68.7 --lon-end 97.4 \
///     --band-width 100 --max-concurrent-bands 10
///
/// # Read one point back
/// geo_cache lookup --latitude 12.97 --longitude 77.59
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "geo_cache",
    about = "Precomputes nearest postal points for a lat/lon grid into a key-value cache."
)]
pub struct Cli {
    /// Log level for geo_cache itself: error|warn|info|debug|trace.
    /// Overrides RUST_LOG for this crate; defaults to info when neither is set.
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve every grid coordinate against the search backend and cache the results
    Populate(PopulateArgs),
    /// Read the cached nearest point for one latitude/longitude
    Lookup(LookupArgs),
}

/// Cache store selection, shared by both subcommands.
#[derive(Debug, Clone, Args)]
pub struct CacheArgs {
    /// Cache store: memory|sqlite|redis
    #[arg(long, value_enum, default_value_t = CacheBackend::Sqlite)]
    pub cache_backend: CacheBackend,

    /// SQLite cache file
    #[arg(long, value_parser, default_value = DB_PATH)]
    pub db_path: PathBuf,

    /// Redis connection URL
    #[arg(long, env = "REDIS_URL", default_value = REDIS_URL)]
    pub redis_url: String,
}

impl From<CacheArgs> for CacheConfig {
    fn from(args: CacheArgs) -> Self {
        CacheConfig {
            backend: args.cache_backend,
            db_path: args.db_path,
            redis_url: args.redis_url,
        }
    }
}

/// Options for `populate`.
#[derive(Debug, Args)]
pub struct PopulateArgs {
    /// Southern edge of the grid, in degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lat_start: f64,

    /// Northern edge of the grid, in degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lat_end: f64,

    /// Western edge of the grid, in degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lon_start: f64,

    /// Eastern edge of the grid, in degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lon_end: f64,

    /// Search radius for each lookup
    #[arg(long, default_value = DEFAULT_SEARCH_RADIUS)]
    pub radius: String,

    /// Latitude units (hundredths of a degree) per band
    #[arg(long, default_value_t = DEFAULT_BAND_WIDTH)]
    pub band_width: u32,

    /// Maximum bands issuing lookups at the same time
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENT_BANDS)]
    pub max_concurrent_bands: usize,

    /// Lookups per second across all bands (0 disables limiting)
    #[arg(long, default_value_t = DEFAULT_RATE_LIMIT_RPS)]
    pub rate_limit_rps: u32,

    /// Rate limit burst capacity (tokens)
    #[arg(long, default_value_t = DEFAULT_RATE_BURST)]
    pub rate_burst: usize,

    /// Lookup attempts per coordinate, first attempt included
    #[arg(long, default_value_t = RETRY_MAX_ATTEMPTS)]
    pub retry_attempts: u32,

    /// Search endpoint (full `_search` URL)
    #[arg(long, env = "ELASTIC_URL")]
    pub elastic_url: String,

    /// Basic auth user for the search endpoint
    #[arg(long, env = "ELASTIC_USERNAME", default_value = "")]
    pub elastic_username: String,

    /// Basic auth password for the search endpoint
    #[arg(long, env = "ELASTIC_PASSWORD", hide_env_values = true)]
    pub elastic_password: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = SEARCH_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    #[command(flatten)]
    pub cache: CacheArgs,
}

impl PopulateArgs {
    /// Builds the library configuration, converting degree bounds to grid units.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a bound is not a finite number.
    pub fn into_config(self) -> Result<Config, ConfigError> {
        let grid =
            GridBounds::from_degrees(self.lat_start, self.lat_end, self.lon_start, self.lon_end)?;
        Ok(Config {
            radius: self.radius,
            band_width: self.band_width,
            max_concurrent_bands: self.max_concurrent_bands,
            rate_limit_rps: self.rate_limit_rps,
            rate_burst: self.rate_burst,
            retry: RetryPolicy::new(self.retry_attempts, RETRY_BACKOFF_UNIT),
            search: SearchConfig {
                endpoint: self.elastic_url,
                username: self.elastic_username,
                password: self.elastic_password,
                timeout_seconds: self.timeout_seconds,
            },
            cache: self.cache.into(),
            ..Config::new(grid)
        })
    }
}

/// Options for `lookup`.
#[derive(Debug, Args)]
pub struct LookupArgs {
    /// Latitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    pub latitude: f64,

    /// Longitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    pub longitude: f64,

    #[command(flatten)]
    pub cache: CacheArgs,
}
