//! geo_cache library: precomputed nearest-point cache population
//!
//! This library sweeps a rectangular latitude/longitude grid (in hundredths of
//! a degree), asks a geo search backend for the nearest postal point to every
//! coordinate, and writes each result into a key-value cache under a compact
//! integer key. Readers then answer "what is near here?" with a single cache
//! read instead of a geo search.
//!
//! # Example
//!
//! ```no_run
//! use geo_cache::{populate_from_config, Config, GridBounds};
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = Config::new(GridBounds::new(700, 3800, 6870, 9740));
//! config.search.endpoint = "http://localhost:9200/geo/_search".to_string();
//!
//! let report = populate_from_config(config, CancellationToken::new()).await?;
//! println!("Stored {} of {} coordinates", report.stored, report.total_coordinates);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

mod app;
pub mod config;
pub mod error_handling;
pub mod grid;
pub mod initialization;
mod query;
mod run;
pub mod search;
pub mod storage;
pub mod utils;

// Re-export public API
pub use config::{CacheBackend, CacheConfig, Config, LogFormat, LogLevel, SearchConfig};
pub use grid::{encode_key, partition_bands, Band, Coordinate, GridBounds};
pub use query::lookup_location;
pub use run::{populate_from_config, run_population, PopulationReport};
pub use search::{ElasticClient, GeoPoint, GeoSearch, Location};
pub use storage::{CacheStore, CacheWriter, MemoryStore, RedisStore, SqliteStore};
pub use utils::{attempt_with_retry, RetryPolicy};
