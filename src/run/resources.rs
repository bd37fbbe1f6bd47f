//! Shared state for a population run.
//!
//! `PopulationContext` holds everything a band task needs; one instance is
//! built per run and shared behind an `Arc`.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error_handling::ProcessingStats;
use crate::grid::GridBounds;
use crate::initialization::RateLimiter;
use crate::search::GeoSearch;
use crate::storage::CacheWriter;
use crate::utils::RetryPolicy;

/// Resources shared by every band of one run.
pub struct PopulationContext {
    /// Grid being populated
    pub grid: GridBounds,
    /// Search backend
    pub search: Arc<dyn GeoSearch>,
    /// Writes found points to the cache
    pub writer: CacheWriter,
    /// Global lookup rate limiter, `None` when limiting is disabled
    pub limiter: Option<Arc<RateLimiter>>,
    /// Attempts and backoff for each lookup
    pub retry: RetryPolicy,
    /// Search radius, e.g. `25km`
    pub radius: String,
    /// Per-coordinate outcome counters
    pub stats: Arc<ProcessingStats>,
    /// Fires when the run is asked to stop
    pub cancel: CancellationToken,
}
