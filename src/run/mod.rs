//! Population run orchestration.
//!
//! `run_population` partitions the grid into latitude bands, spawns one task
//! per band, and waits for all of them. A semaphore bounds how many bands
//! issue lookups at once; a shared token bucket bounds the lookup rate across
//! all of them.

mod band;
mod resources;
mod task;

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use futures::stream::FuturesUnordered;
use futures::StreamExt;
use log::{info, warn};
use tokio_util::sync::CancellationToken;

use crate::app::{log_progress, print_error_statistics, print_run_summary, shutdown_gracefully};
use crate::config::{Config, LOGGING_INTERVAL};
use crate::error_handling::{error_chain, ErrorType, ProcessingStats};
use crate::grid::partition_bands;
use crate::initialization::{init_cache_store, init_rate_limiter, init_search, init_semaphore};
use crate::search::GeoSearch;
use crate::storage::{CacheStore, CacheWriter};

use band::sweep_band;
use resources::PopulationContext;

/// Results of a population run.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationReport {
    /// Number of latitude bands the grid was split into
    pub bands: usize,
    /// Band tasks that panicked instead of finishing their sweep
    pub failed_bands: usize,
    /// Coordinates in the grid
    pub total_coordinates: u64,
    /// Coordinates whose point was written to the cache
    pub stored: usize,
    /// Coordinates skipped (no match, lookup or store failure, cancellation)
    pub skipped: usize,
    /// Elapsed time in seconds
    pub elapsed_seconds: f64,
}

/// Populates the cache for every coordinate of `config.grid`.
///
/// Per-coordinate failures are counted and skipped; they never fail the run.
/// Cancelling `cancel` makes every band stop issuing lookups, and the run
/// then returns normally with the remaining coordinates counted as cancelled.
///
/// # Errors
///
/// Returns an error only if the configuration is invalid.
pub async fn run_population(
    config: &Config,
    search: Arc<dyn GeoSearch>,
    store: Arc<dyn CacheStore>,
    cancel: CancellationToken,
) -> Result<PopulationReport> {
    config.validate().context("Invalid population configuration")?;

    let bands = partition_bands(&config.grid, config.band_width);
    let total_coordinates = config.grid.coordinate_count();
    info!(
        "Starting population of {} ({} coordinates) in {} bands, {} at a time, radius {}",
        config.grid,
        total_coordinates,
        bands.len(),
        config.max_concurrent_bands,
        config.radius
    );

    let semaphore = init_semaphore(config.max_concurrent_bands);
    let (request_limiter, rate_limiter_shutdown) =
        match init_rate_limiter(config.rate_limit_rps, config.rate_burst) {
            Some((limiter, shutdown)) => (Some(limiter), Some(shutdown)),
            None => (None, None),
        };

    let start_time = Instant::now();
    let stats = Arc::new(ProcessingStats::new());

    let ctx = Arc::new(PopulationContext {
        grid: config.grid,
        search,
        writer: CacheWriter::new(Arc::clone(&store)),
        limiter: request_limiter,
        retry: config.retry,
        radius: config.radius.clone(),
        stats: Arc::clone(&stats),
        cancel: cancel.clone(),
    });

    let band_count = bands.len();
    let mut tasks = FuturesUnordered::new();
    for band in bands {
        tasks.push(tokio::spawn(sweep_band(
            band,
            Arc::clone(&semaphore),
            Arc::clone(&ctx),
        )));
    }

    let logging_cancel = CancellationToken::new();
    let cancel_logging = logging_cancel.child_token();
    let stats_for_logging = Arc::clone(&stats);
    let logging_task = tokio::task::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(LOGGING_INTERVAL));
        // The first tick completes immediately.
        interval.tick().await;
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    log_progress(start_time, &stats_for_logging, total_coordinates);
                }
                _ = cancel_logging.cancelled() => {
                    break;
                }
            }
        }
    });

    let mut failed_bands = 0;
    while let Some(task_result) = tasks.next().await {
        if let Err(join_error) = task_result {
            failed_bands += 1;
            warn!("Band task panicked: {:?}", join_error);
        }
    }
    if failed_bands > 0 {
        // A panicked band never visits the rest of its rows.
        let unaccounted = total_coordinates.saturating_sub(stats.processed() as u64);
        warn!("{unaccounted} coordinate(s) left unvisited by {failed_bands} panicked band(s)");
        stats.record_failures(ErrorType::BandAborted, unaccounted as usize);
    }

    shutdown_gracefully(logging_cancel, Some(logging_task), rate_limiter_shutdown).await;

    if let Err(e) = store.flush().await {
        warn!("Failed to flush cache store (this is non-critical): {}", error_chain(&e));
    }

    log_progress(start_time, &stats, total_coordinates);
    if cancel.is_cancelled() {
        warn!("Population run was cancelled before every coordinate was resolved");
    }

    let elapsed_seconds = start_time.elapsed().as_secs_f64();
    print_error_statistics(&stats);
    print_run_summary(total_coordinates, &stats, elapsed_seconds);

    Ok(PopulationReport {
        bands: band_count,
        failed_bands,
        total_coordinates,
        stored: stats.stored(),
        skipped: stats.skipped(),
        elapsed_seconds,
    })
}

/// Builds the search client and cache store described by `config`, then runs
/// the population.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or a shared resource
/// (HTTP client, cache store) cannot be created.
pub async fn populate_from_config(
    config: Config,
    cancel: CancellationToken,
) -> Result<PopulationReport> {
    config.validate().context("Invalid population configuration")?;

    let search: Arc<dyn GeoSearch> =
        init_search(&config.search).context("Failed to initialize search client")?;
    let store = init_cache_store(&config.cache)
        .await
        .context("Failed to initialize cache store")?;

    run_population(&config, search, store, cancel).await
}
