//! Progress logging utilities.

use log::info;

use crate::error_handling::ProcessingStats;

/// Logs how many coordinates have been visited and stored so far.
///
/// # Arguments
///
/// * `start_time` - The start time of the run
/// * `stats` - Shared per-coordinate counters
/// * `total` - Total coordinates in the grid
pub fn log_progress(start_time: std::time::Instant, stats: &ProcessingStats, total: u64) {
    let elapsed_secs = start_time.elapsed().as_secs_f64();
    let processed = stats.processed();
    let rate = if elapsed_secs > 0.0 {
        processed as f64 / elapsed_secs
    } else {
        0.0
    };
    let percent = if total > 0 {
        processed as f64 * 100.0 / total as f64
    } else {
        100.0
    };
    info!(
        "Processed {}/{} coordinates ({:.1}%), {} stored, in {:.2} seconds (~{:.2} coords/sec)",
        processed,
        total,
        percent,
        stats.stored(),
        elapsed_secs,
        rate
    );
}
