//! Per-coordinate processing.
//!
//! Each coordinate goes through rate limiting, the retried lookup, and the
//! cache write. Every failure is recorded and skipped; nothing here can stop
//! the band.

use log::{debug, warn};

use crate::error_handling::{error_chain, ErrorType};
use crate::grid::Coordinate;
use crate::utils::{attempt_with_retry, TerminalError};

use super::resources::PopulationContext;

/// Resolve and cache one coordinate, recording the outcome in `ctx.stats`.
pub async fn process_coordinate(coordinate: Coordinate, ctx: &PopulationContext) {
    if ctx.cancel.is_cancelled() {
        ctx.stats.record_failure(ErrorType::Cancelled);
        return;
    }

    if let Some(ref limiter) = ctx.limiter {
        if limiter.acquire(&ctx.cancel).await.is_err() {
            ctx.stats.record_failure(ErrorType::Cancelled);
            return;
        }
    }

    let search = ctx.search.as_ref();
    let radius = ctx.radius.as_str();
    let lookup = attempt_with_retry(&ctx.retry, move || search.nearest(coordinate, radius));

    let result = tokio::select! {
        biased;
        _ = ctx.cancel.cancelled() => {
            debug!("Lookup for {coordinate} abandoned on shutdown");
            ctx.stats.record_failure(ErrorType::Cancelled);
            return;
        }
        result = lookup => result,
    };

    let point = match result {
        Ok(point) => point,
        Err(TerminalError { error, attempts }) => {
            if error.is_no_match() {
                debug!("No point within {radius} of {coordinate}");
            } else {
                warn!(
                    "Giving up on {coordinate} (radius {radius}) after {attempts} attempt{}: {}",
                    if attempts == 1 { "" } else { "s" },
                    error_chain(&error)
                );
            }
            ctx.stats.record_failure(ErrorType::from(&error));
            return;
        }
    };

    match ctx.writer.store(coordinate, &point).await {
        Ok(()) => ctx.stats.record_stored(),
        Err(e) => {
            warn!("Failed to cache point for {coordinate}: {}", error_chain(&e));
            ctx.stats.record_failure(ErrorType::from(&e));
        }
    }
}
