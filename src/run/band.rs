//! Band workers.

use std::sync::Arc;
use std::time::Instant;

use log::{info, warn};
use tokio::sync::Semaphore;

use crate::grid::Band;

use super::resources::PopulationContext;
use super::task::process_coordinate;

/// Sweeps every coordinate of `band` in latitude-then-longitude order.
///
/// The band waits for a slot on `semaphore` before its first lookup and holds
/// it until the sweep ends. On cancellation the remaining coordinates are
/// counted as cancelled without any lookups.
pub async fn sweep_band(band: Band, semaphore: Arc<Semaphore>, ctx: Arc<PopulationContext>) {
    let _permit = tokio::select! {
        biased;
        _ = ctx.cancel.cancelled() => None,
        permit = semaphore.acquire_owned() => match permit {
            Ok(permit) => Some(permit),
            Err(_) => {
                warn!("Semaphore closed, {band} runs without a slot");
                None
            }
        },
    };

    let start = Instant::now();
    info!("Starting {band}");

    for coordinate in band.coordinates(&ctx.grid) {
        process_coordinate(coordinate, &ctx).await;
    }

    info!(
        "Finished {band} ({} rows) in {:.1}s",
        band.rows(),
        start.elapsed().as_secs_f64()
    );
}
