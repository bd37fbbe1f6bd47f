//! Rate limiter initialization.
//!
//! This module provides a token-bucket rate limiter shared by every band so
//! the aggregate lookup rate stays under the search backend's ceiling.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore as TokioSemaphore;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::config::RATE_LIMITER_MIN_TICK;
use crate::error_handling::Cancelled;

/// Token-bucket rate limiter for controlling request rate.
///
/// # Behavior
///
/// - The bucket starts full (`capacity` tokens)
/// - A background task adds tokens at `rps`, carrying fractional tokens
///   between ticks, and never fills the bucket beyond `capacity`
/// - Every `acquire` consumes one token for good
/// - The background task stops when the shutdown token is cancelled, after
///   which pending and future `acquire` calls fail
pub struct RateLimiter {
    permits: Arc<TokioSemaphore>,
    capacity: usize,
    rps: u32,
}

impl RateLimiter {
    /// Waits for a token, or for `cancel` to fire.
    ///
    /// # Errors
    ///
    /// Returns `Cancelled` if `cancel` fires first or the limiter was shut down.
    pub async fn acquire(&self, cancel: &CancellationToken) -> Result<(), Cancelled> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Cancelled),
            permit = self.permits.acquire() => match permit {
                Ok(permit) => {
                    permit.forget();
                    Ok(())
                }
                Err(_) => Err(Cancelled),
            },
        }
    }

    /// Tokens added per second.
    pub fn rps(&self) -> u32 {
        self.rps
    }

    /// Maximum tokens held at once.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Tokens currently available without waiting.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }
}

/// Highest sustained rate a bucket of `burst` tokens can deliver.
///
/// The refill task runs twice per token interval but no faster than
/// `RATE_LIMITER_MIN_TICK`, and a single refill can add at most `burst` tokens.
pub fn max_rate(burst: usize) -> u64 {
    let ticks_per_second =
        (Duration::from_secs(1).as_nanos() / RATE_LIMITER_MIN_TICK.as_nanos()) as u64;
    (burst.max(1) as u64).saturating_mul(ticks_per_second / 2)
}

/// Refill period: half a token interval, so a tick that fires late still
/// earns less than one whole token beyond what the bucket can take.
fn refill_tick(rps: u32) -> Duration {
    Duration::from_secs_f64(0.5 / f64::from(rps)).max(RATE_LIMITER_MIN_TICK)
}

/// Initializes a token-bucket rate limiter.
///
/// If `rps` is 0, rate limiting is disabled and `None` is returned. A `burst`
/// of 0 is treated as 1 so the bucket can ever hold a token.
///
/// The refill task ticks twice per token interval, but never more often than
/// once per `RATE_LIMITER_MIN_TICK`. The highest rate the bucket can deliver is
/// therefore `max_rate(burst)`, and `Config::validate` rejects anything above it.
///
/// Must be called from within a Tokio runtime; the refill task is spawned here.
///
/// # Returns
///
/// A tuple of `(RateLimiter, CancellationToken)` if rate limiting is enabled.
/// Cancelling the token stops the refill task and closes the limiter.
pub fn init_rate_limiter(rps: u32, burst: usize) -> Option<(Arc<RateLimiter>, CancellationToken)> {
    if rps == 0 {
        return None;
    }
    let capacity = burst.max(1);
    let shutdown = CancellationToken::new();
    let shutdown_clone = shutdown.clone();

    let limiter = Arc::new(RateLimiter {
        permits: Arc::new(TokioSemaphore::new(capacity)),
        capacity,
        rps,
    });

    let permits = Arc::clone(&limiter.permits);
    let mut ticker = interval(refill_tick(rps));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::spawn(async move {
        let mut last_time = tokio::time::Instant::now();
        let mut fractional_permits = 0.0f64;
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let now = tokio::time::Instant::now();
                    let earned = f64::from(rps) * now.duration_since(last_time).as_secs_f64()
                        + fractional_permits;
                    last_time = now;

                    // Truncation is intended: whole tokens now, the remainder carries over.
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    let whole = earned as usize;
                    fractional_permits = earned - whole as f64;

                    let room = capacity.saturating_sub(permits.available_permits());
                    if room == 0 || whole > room {
                        // Bucket full: anything beyond capacity is lost.
                        fractional_permits = 0.0;
                    }
                    let to_add = whole.min(room);
                    if to_add > 0 {
                        permits.add_permits(to_add);
                    }
                }
                _ = shutdown_clone.cancelled() => {
                    permits.close();
                    log::debug!("Rate limiter background task shutting down");
                    break;
                }
            }
        }
    });

    Some((limiter, shutdown))
}
