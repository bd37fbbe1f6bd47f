//! Retry policy for search lookups.

use std::time::Duration;

use tokio_retry::RetryIf;

use crate::error_handling::LookupError;

/// How many times a lookup is attempted and how long to wait between attempts.
///
/// The wait before attempt `n + 1` is `backoff_unit * n²`, so with the default
/// one-second unit and three attempts the delays are 1s and then 4s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first
    pub max_attempts: u32,
    pub backoff_unit: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff_unit: Duration) -> Self {
        Self {
            max_attempts,
            backoff_unit,
        }
    }

    /// Delays between consecutive attempts, one fewer than `max_attempts`.
    pub fn strategy(&self) -> impl Iterator<Item = Duration> {
        QuadraticBackoff::new(self.backoff_unit).take(self.max_attempts.saturating_sub(1) as usize)
    }
}

/// Yields `unit * 1`, `unit * 4`, `unit * 9`, ...
#[derive(Debug, Clone)]
pub struct QuadraticBackoff {
    unit: Duration,
    step: u32,
}

impl QuadraticBackoff {
    pub fn new(unit: Duration) -> Self {
        Self { unit, step: 0 }
    }
}

impl Iterator for QuadraticBackoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        self.step = self.step.saturating_add(1);
        let factor = self.step.saturating_mul(self.step);
        Some(self.unit.saturating_mul(factor))
    }
}

/// A lookup that failed for good, with the number of attempts it took.
#[derive(Debug)]
pub struct TerminalError {
    pub error: LookupError,
    pub attempts: u32,
}

/// Runs `action` until it succeeds, fails with a non-retriable error, or the
/// policy's attempts are used up.
///
/// `NoMatch` ends the loop immediately without sleeping; transport failures
/// are retried after the quadratic delay. The last error is returned with
/// the attempt count.
pub async fn attempt_with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    mut action: F,
) -> Result<T, TerminalError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, LookupError>>,
{
    let mut attempts = 0u32;
    let result = RetryIf::spawn(
        policy.strategy(),
        || {
            attempts += 1;
            action()
        },
        |e: &LookupError| e.is_retriable(),
    )
    .await;

    result.map_err(|error| TerminalError { error, attempts })
}
