//! Graceful shutdown handling.

use tokio_util::sync::CancellationToken;

/// Shuts down all background tasks gracefully.
///
/// Stops the progress logging task and waits for it, then stops the rate
/// limiter's refill task, which also releases anything still waiting on it.
pub async fn shutdown_gracefully(
    cancel: CancellationToken,
    logging_task: Option<tokio::task::JoinHandle<()>>,
    rate_limiter_shutdown: Option<CancellationToken>,
) {
    // Signal logging task to stop and await it
    cancel.cancel();
    if let Some(logging_task) = logging_task {
        let _ = logging_task.await;
    }

    if let Some(shutdown) = rate_limiter_shutdown {
        shutdown.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_shutdown_stops_logging_task_and_limiter() {
        let cancel = CancellationToken::new();
        let child = cancel.child_token();
        let logging_task = tokio::spawn(async move {
            child.cancelled().await;
        });
        let limiter_shutdown = CancellationToken::new();

        tokio::time::timeout(
            Duration::from_secs(1),
            shutdown_gracefully(cancel, Some(logging_task), Some(limiter_shutdown.clone())),
        )
        .await
        .expect("shutdown should not hang");

        assert!(limiter_shutdown.is_cancelled());
    }
}
