//! Processing statistics tracking.
//!
//! This module provides thread-safe counters for the outcome of every grid
//! coordinate visited during a population run.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::ErrorType;

/// Thread-safe processing statistics tracker.
///
/// Tracks stored points and per-category failures using atomic counters,
/// allowing concurrent access from every band task. All categories are
/// initialized to zero on creation.
///
/// # Thread Safety
///
/// This struct is thread-safe and can be shared across multiple tasks using `Arc`.
pub struct ProcessingStats {
    processed: AtomicUsize,
    stored: AtomicUsize,
    errors: HashMap<ErrorType, AtomicUsize>,
}

impl ProcessingStats {
    pub fn new() -> Self {
        let mut errors = HashMap::new();
        for error in ErrorType::iter() {
            errors.insert(error, AtomicUsize::new(0));
        }

        ProcessingStats {
            processed: AtomicUsize::new(0),
            stored: AtomicUsize::new(0),
            errors,
        }
    }

    /// Records a coordinate whose point was written to the cache.
    pub fn record_stored(&self) {
        self.stored.fetch_add(1, Ordering::Relaxed);
        self.processed.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a coordinate that was skipped because of `error`.
    pub fn record_failure(&self, error: ErrorType) {
        self.record_failures(error, 1);
    }

    /// Records `count` coordinates skipped because of `error`.
    pub fn record_failures(&self, error: ErrorType, count: usize) {
        if let Some(counter) = self.errors.get(&error) {
            counter.fetch_add(count, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment error counter for {:?} which is not in the map. \
                 This indicates a bug in ProcessingStats initialization.",
                error
            );
        }
        self.processed.fetch_add(count, Ordering::Relaxed);
    }

    /// Get the count for an error type.
    pub fn get_error_count(&self, error: ErrorType) -> usize {
        self.errors
            .get(&error)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Coordinates visited so far, stored or skipped.
    pub fn processed(&self) -> usize {
        self.processed.load(Ordering::SeqCst)
    }

    /// Coordinates whose point reached the cache.
    pub fn stored(&self) -> usize {
        self.stored.load(Ordering::SeqCst)
    }

    /// Coordinates skipped for any reason.
    pub fn skipped(&self) -> usize {
        self.errors.values().map(|c| c.load(Ordering::SeqCst)).sum()
    }
}

impl Default for ProcessingStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_processing_stats_initialization() {
        let stats = ProcessingStats::new();
        for error_type in ErrorType::iter() {
            assert_eq!(stats.get_error_count(error_type), 0);
        }
        assert_eq!(stats.processed(), 0);
        assert_eq!(stats.stored(), 0);
        assert_eq!(stats.skipped(), 0);
    }

    #[test]
    fn test_record_failures_in_bulk() {
        let stats = ProcessingStats::new();
        stats.record_stored();
        stats.record_failures(ErrorType::BandAborted, 5);
        stats.record_failures(ErrorType::Cancelled, 0);

        assert_eq!(stats.get_error_count(ErrorType::BandAborted), 5);
        assert_eq!(stats.get_error_count(ErrorType::Cancelled), 0);
        assert_eq!(stats.skipped(), 5);
        assert_eq!(stats.processed(), 6);
    }

    #[test]
    fn test_processing_stats_counts() {
        let stats = ProcessingStats::new();
        stats.record_stored();
        stats.record_failure(ErrorType::NoMatch);
        stats.record_failure(ErrorType::NoMatch);
        stats.record_failure(ErrorType::Store);

        assert_eq!(stats.stored(), 1);
        assert_eq!(stats.get_error_count(ErrorType::NoMatch), 2);
        assert_eq!(stats.get_error_count(ErrorType::Store), 1);
        assert_eq!(stats.get_error_count(ErrorType::Transport), 0);
        assert_eq!(stats.skipped(), 3);
        assert_eq!(stats.processed(), 4);
    }

    #[tokio::test]
    async fn test_processing_stats_concurrent_updates() {
        let stats = Arc::new(ProcessingStats::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let stats = Arc::clone(&stats);
            handles.push(tokio::spawn(async move {
                for _ in 0..100 {
                    stats.record_stored();
                    stats.record_failure(ErrorType::Transport);
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(stats.stored(), 800);
        assert_eq!(stats.get_error_count(ErrorType::Transport), 800);
        assert_eq!(stats.processed(), 1600);
    }
}
