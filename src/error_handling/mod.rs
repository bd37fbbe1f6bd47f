//! Error handling and processing statistics.
//!
//! This module provides:
//! - Typed errors for configuration, lookups, cache writes and point queries
//! - `ErrorType` categories for per-coordinate failures
//! - Thread-safe counters for run outcomes
//!
//! No per-coordinate error ever aborts a band or the run; only
//! `ConfigError` and `InitializationError` stop a run before it starts.

mod stats;
mod types;

// Re-export public API
pub use stats::ProcessingStats;
pub use types::{
    error_chain, CacheWriteError, Cancelled, ConfigError, ErrorType, InitializationError, LookupError, QueryError,
    StoreError, TransportError,
};
