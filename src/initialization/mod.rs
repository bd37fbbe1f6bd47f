//! Application initialization and resource setup.
//!
//! This module provides functions to initialize all shared resources:
//! - HTTP client and search backend client
//! - Token-bucket rate limiter
//! - Cache store
//! - Logger
//!
//! All initialization functions return proper error types for error handling.

mod client;
mod logger;
mod rate_limiter;
mod store;

use std::sync::Arc;

use tokio::sync::Semaphore;

// Re-export public API
pub use client::{init_client, init_search};
pub use logger::init_logger_with;
pub use rate_limiter::{init_rate_limiter, max_rate, RateLimiter};
pub use store::init_cache_store;

/// Initializes a semaphore for controlling concurrency.
///
/// Creates a new semaphore with the specified permit count. This semaphore is used
/// to limit the number of bands issuing lookups at the same time.
///
/// # Arguments
///
/// * `count` - Maximum number of concurrent operations allowed
///
/// # Returns
///
/// An `Arc<Semaphore>` that can be shared across multiple tasks.
pub fn init_semaphore(count: usize) -> Arc<Semaphore> {
    Arc::new(Semaphore::new(count))
}
