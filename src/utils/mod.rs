//! Utility functions for lookups.
//!
//! This module provides:
//! - The quadratic retry policy shared by every band

mod retry;

pub use retry::{attempt_with_retry, QuadraticBackoff, RetryPolicy, TerminalError};
