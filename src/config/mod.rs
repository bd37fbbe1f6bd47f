//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (defaults, limits)
//! - The library `Config` and its parts
//! - CLI option types and parsing

mod cli;
mod constants;
mod types;

pub use cli::{CacheArgs, Cli, Command, LookupArgs, PopulateArgs};
pub use constants::*;
pub use types::{CacheBackend, CacheConfig, Config, LogFormat, LogLevel, SearchConfig};
