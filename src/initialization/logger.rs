//! Logger initialization.
//!
//! This module provides functions to initialize the logger with custom formatting.

use std::io::Write;

use crate::config::LogFormat;
use crate::error_handling::InitializationError;
use colored::*;
use log::LevelFilter;

/// Initializes the logger with the specified level and format.
///
/// Configures `env_logger` with custom formatting. Supports both plain text
/// (with colors) and JSON formats for structured logging.
///
/// Filters are layered: the crate defaults first (`level`, or `info`, with
/// chatty dependencies held at `info` or quieter), then `RUST_LOG`, then an
/// explicit `level` for this crate. A `RUST_LOG` directive therefore wins over
/// the defaults, and only `--log-level` wins over `RUST_LOG`.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already installed.
///
/// # Examples
///
/// ```bash
/// # Per-module filtering via RUST_LOG
/// RUST_LOG=geo_cache=debug,reqwest=debug geo_cache populate ...
/// ```
pub fn init_logger_with(
    level: Option<LevelFilter>,
    format: LogFormat,
) -> Result<(), InitializationError> {
    colored::control::set_override(true);

    let rust_log = std::env::var("RUST_LOG").ok();
    let mut builder = filter_builder(level, rust_log.as_deref());

    match format {
        LogFormat::Json => {
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{{\"ts\":{},\"level\":\"{}\",\"target\":\"{}\",\"msg\":{}}}",
                    chrono::Utc::now().timestamp_millis(),
                    record.level(),
                    record.target(),
                    serde_json::to_string(&record.args().to_string())
                        .unwrap_or_else(|_| "\"\"".into())
                )
            });
        }
        LogFormat::Plain => {
            builder.format(|buf, record| {
                let level = record.level();
                let colored_level = match level {
                    log::Level::Error => level.to_string().red(),
                    log::Level::Warn => level.to_string().yellow(),
                    log::Level::Info => level.to_string().green(),
                    log::Level::Debug => level.to_string().blue(),
                    log::Level::Trace => level.to_string().purple(),
                };

                let glyph = match level {
                    log::Level::Error => "✗",
                    log::Level::Warn => "!",
                    log::Level::Info => "✓",
                    log::Level::Debug => "·",
                    log::Level::Trace => "…",
                };

                writeln!(
                    buf,
                    "{} {} [{}] {}",
                    glyph,
                    record.target().cyan(),
                    colored_level,
                    record.args()
                )
            });
        }
    }

    // try_init: tests may initialize more than once per process
    builder.try_init().map_err(InitializationError::from)?;

    Ok(())
}

/// Builds the level filters for `init_logger_with`.
fn filter_builder(level: Option<LevelFilter>, rust_log: Option<&str>) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level.unwrap_or(LevelFilter::Info));
    builder.filter_module("reqwest", LevelFilter::Info);
    builder.filter_module("hyper", LevelFilter::Info);
    builder.filter_module("hyper_util", LevelFilter::Info);
    builder.filter_module("sqlx", LevelFilter::Warn);
    builder.filter_module("redis", LevelFilter::Info);

    if let Some(spec) = rust_log {
        builder.parse_filters(spec);
    }
    if let Some(level) = level {
        builder.filter_module("geo_cache", level);
    }
    builder
}
