//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `geo_cache` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - Ctrl-C handling
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use log::warn;
use std::process;
use tokio_util::sync::CancellationToken;

use geo_cache::config::{Cli, Command, LookupArgs, PopulateArgs, NOT_FOUND_MESSAGE};
use geo_cache::initialization::{init_cache_store, init_logger_with};
use geo_cache::{lookup_location, populate_from_config};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    // This allows setting ELASTIC_URL and credentials without exporting them manually
    // Try loading from current directory first, then from the executable's directory
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let cli = Cli::parse();

    init_logger_with(cli.log_level.clone().map(Into::into), cli.log_format.clone())
        .context("Failed to initialize logger")?;

    let result = match cli.command {
        Command::Populate(args) => populate(args).await,
        Command::Lookup(args) => lookup(args).await,
    };

    if let Err(e) = result {
        eprintln!("geo_cache error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}

async fn populate(args: PopulateArgs) -> Result<()> {
    let config = args.into_config().context("Invalid grid bounds")?;

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after in-flight lookups");
            on_signal.cancel();
        }
    });

    let report = populate_from_config(config, cancel).await?;
    println!(
        "✅ Visited {} coordinate{} in {} band{} ({} stored, {} skipped) in {:.1}s",
        report.total_coordinates,
        if report.total_coordinates == 1 { "" } else { "s" },
        report.bands,
        if report.bands == 1 { "" } else { "s" },
        report.stored,
        report.skipped,
        report.elapsed_seconds
    );
    Ok(())
}

async fn lookup(args: LookupArgs) -> Result<()> {
    let store = init_cache_store(&args.cache.into())
        .await
        .context("Failed to open cache store")?;

    match lookup_location(store.as_ref(), args.latitude, args.longitude).await? {
        Some(point) => println!("{}", serde_json::to_string_pretty(&point)?),
        None => println!("{NOT_FOUND_MESSAGE}"),
    }
    Ok(())
}
