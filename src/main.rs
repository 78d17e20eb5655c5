//! lakehouse-access: a CLI for planning lakehouse table processing runs.
//!
//! Loads a YAML configuration, connects to storage, and prints the set of
//! input files that still need processing together with their size profile.

use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use lakehouse_access::error::LakehouseError;
use lakehouse_access::{Config, DataAccessLakeHouse};
use snafu::prelude::*;

/// Lakehouse file-selection planner.
#[derive(Parser, Debug)]
#[command(name = "lakehouse-access")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file.
    #[arg(short, long)]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Dry run - validate configuration without listing files.
    #[arg(long)]
    dry_run: bool,
}

#[snafu::report]
#[tokio::main]
async fn main() -> Result<(), LakehouseError> {
    let args = Args::parse();

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("lakehouse-access starting");

    let config = Config::from_file(&args.config)
        .context(lakehouse_access::error::ConfigSnafu)?;

    if args.dry_run {
        info!("Dry run mode - validating configuration");
        config
            .validate()
            .context(lakehouse_access::error::ConfigSnafu)?;
        info!("Storage: {}", config.storage.url);
        info!("Input table: {} at {}", config.input.name, config.input.root());
        info!(
            "Output table: {} at {}",
            config.output.name,
            config.output.root()
        );
        info!("Checkpoint: {}", config.checkpoint);
        if let Some(data_sets) = &config.data_sets {
            info!("Dataset subsets: {:?}", data_sets);
        }
        info!("Max files: {}", config.max_files);
        info!("Configuration is valid");
        return Ok(());
    }

    let access = DataAccessLakeHouse::new(config).await?;
    let (files, profile) = access.get_files_to_process().await?;

    info!("Files to process: {}", files.len());
    info!("  Max file size: {} MB", profile.max_file_size);
    info!("  Min file size: {} MB", profile.min_file_size);
    info!("  Total size: {} MB", profile.total_file_size);

    for file in &files {
        debug!("  {} ({:.3} MB)", file.path, file.size_mb);
    }

    Ok(())
}
