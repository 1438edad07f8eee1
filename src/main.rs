//! Subfetch - Batch Video Organizer and Subtitle Downloader
//!
//! This is the main entry point for the subfetch application: it moves each
//! matching video in a directory into its own folder and downloads a
//! matching subtitle next to it.

use anyhow::Result;
use clap::Parser;
use tracing::{Level, info};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use subfetch::cli::Args;
use subfetch::config::{Config, MatchMode};
use subfetch::workflow::Workflow;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    setup_logging(args.verbose)?;

    // Load configuration
    let config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            // Try to load config.toml from current directory first
            if std::path::Path::new("config.toml").exists() {
                info!("Found config.toml in current directory, loading...");
                Config::from_file("config.toml")?
            } else {
                Config::default()
            }
        }
    };

    let mode = if args.substring_match {
        MatchMode::Substring
    } else {
        config.organize.match_mode
    };

    info!(
        "Organizing {} and fetching \"{}\" subtitles for *{} files",
        args.directory.display(),
        args.language,
        args.extension
    );

    let mut workflow = Workflow::new(config)?;
    let summary = workflow
        .run(&args.directory, &args.language, &args.extension, mode)
        .await?;

    println!(
        "Organized {} files: {} subtitles downloaded, {} without a match, {} failed",
        summary.organized, summary.downloaded, summary.missing, summary.failed
    );

    info!("Batch completed");
    Ok(())
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let log_dir = std::env::current_dir()?.join(".subfetch").join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "subfetch.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(guard);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    let console_layer = fmt::layer().with_target(false);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
