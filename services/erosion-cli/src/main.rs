//! Soil-erosion and runoff-sensitivity batch runner.
//!
//! One-shot execution: loads a YAML run configuration, aligns the input
//! rasters onto their common grid, evaluates the configured per-pixel
//! formula in parallel chunks and writes the output rasters. Logs go to
//! stdout and to a run-scoped `log_<timestamp>.txt` file.

mod config;
mod jobs;

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::RunConfig;

#[derive(Parser, Debug)]
#[command(name = "erosion-cli")]
#[command(about = "Batch soil-erosion and runoff-sensitivity raster computation")]
struct Args {
    /// Run configuration file
    #[arg(short, long)]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Directory receiving the run-scoped log file
    #[arg(long, default_value = ".")]
    log_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_path = args
        .log_dir
        .join(format!("log_{}.txt", Local::now().format("%Y%m%d_%H%M%S")));
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("cannot open log file {}", log_path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level.clone()));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(log_file)))
        .init();

    info!(
        config = %args.config.display(),
        log_file = %log_path.display(),
        "starting erosion batch run"
    );

    let config = RunConfig::load(&args.config)?;
    jobs::run(config).await?;

    info!("run complete");
    Ok(())
}
