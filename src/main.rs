//! TrimMerge CLI
//!
//! Mark time ranges for deletion across one or more videos and export a
//! single merged file of everything that remains.
//!
//! # Usage
//!
//! ```bash
//! trimmerge export --input a.mp4 --input b.mp4 --delete 1:10-20 --output merged.mp4
//! trimmerge clip --input video.mp4 --start 00:01:00 --end 00:02:00
//! trimmerge inspect --input video.mp4
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use trimmerge::cli::{commands, Cli, Commands};
use trimmerge::config::AppConfig;

/// Main entry point for the TrimMerge CLI application
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --log-level; progress goes to stdout, logs to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::load()?;

    match cli.command {
        Commands::Export(args) => commands::export(args, config).await,
        Commands::Clip(args) => commands::clip(args, config).await,
        Commands::Inspect(args) => commands::inspect(args, config).await,
    }
}
