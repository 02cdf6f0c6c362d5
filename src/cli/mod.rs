//! CLI module for TrimMerge
//!
//! This module handles command-line argument parsing and command execution.

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

/// TrimMerge
///
/// Mark time ranges to delete across one or more videos and merge everything
/// that remains into a single output file, driven by an external ffmpeg.
#[derive(Parser)]
#[command(name = "trimmerge")]
#[command(about = "TrimMerge - cut marked ranges out of videos and merge the rest")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level when RUST_LOG is not set
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Delete marked ranges from the inputs and merge the rest
    Export(args::ExportArgs),
    /// Extract a single time window from one video (stream copy)
    Clip(args::ClipArgs),
    /// Inspect duration and geometry of a video file
    Inspect(args::InspectArgs),
}
