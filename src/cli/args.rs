//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

fn crf_in_range(s: &str) -> Result<u8, String> {
    clap_num::number_range(s, 0, 51)
}

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Input video file; repeat to merge several, order is concatenation order
    #[arg(short, long)]
    pub input: Vec<PathBuf>,

    /// Add every video file found directly in this directory
    #[arg(long)]
    pub input_dir: Option<PathBuf>,

    /// Delete range as VIDEO:START-END, VIDEO is the 1-based input number,
    /// times are HH:MM:SS, MM:SS, or seconds; repeatable
    #[arg(short, long)]
    pub delete: Vec<String>,

    /// Output file path
    #[arg(short, long)]
    pub output: PathBuf,

    /// Parent directory for the temporary working directory
    #[arg(long)]
    pub work_dir: Option<PathBuf>,

    /// Keep temporary segment files instead of removing them
    #[arg(long)]
    pub keep_temp: bool,

    /// Constant Rate Factor (0-51) when re-encoding
    #[arg(long, value_parser = crf_in_range)]
    pub crf: Option<u8>,

    /// Encoding preset when re-encoding
    #[arg(long)]
    pub preset: Option<String>,

    /// Target frame rate when re-encoding
    #[arg(long)]
    pub fps: Option<u32>,
}

/// Arguments for the clip command
#[derive(Args, Debug)]
pub struct ClipArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Start time (HH:MM:SS, MM:SS, or seconds)
    #[arg(short, long)]
    pub start: String,

    /// End time (HH:MM:SS, MM:SS, or seconds)
    #[arg(short, long)]
    pub end: String,

    /// Output file path (default: auto-generated next to the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
