//! Error handling module for TrimMerge

use thiserror::Error;

/// Main error type for TrimMerge operations
#[derive(Error, Debug)]
pub enum ExportError {
    /// External tool binary could not be found
    #[error("Tool not found: {tool}. Check that it is installed and on PATH")]
    ToolNotFound { tool: String },

    /// An export step exited with a nonzero code
    #[error("Step {step} failed (exit code {code})")]
    JobFailed { step: usize, code: i32 },

    /// The export was cancelled by the user
    #[error("Export cancelled")]
    Cancelled,

    /// Delete range validation error
    #[error("Invalid delete range: end ({end}) must be after start ({start})")]
    InvalidRange { start: u64, end: u64 },

    /// The export plan contains no work
    #[error("Nothing to export: every keep segment is empty")]
    EmptyPlan,

    /// A second export was requested while one is running
    #[error("An export is already running")]
    AlreadyRunning,

    /// Invalid time format
    #[error("Invalid time format: {time}. Expected HH:MM:SS, MM:SS, or seconds")]
    InvalidTimeFormat { time: String },

    /// Configuration file error
    #[error("Failed to load configuration: {message}")]
    ConfigError { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for TrimMerge operations
pub type ExportResult<T> = std::result::Result<T, ExportError>;
