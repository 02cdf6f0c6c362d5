//! Configuration loading and defaults
//!
//! Precedence follows defaults < config file < environment variables; CLI
//! flags override individual fields on top of the loaded configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ExportError, ExportResult};

/// Candidate configuration file locations, first hit wins
const CONFIG_PATHS: &[&str] = &["trimmerge.toml", "config/trimmerge.toml"];

/// Paths of the external tool binaries
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolPaths {
    pub ffmpeg: String,
    pub ffprobe: String,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
        }
    }
}

/// Encoding parameters applied when segments must be re-encoded
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeSettings {
    /// Video codec for unified segments
    pub video_codec: String,
    /// Encoding preset
    pub preset: String,
    /// Constant Rate Factor (0-51)
    pub crf: u8,
    /// Audio codec for unified segments
    pub audio_codec: String,
    /// Audio sample rate in Hz
    pub audio_rate: u32,
    /// Audio channel count
    pub audio_channels: u32,
    /// Audio bitrate, ffmpeg syntax
    pub audio_bitrate: String,
    /// Target frame rate for unified segments
    pub fps: u32,
    /// Fallback geometry when no input reports a resolution
    pub fallback_width: u32,
    pub fallback_height: u32,
    /// Encoder thread count; None lets ffmpeg decide
    pub threads: Option<usize>,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            preset: "veryfast".to_string(),
            crf: 20,
            audio_codec: "aac".to_string(),
            audio_rate: 48_000,
            audio_channels: 2,
            audio_bitrate: "192k".to_string(),
            fps: 30,
            fallback_width: 1280,
            fallback_height: 720,
            threads: Some(num_cpus::get()),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tools: ToolPaths,
    pub encode: EncodeSettings,
}

impl AppConfig {
    /// Load configuration: defaults, then the first config file found, then
    /// environment overrides
    pub fn load() -> ExportResult<Self> {
        let mut config = Self::default();

        for path in CONFIG_PATHS {
            if Path::new(path).exists() {
                info!("Loading configuration from {}", path);
                let raw = std::fs::read_to_string(path)?;
                config = toml::from_str(&raw).map_err(|e| ExportError::ConfigError {
                    message: format!("{}: {}", path, e),
                })?;
                break;
            }
        }

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply TRIMMERGE_* environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(ffmpeg) = std::env::var("TRIMMERGE_FFMPEG") {
            info!("Environment override: ffmpeg = {}", ffmpeg);
            self.tools.ffmpeg = ffmpeg;
        }
        if let Ok(ffprobe) = std::env::var("TRIMMERGE_FFPROBE") {
            info!("Environment override: ffprobe = {}", ffprobe);
            self.tools.ffprobe = ffprobe;
        }
    }
}
