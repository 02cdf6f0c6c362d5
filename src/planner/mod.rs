//! Export planning module
//!
//! Turns a project's keep segments into an ordered list of ffmpeg jobs plus
//! the manifest of temporary files the orchestrator must clean up.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::{EncodeSettings, ToolPaths};
use crate::domain::model::TimeRange;

pub mod strategy;

pub use strategy::PlanBuilder;

/// Unified geometry and frame rate shared by every transcoded segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetFormat {
    /// Target width in pixels
    pub width: u32,
    /// Target height in pixels
    pub height: u32,
    /// Target frame rate
    pub fps: u32,
}

impl TargetFormat {
    /// Video filter chain: scale to fit, pad centered, normalize SAR and
    /// pixel format, resample to the target frame rate
    pub fn filter_chain(&self) -> String {
        format!(
            "scale={w}:{h}:force_original_aspect_ratio=decrease,\
             pad={w}:{h}:(ow-iw)/2:(oh-ih)/2,setsar=1,format=yuv420p,fps={fps}",
            w = self.width,
            h = self.height,
            fps = self.fps
        )
    }
}

/// What a single export job does
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum JobKind {
    /// Lossless stream-copy extraction of one keep segment
    CopyExtract,
    /// Re-encoding extraction normalizing geometry, frame rate, and codecs
    TranscodeExtract {
        /// Shared target parameters
        target: TargetFormat,
    },
    /// Lossless concatenation of the finished segments via the concat demuxer
    Concat,
}

/// One externally-executed step of an export.
///
/// A typed descriptor rather than a rendered command line, so planning stays
/// testable without ffmpeg; `render` produces the argument vector at
/// invocation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportJob {
    pub kind: JobKind,
    /// Source video for extractions, concat list file for concatenation
    pub input: PathBuf,
    /// Temporary segment file for extractions, final destination for concat
    pub output: PathBuf,
    /// Source window for extractions
    pub window: Option<TimeRange>,
    /// Progress weight: kept seconds for extractions, nominal 1.0 for concat
    pub weight: f64,
}

impl ExportJob {
    /// Render the full command line (program first) for this job
    pub fn render(&self, tools: &ToolPaths, encode: &EncodeSettings) -> Vec<String> {
        let mut args: Vec<String> = vec![
            tools.ffmpeg.clone(),
            "-y".into(),
            "-hide_banner".into(),
            "-loglevel".into(),
            "error".into(),
        ];

        if let Some(window) = &self.window {
            args.push("-ss".into());
            args.push(window.start.to_string());
            args.push("-to".into());
            args.push(window.end.to_string());
        }

        match &self.kind {
            JobKind::CopyExtract => {
                args.push("-i".into());
                args.push(self.input.to_string_lossy().into_owned());
                args.push("-c".into());
                args.push("copy".into());
            }
            JobKind::TranscodeExtract { target } => {
                args.push("-i".into());
                args.push(self.input.to_string_lossy().into_owned());
                args.push("-vf".into());
                args.push(target.filter_chain());
                args.push("-c:v".into());
                args.push(encode.video_codec.clone());
                args.push("-preset".into());
                args.push(encode.preset.clone());
                args.push("-crf".into());
                args.push(encode.crf.to_string());
                if let Some(threads) = encode.threads {
                    args.push("-threads".into());
                    args.push(threads.to_string());
                }
                args.push("-c:a".into());
                args.push(encode.audio_codec.clone());
                args.push("-ar".into());
                args.push(encode.audio_rate.to_string());
                args.push("-ac".into());
                args.push(encode.audio_channels.to_string());
                args.push("-b:a".into());
                args.push(encode.audio_bitrate.clone());
            }
            JobKind::Concat => {
                args.push("-f".into());
                args.push("concat".into());
                args.push("-safe".into());
                args.push("0".into());
                args.push("-i".into());
                args.push(self.input.to_string_lossy().into_owned());
                args.push("-c".into());
                args.push("copy".into());
            }
        }

        args.push(self.output.to_string_lossy().into_owned());
        args
    }
}

/// The complete plan for one export request
#[derive(Debug, Clone)]
pub struct ExportPlan {
    /// Jobs in execution order; the concat job is always last
    pub jobs: Vec<ExportJob>,
    /// Working directory exclusively owned by this export
    pub work_dir: PathBuf,
    /// Temporary per-segment outputs, in concatenation order
    pub segment_outputs: Vec<PathBuf>,
    /// Concat demuxer list file
    pub list_file: PathBuf,
    /// Final destination
    pub destination: PathBuf,
}

impl ExportPlan {
    /// Every temporary file the orchestrator must remove afterwards
    pub fn cleanup_paths(&self) -> Vec<PathBuf> {
        let mut paths = self.segment_outputs.clone();
        paths.push(self.list_file.clone());
        paths
    }

    /// Sum of job weights, for progress normalization
    pub fn total_weight(&self) -> f64 {
        self.jobs.iter().map(|job| job.weight).sum()
    }
}
