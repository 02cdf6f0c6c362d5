//! ffprobe-backed media inspection

use std::path::Path;
use std::process::Stdio;

use serde::Deserialize;
use tokio::process::Command;
use tracing::{info, warn};

use crate::probe::MediaInfo;

/// Top-level shape of `ffprobe -of json` output
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    format: FfprobeFormat,
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Default, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    width: Option<u32>,
    height: Option<u32>,
}

/// Media inspector shelling out to ffprobe
#[derive(Debug, Clone)]
pub struct MediaInspector {
    ffprobe_path: String,
}

impl MediaInspector {
    /// Create an inspector using the given ffprobe binary
    pub fn new(ffprobe_path: impl Into<String>) -> Self {
        Self {
            ffprobe_path: ffprobe_path.into(),
        }
    }

    /// Probe duration and geometry of the first video stream.
    ///
    /// Any failure (missing binary, nonzero exit, malformed JSON) degrades to
    /// `MediaInfo::unknown()`; callers treat a zero duration as "timeline
    /// unknown" and disable range editing for that file.
    pub async fn probe(&self, path: &Path) -> MediaInfo {
        let output = Command::new(&self.ffprobe_path)
            .arg("-v")
            .arg("error")
            .arg("-select_streams")
            .arg("v:0")
            .arg("-show_entries")
            .arg("stream=width,height")
            .arg("-show_entries")
            .arg("format=duration")
            .arg("-of")
            .arg("json")
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .await;

        let output = match output {
            Ok(output) if output.status.success() => output,
            Ok(output) => {
                warn!(
                    "ffprobe failed for {}: {}",
                    path.display(),
                    String::from_utf8_lossy(&output.stderr).trim()
                );
                return MediaInfo::unknown();
            }
            Err(e) => {
                warn!("could not run {}: {}", self.ffprobe_path, e);
                return MediaInfo::unknown();
            }
        };

        let parsed: FfprobeOutput = match serde_json::from_slice(&output.stdout) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("unreadable ffprobe output for {}: {}", path.display(), e);
                return MediaInfo::unknown();
            }
        };

        let duration = parsed
            .format
            .duration
            .as_deref()
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .map(|secs| (secs + 0.5).max(0.0) as u64)
            .unwrap_or(0);

        let (width, height) = parsed
            .streams
            .first()
            .map(|s| (s.width, s.height))
            .unwrap_or((None, None));

        info!(
            "probed {}: duration={}s resolution={:?}x{:?}",
            path.display(),
            duration,
            width,
            height
        );

        MediaInfo {
            duration,
            width,
            height,
        }
    }
}
