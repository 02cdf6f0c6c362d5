//! Media file inspection module

use serde::{Deserialize, Serialize};

pub mod inspector;

/// Media file information relevant to export planning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaInfo {
    /// Duration in whole seconds; 0 when unknown
    pub duration: u64,
    /// Width in pixels of the first video stream
    pub width: Option<u32>,
    /// Height in pixels of the first video stream
    pub height: Option<u32>,
}

impl MediaInfo {
    /// Sentinel value for files that could not be probed
    pub fn unknown() -> Self {
        Self {
            duration: 0,
            width: None,
            height: None,
        }
    }

    /// Whether the timeline is usable for range editing
    pub fn has_known_duration(&self) -> bool {
        self.duration > 0
    }
}
