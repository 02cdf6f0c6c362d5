// Domain models - Core types and data structures

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ExportError, ExportResult};
use crate::utils::time::format_hms;

/// A half-open time interval in whole seconds, ordered by (start, end)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: u64,
    pub end: u64,
}

impl TimeRange {
    /// Create a new time range; callers are expected to validate ordering
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// Range length in seconds, floored at zero
    pub fn duration(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", format_hms(self.start), format_hms(self.end))
    }
}

/// One video in the project playlist, with the ranges marked for deletion
#[derive(Debug, Clone)]
pub struct VideoItem {
    pub path: PathBuf,
    /// Total duration in seconds; 0 means the timeline is unknown
    pub duration: u64,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub delete_ranges: Vec<TimeRange>,
}

impl VideoItem {
    /// Create a video with unknown metadata
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            duration: 0,
            width: None,
            height: None,
            delete_ranges: Vec::new(),
        }
    }

    /// Create a video with probed metadata
    pub fn with_metadata(
        path: PathBuf,
        duration: u64,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Self {
        Self {
            path,
            duration,
            width,
            height,
            delete_ranges: Vec::new(),
        }
    }

    /// Sort, clip to `[0, duration]`, and coalesce the delete ranges.
    ///
    /// Touching or overlapping ranges are merged; ranges that are empty after
    /// clipping are dropped. With an unknown duration no deletion is
    /// meaningful, so the list is forced empty. Idempotent.
    pub fn normalize(&mut self) {
        if self.duration == 0 {
            self.delete_ranges.clear();
            return;
        }

        self.delete_ranges.sort();
        let mut cleaned: Vec<TimeRange> = Vec::with_capacity(self.delete_ranges.len());
        for range in &self.delete_ranges {
            let start = range.start.min(self.duration);
            let end = range.end.min(self.duration);
            if end <= start {
                continue;
            }
            match cleaned.last_mut() {
                Some(last) if start <= last.end => last.end = last.end.max(end),
                _ => cleaned.push(TimeRange::new(start, end)),
            }
        }
        self.delete_ranges = cleaned;
    }

    /// Complement of the delete ranges over `[0, duration]`.
    ///
    /// Segments come back ordered, disjoint, and with positive duration;
    /// together with the delete ranges they reconstruct the full timeline.
    pub fn keep_segments(&mut self) -> Vec<TimeRange> {
        self.normalize();
        if self.duration == 0 {
            return Vec::new();
        }

        let mut result = Vec::new();
        let mut cursor = 0u64;
        for range in &self.delete_ranges {
            if range.start > cursor {
                result.push(TimeRange::new(cursor, range.start));
            }
            cursor = cursor.max(range.end);
        }
        if cursor < self.duration {
            result.push(TimeRange::new(cursor, self.duration));
        }
        result
    }

    /// Seconds of material marked for deletion, after normalization
    pub fn total_removed(&mut self) -> u64 {
        self.normalize();
        self.delete_ranges.iter().map(|r| r.duration()).sum()
    }

    /// Seconds of material that survive the delete ranges
    pub fn total_kept(&mut self) -> u64 {
        self.duration.saturating_sub(self.total_removed())
    }

    /// Register a new delete range.
    ///
    /// An inverted range is rejected here rather than clamped: it can only
    /// come from explicit user input, and silently repairing it would hide
    /// the mistake. Out-of-bounds endpoints are fine and get clipped.
    pub fn add_delete_range(&mut self, start: u64, end: u64) -> ExportResult<()> {
        if end <= start {
            return Err(ExportError::InvalidRange { start, end });
        }
        self.delete_ranges.push(TimeRange::new(start, end));
        self.normalize();
        Ok(())
    }

    /// Remove the delete range at `index`; returns false when out of bounds
    pub fn remove_delete_range(&mut self, index: usize) -> bool {
        if index >= self.delete_ranges.len() {
            return false;
        }
        self.delete_ranges.remove(index);
        self.normalize();
        true
    }

    /// Drop every delete range
    pub fn clear_delete_ranges(&mut self) {
        self.delete_ranges.clear();
    }
}

/// An ordered playlist of videos plus the merge destination.
///
/// Playlist order is concatenation order in the exported file.
#[derive(Debug, Clone, Default)]
pub struct Project {
    pub videos: Vec<VideoItem>,
    pub output_path: Option<PathBuf>,
}

impl Project {
    /// Create an empty project
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a video to the playlist
    pub fn add_video(&mut self, video: VideoItem) {
        self.videos.push(video);
    }

    /// Remove the video at `index`, returning it when in bounds
    pub fn remove_video(&mut self, index: usize) -> Option<VideoItem> {
        if index >= self.videos.len() {
            return None;
        }
        Some(self.videos.remove(index))
    }

    /// Swap the video at `index` with its predecessor
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.videos.len() {
            return false;
        }
        self.videos.swap(index - 1, index);
        true
    }

    /// Swap the video at `index` with its successor
    pub fn move_down(&mut self, index: usize) -> bool {
        if index + 1 >= self.videos.len() {
            return false;
        }
        self.videos.swap(index, index + 1);
        true
    }

    /// Seconds of kept material summed across the whole playlist
    pub fn total_kept_duration(&mut self) -> u64 {
        self.videos.iter_mut().map(|v| v.total_kept()).sum()
    }
}

#[cfg(test)]
mod tests;
