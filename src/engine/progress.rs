//! Progress events and ffmpeg output scanning

use regex::Regex;

/// Event stream of a running export.
///
/// Progress and messages arrive in execution order; `Finished` is emitted
/// exactly once per export, strictly after everything else.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportEvent {
    /// Overall completion ratio in `[0, 1]`, monotonically non-decreasing
    Progress(f64),
    /// Diagnostic line, usually forwarded tool output
    Message(String),
    /// Terminal outcome with a human-readable reason
    Finished { success: bool, message: String },
}

/// Scanner for the `time=HH:MM:SS.frac` stamps ffmpeg prints while encoding
#[derive(Debug, Clone)]
pub struct TimePattern {
    pattern: Regex,
}

impl TimePattern {
    pub fn new() -> Self {
        Self {
            // Matches time=00:01:23.45
            pattern: Regex::new(r"time=(\d+):(\d+):(\d+\.\d+)").expect("static pattern"),
        }
    }

    /// Extract a completion ratio from one output line.
    ///
    /// Returns `None` for lines without a timestamp. Ratios are clamped to
    /// `[0, 1]` and computed against `max(1, expected_duration)` so a zero
    /// expectation cannot divide by zero.
    pub fn parse_ratio(&self, line: &str, expected_duration: u64) -> Option<f64> {
        let caps = self.pattern.captures(line)?;
        let hours: f64 = caps[1].parse().ok()?;
        let minutes: f64 = caps[2].parse().ok()?;
        let seconds: f64 = caps[3].parse().ok()?;
        let elapsed = hours * 3600.0 + minutes * 60.0 + seconds;
        let ratio = elapsed / (expected_duration.max(1) as f64);
        Some(ratio.clamp(0.0, 1.0))
    }
}

impl Default for TimePattern {
    fn default() -> Self {
        Self::new()
    }
}

/// Accumulates whole-step completions into an overall ratio
#[derive(Debug, Clone)]
pub struct WeightedProgress {
    total: f64,
    completed: f64,
}

impl WeightedProgress {
    /// Create an accumulator over the given total weight
    pub fn new(total: f64) -> Self {
        Self {
            total: if total > 0.0 { total } else { 1.0 },
            completed: 0.0,
        }
    }

    /// Record one finished step and return the new overall ratio
    pub fn advance(&mut self, weight: f64) -> f64 {
        self.completed += weight;
        self.ratio()
    }

    /// Current overall ratio, clamped to `[0, 1]`
    pub fn ratio(&self) -> f64 {
        (self.completed / self.total).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ratio_matches_timestamp() {
        let pattern = TimePattern::new();
        let line = "frame=  240 fps= 60 q=28.0 size=     512kB time=00:00:05.00 bitrate= 838.9kbits/s";
        assert_eq!(pattern.parse_ratio(line, 10), Some(0.5));
    }

    #[test]
    fn test_parse_ratio_ignores_other_lines() {
        let pattern = TimePattern::new();
        assert_eq!(pattern.parse_ratio("Press [q] to stop", 10), None);
        assert_eq!(pattern.parse_ratio("time=bogus", 10), None);
    }

    #[test]
    fn test_parse_ratio_clamps_to_one() {
        let pattern = TimePattern::new();
        let line = "time=00:01:00.00";
        assert_eq!(pattern.parse_ratio(line, 30), Some(1.0));
    }

    #[test]
    fn test_parse_ratio_handles_zero_expectation() {
        let pattern = TimePattern::new();
        assert_eq!(pattern.parse_ratio("time=00:00:00.50", 0), Some(0.5));
    }

    #[test]
    fn test_parse_ratio_with_hours() {
        let pattern = TimePattern::new();
        let ratio = pattern.parse_ratio("time=01:30:00.00", 7200).unwrap();
        assert!((ratio - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_weighted_progress_accumulates() {
        let mut progress = WeightedProgress::new(21.0);
        assert!((progress.advance(10.0) - 10.0 / 21.0).abs() < 1e-9);
        assert!((progress.advance(10.0) - 20.0 / 21.0).abs() < 1e-9);
        assert_eq!(progress.advance(1.0), 1.0);
    }

    #[test]
    fn test_weighted_progress_zero_total() {
        let mut progress = WeightedProgress::new(0.0);
        assert_eq!(progress.ratio(), 0.0);
        assert_eq!(progress.advance(2.0), 1.0);
    }
}
