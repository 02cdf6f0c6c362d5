//! Time parsing and formatting utilities

use crate::error::{ExportError, ExportResult};

/// Format whole seconds as HH:MM:SS
pub fn format_hms(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Parse a time string in HH:MM:SS, MM:SS, or plain-seconds form.
///
/// Endpoints here come from command-line flags, so unlike delete-range
/// normalization this rejects malformed input instead of clamping it.
pub fn parse_time(time_str: &str) -> ExportResult<u64> {
    let time_str = time_str.trim();

    if let Ok(seconds) = time_str.parse::<u64>() {
        return Ok(seconds);
    }

    let parts: Vec<&str> = time_str.split(':').collect();
    let parsed: Option<Vec<u64>> = parts.iter().map(|p| p.parse::<u64>().ok()).collect();
    let invalid = || ExportError::InvalidTimeFormat {
        time: time_str.to_string(),
    };

    match parsed.ok_or_else(invalid)?.as_slice() {
        [minutes, seconds] if *seconds < 60 => Ok(minutes * 60 + seconds),
        [hours, minutes, seconds] if *minutes < 60 && *seconds < 60 => {
            Ok(hours * 3600 + minutes * 60 + seconds)
        }
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_hms() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(59), "00:00:59");
        assert_eq!(format_hms(61), "00:01:01");
        assert_eq!(format_hms(3723), "01:02:03");
    }

    #[test]
    fn test_parse_time_seconds() {
        assert_eq!(parse_time("90").unwrap(), 90);
        assert_eq!(parse_time(" 0 ").unwrap(), 0);
    }

    #[test]
    fn test_parse_time_mm_ss() {
        assert_eq!(parse_time("2:30").unwrap(), 150);
        assert_eq!(parse_time("00:59").unwrap(), 59);
    }

    #[test]
    fn test_parse_time_hh_mm_ss() {
        assert_eq!(parse_time("1:02:03").unwrap(), 3723);
    }

    #[test]
    fn test_parse_time_invalid() {
        assert!(parse_time("abc").is_err());
        assert!(parse_time("1:60").is_err());
        assert!(parse_time("1:02:60").is_err());
        assert!(parse_time("1:2:3:4").is_err());
        assert!(parse_time("-5").is_err());
    }
}
