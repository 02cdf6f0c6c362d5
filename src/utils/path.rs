//! Path helpers for playlist building and output placement

use std::path::{Path, PathBuf};

/// File extensions treated as video when scanning a directory
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "mkv", "avi", "flv", "wmv"];

/// Check whether a path looks like a video file by extension
pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Pick an output path that does not collide with an existing file.
///
/// `video.mp4` becomes `video-2.mp4`, `video-3.mp4`, ... until a free name
/// is found.
pub fn unique_output_path(candidate: &Path) -> PathBuf {
    if !candidate.exists() {
        return candidate.to_path_buf();
    }

    let stem = candidate
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let extension = candidate
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mp4".to_string());
    let base = candidate.parent().unwrap_or_else(|| Path::new("."));

    let mut index = 2u32;
    loop {
        let next = base.join(format!("{}-{}.{}", stem, index, extension));
        if !next.exists() {
            return next;
        }
        index += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_video_file() {
        assert!(is_video_file(Path::new("movie.mp4")));
        assert!(is_video_file(Path::new("MOVIE.MKV")));
        assert!(!is_video_file(Path::new("notes.txt")));
        assert!(!is_video_file(Path::new("no_extension")));
    }

    #[test]
    fn test_unique_output_path_without_collision() {
        let path = Path::new("/nonexistent-dir/video.mp4");
        assert_eq!(unique_output_path(path), path);
    }

    #[test]
    fn test_unique_output_path_with_collision() {
        let dir = tempfile::tempdir().unwrap();
        let taken = dir.path().join("video.mp4");
        std::fs::write(&taken, b"x").unwrap();
        let next = unique_output_path(&taken);
        assert_eq!(next, dir.path().join("video-2.mp4"));
    }
}
