// Unit tests for domain models

#[cfg(test)]
mod tests {
    use crate::domain::model::*;
    use crate::error::ExportError;
    use std::path::PathBuf;

    fn video(duration: u64) -> VideoItem {
        VideoItem::with_metadata(PathBuf::from("input.mp4"), duration, Some(1920), Some(1080))
    }

    #[test]
    fn test_time_range_duration() {
        assert_eq!(TimeRange::new(10, 25).duration(), 15);
        assert_eq!(TimeRange::new(25, 10).duration(), 0);
    }

    #[test]
    fn test_time_range_ordering() {
        let mut ranges = vec![
            TimeRange::new(30, 40),
            TimeRange::new(10, 20),
            TimeRange::new(10, 15),
        ];
        ranges.sort();
        assert_eq!(ranges[0], TimeRange::new(10, 15));
        assert_eq!(ranges[1], TimeRange::new(10, 20));
        assert_eq!(ranges[2], TimeRange::new(30, 40));
    }

    #[test]
    fn test_normalize_merges_overlapping_and_clips() {
        let mut v = video(100);
        v.delete_ranges = vec![
            TimeRange::new(10, 20),
            TimeRange::new(15, 25),
            TimeRange::new(90, 120),
        ];
        v.normalize();
        assert_eq!(
            v.delete_ranges,
            vec![TimeRange::new(10, 25), TimeRange::new(90, 100)]
        );
    }

    #[test]
    fn test_normalize_merges_touching_ranges() {
        let mut v = video(60);
        v.delete_ranges = vec![TimeRange::new(10, 20), TimeRange::new(20, 30)];
        v.normalize();
        assert_eq!(v.delete_ranges, vec![TimeRange::new(10, 30)]);
    }

    #[test]
    fn test_normalize_drops_out_of_bounds_ranges() {
        let mut v = video(50);
        v.delete_ranges = vec![TimeRange::new(60, 70), TimeRange::new(10, 20)];
        v.normalize();
        assert_eq!(v.delete_ranges, vec![TimeRange::new(10, 20)]);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let mut v = video(100);
        v.delete_ranges = vec![TimeRange::new(5, 15), TimeRange::new(10, 40)];
        v.normalize();
        let once = v.delete_ranges.clone();
        v.normalize();
        assert_eq!(v.delete_ranges, once);
    }

    #[test]
    fn test_normalize_unknown_duration_forces_empty() {
        let mut v = video(0);
        v.delete_ranges = vec![TimeRange::new(10, 20)];
        v.normalize();
        assert!(v.delete_ranges.is_empty());
    }

    #[test]
    fn test_keep_segments_complement() {
        let mut v = video(100);
        v.delete_ranges = vec![
            TimeRange::new(10, 20),
            TimeRange::new(15, 25),
            TimeRange::new(90, 120),
        ];
        assert_eq!(
            v.keep_segments(),
            vec![TimeRange::new(0, 10), TimeRange::new(25, 90)]
        );
        assert_eq!(v.total_removed(), 25);
        assert_eq!(v.total_kept(), 75);
    }

    #[test]
    fn test_keep_segments_no_deletes() {
        let mut v = video(42);
        assert_eq!(v.keep_segments(), vec![TimeRange::new(0, 42)]);
    }

    #[test]
    fn test_keep_segments_unknown_duration() {
        let mut v = video(0);
        v.delete_ranges = vec![TimeRange::new(10, 20)];
        assert!(v.keep_segments().is_empty());
        assert_eq!(v.total_removed(), 0);
    }

    #[test]
    fn test_keep_segments_fully_deleted() {
        let mut v = video(30);
        v.delete_ranges = vec![TimeRange::new(0, 30)];
        assert!(v.keep_segments().is_empty());
        assert_eq!(v.total_kept(), 0);
    }

    #[test]
    fn test_keep_segments_is_pure_without_mutation() {
        let mut v = video(100);
        v.delete_ranges = vec![TimeRange::new(40, 60)];
        let first = v.keep_segments();
        let second = v.keep_segments();
        assert_eq!(first, second);
    }

    #[test]
    fn test_kept_plus_removed_reconstructs_duration() {
        let mut v = video(300);
        v.delete_ranges = vec![
            TimeRange::new(250, 400),
            TimeRange::new(0, 10),
            TimeRange::new(90, 90),
            TimeRange::new(50, 70),
            TimeRange::new(65, 80),
        ];
        let kept: u64 = v.keep_segments().iter().map(|r| r.duration()).sum();
        assert_eq!(kept + v.total_removed(), 300);
        assert_eq!(kept, v.total_kept());
    }

    #[test]
    fn test_add_delete_range_rejects_inverted() {
        let mut v = video(100);
        let err = v.add_delete_range(30, 30).unwrap_err();
        assert!(matches!(
            err,
            ExportError::InvalidRange { start: 30, end: 30 }
        ));
        assert!(v.delete_ranges.is_empty());

        assert!(v.add_delete_range(40, 20).is_err());
        assert!(v.delete_ranges.is_empty());
    }

    #[test]
    fn test_add_delete_range_normalizes() {
        let mut v = video(100);
        v.add_delete_range(10, 20).unwrap();
        v.add_delete_range(15, 25).unwrap();
        assert_eq!(v.delete_ranges, vec![TimeRange::new(10, 25)]);
    }

    #[test]
    fn test_remove_and_clear_delete_ranges() {
        let mut v = video(100);
        v.add_delete_range(10, 20).unwrap();
        v.add_delete_range(30, 40).unwrap();
        assert!(v.remove_delete_range(0));
        assert_eq!(v.delete_ranges, vec![TimeRange::new(30, 40)]);
        assert!(!v.remove_delete_range(5));

        v.clear_delete_ranges();
        assert!(v.delete_ranges.is_empty());
    }

    #[test]
    fn test_project_reordering() {
        let mut project = Project::new();
        project.add_video(video(10));
        project.add_video(video(20));
        project.add_video(video(30));

        assert!(project.move_up(1));
        assert_eq!(project.videos[0].duration, 20);
        assert!(!project.move_up(0));

        assert!(project.move_down(1));
        assert_eq!(project.videos[2].duration, 10);
        assert!(!project.move_down(2));
    }

    #[test]
    fn test_project_remove_video() {
        let mut project = Project::new();
        project.add_video(video(10));
        project.add_video(video(20));
        let removed = project.remove_video(0).unwrap();
        assert_eq!(removed.duration, 10);
        assert!(project.remove_video(7).is_none());
        assert_eq!(project.videos.len(), 1);
    }

    #[test]
    fn test_project_total_kept_duration() {
        let mut project = Project::new();
        let mut a = video(100);
        a.add_delete_range(0, 40).unwrap();
        let mut b = video(50);
        b.add_delete_range(10, 20).unwrap();
        project.add_video(a);
        project.add_video(b);
        assert_eq!(project.total_kept_duration(), 60 + 40);
    }
}
