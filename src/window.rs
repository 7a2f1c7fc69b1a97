//! Time-window clipping with boundary padding.
//!
//! Selects the samples of a track whose timestamps fall inside an inclusive
//! `[start, end]` window, keeping one extra sample on each side of the window
//! where one exists. Without the padding, a polyline would stop abruptly at
//! the last in-range sample instead of running toward where the track leaves
//! the window; padding by exactly one sample (not by time distance) is a
//! fixed contract of the renderer.
//!
//! A window that misses the track's recorded span entirely produces an empty
//! track. That is a routine state while the user drags the range slider, not
//! an error.

use crate::{GpsPoint, TimeRange, Track};

/// Clip a track to a time window.
///
/// The result holds every sample with `timestamp ∈ [start, end]` plus, when
/// samples were cut off, the single immediately-preceding and
/// immediately-following samples. It is always a contiguous slice of the
/// input, so coordinates and timestamps remain index-aligned and in recorded
/// order.
///
/// # Example
/// ```
/// use track_replay::{GpsPoint, TimeRange, Track, clip_track};
///
/// let track = Track::new(
///     "run",
///     (0..4).map(|i| GpsPoint::new(51.51 + i as f64 * 0.01, -0.1)).collect(),
///     vec![0, 10, 20, 30],
/// ).unwrap();
///
/// // Nothing lies strictly inside [12, 18], but the bracketing neighbors
/// // are kept so the segment crossing the window still renders.
/// let clipped = clip_track(&track, &TimeRange::new(12, 18));
/// assert_eq!(clipped.timestamps(), &[10, 20]);
/// ```
pub fn clip_track(track: &Track, range: &TimeRange) -> Track {
    let timestamps = track.timestamps();
    let (first, last) = match (timestamps.first(), timestamps.last()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return track.cleared(),
    };

    // Window entirely before or after the recorded span: nothing to render
    if range.end < first || range.start > last {
        return track.cleared();
    }

    // Timestamps are sorted, so the in-range samples are exactly [lo, hi)
    let lo = timestamps.partition_point(|&t| t < range.start);
    let hi = timestamps.partition_point(|&t| t <= range.end);

    // One sample of padding on each side, where one exists
    let start_idx = lo.saturating_sub(1);
    let end_idx = hi.min(timestamps.len() - 1);

    track.keep_slice(start_idx, end_idx)
}

/// Clip every track in a dataset to a time window.
///
/// Tracks without samples in (or bracketing) the window come back empty but
/// are kept in dataset order, so renderers can keep stable track indices.
pub fn clip_tracks(tracks: &[Track], range: &TimeRange) -> Vec<Track> {
    tracks
        .iter()
        .map(|track| clip_track(track, range))
        .collect()
}

/// Collect the coordinates strictly inside the window across all tracks.
///
/// Padding samples are deliberately excluded: this feeds the viewport re-fit,
/// which frames what the user selected, not the neighbors kept for line
/// continuity.
pub fn visible_points(tracks: &[Track], range: &TimeRange) -> Vec<GpsPoint> {
    let mut points = Vec::new();
    for track in tracks {
        let timestamps = track.timestamps();
        let lo = timestamps.partition_point(|&t| t < range.start);
        let hi = timestamps.partition_point(|&t| t <= range.end);
        points.extend_from_slice(&track.coordinates()[lo..hi]);
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn four_sample_track() -> Track {
        Track::new(
            "run",
            vec![
                GpsPoint::new(51.51, -0.10),
                GpsPoint::new(51.51, -0.12),
                GpsPoint::new(51.52, -0.12),
                GpsPoint::new(51.52, -0.10),
            ],
            vec![0, 10, 20, 30],
        )
        .unwrap()
    }

    #[test]
    fn test_bracketing_neighbors_kept_when_window_holds_no_sample() {
        let track = four_sample_track();
        let clipped = clip_track(&track, &TimeRange::new(12, 18));
        assert_eq!(clipped.timestamps(), &[10, 20]);
        assert_eq!(
            clipped.coordinates(),
            &[GpsPoint::new(51.51, -0.12), GpsPoint::new(51.52, -0.12)]
        );
    }

    #[test]
    fn test_one_padding_sample_each_side() {
        let track = four_sample_track();
        let clipped = clip_track(&track, &TimeRange::new(5, 25));
        // In range: 10 and 20; padding: 0 before, 30 after
        assert_eq!(clipped.timestamps(), &[0, 10, 20, 30]);
    }

    #[test]
    fn test_no_padding_past_track_ends() {
        let track = four_sample_track();
        let clipped = clip_track(&track, &TimeRange::new(0, 30));
        assert_eq!(clipped.timestamps(), &[0, 10, 20, 30]);
    }

    #[test]
    fn test_boundary_samples_count_as_in_range() {
        let track = four_sample_track();
        // 10 and 20 sit exactly on the window edges; padding still applies
        let clipped = clip_track(&track, &TimeRange::new(10, 20));
        assert_eq!(clipped.timestamps(), &[0, 10, 20, 30]);
    }

    #[test]
    fn test_window_before_track_is_empty() {
        let track = four_sample_track();
        let clipped = clip_track(&track, &TimeRange::new(-20, -10));
        assert!(clipped.is_empty());
        assert_eq!(clipped.activity_type(), "run");
    }

    #[test]
    fn test_window_after_track_is_empty() {
        let track = four_sample_track();
        let clipped = clip_track(&track, &TimeRange::new(40, 50));
        assert!(clipped.is_empty());
    }

    #[test]
    fn test_empty_track_stays_empty() {
        let track = Track::new("hike", vec![], vec![]).unwrap();
        let clipped = clip_track(&track, &TimeRange::new(0, 100));
        assert!(clipped.is_empty());
        assert_eq!(clipped.activity_type(), "hike");
    }

    #[test]
    fn test_result_is_contiguous_and_aligned() {
        let track = four_sample_track();
        let clipped = clip_track(&track, &TimeRange::new(8, 22));
        assert_eq!(clipped.len(), clipped.timestamps().len());
        for pair in clipped.timestamps().windows(2) {
            assert!(pair[0] <= pair[1]);
        }
        // Each surviving sample matches its original by timestamp
        for sample in clipped.samples() {
            let original_idx = track
                .timestamps()
                .iter()
                .position(|&t| t == sample.timestamp)
                .unwrap();
            assert_eq!(track.coordinates()[original_idx], sample.coordinate);
        }
    }

    #[test]
    fn test_clip_tracks_preserves_dataset_order() {
        let run = four_sample_track();
        let hike = Track::new(
            "hike",
            vec![GpsPoint::new(51.50, -0.05)],
            vec![500],
        )
        .unwrap();
        let clipped = clip_tracks(&[run, hike], &TimeRange::new(0, 30));
        assert_eq!(clipped.len(), 2);
        assert_eq!(clipped[0].activity_type(), "run");
        assert_eq!(clipped[0].len(), 4);
        // Second track is out of window but keeps its slot
        assert_eq!(clipped[1].activity_type(), "hike");
        assert!(clipped[1].is_empty());
    }

    #[test]
    fn test_visible_points_exclude_padding() {
        let track = four_sample_track();
        let points = visible_points(std::slice::from_ref(&track), &TimeRange::new(5, 25));
        // Only the strictly in-range samples at t=10 and t=20
        assert_eq!(
            points,
            vec![GpsPoint::new(51.51, -0.12), GpsPoint::new(51.52, -0.12)]
        );
    }

    #[test]
    fn test_visible_points_empty_window() {
        let track = four_sample_track();
        let points = visible_points(std::slice::from_ref(&track), &TimeRange::new(40, 50));
        assert!(points.is_empty());
    }
}
