//! Query-time position interpolation.
//!
//! Given a scrub time, finds the segment of a track whose two samples
//! bracket it and linearly interpolates the marker position along that
//! segment. Across a dataset the first track (in dataset order) containing a
//! bracketing segment wins; simultaneous overlapping activities are never
//! blended and at most one marker is shown. That policy is a fixed contract.

use crate::{GpsPoint, Track};

/// Interpolated position of a single track at `time`.
///
/// Locates the first segment with `timestamps[i-1] <= time <= timestamps[i]`
/// and interpolates latitude and longitude independently along it. A
/// zero-duration segment (both timestamps equal) yields the earlier sample's
/// coordinate unchanged; that is defined behavior, not an error.
///
/// Returns `None` when `time` falls outside the track's recorded span, or
/// when the track has fewer than two samples and therefore no segment.
///
/// # Example
/// ```
/// use track_replay::{GpsPoint, Track, track_position_at};
///
/// let track = Track::new(
///     "run",
///     vec![GpsPoint::new(0.0, 0.0), GpsPoint::new(10.0, 10.0)],
///     vec![0, 100],
/// ).unwrap();
///
/// assert_eq!(track_position_at(&track, 50), Some(GpsPoint::new(5.0, 5.0)));
/// assert_eq!(track_position_at(&track, 150), None);
/// ```
pub fn track_position_at(track: &Track, time: i64) -> Option<GpsPoint> {
    let timestamps = track.timestamps();
    let coordinates = track.coordinates();
    if timestamps.len() < 2 {
        return None;
    }
    if time < timestamps[0] || time > timestamps[timestamps.len() - 1] {
        return None;
    }

    for i in 1..timestamps.len() {
        let prev_t = timestamps[i - 1];
        let next_t = timestamps[i];
        if prev_t <= time && time <= next_t {
            let prev = coordinates[i - 1];
            if next_t == prev_t {
                // Zero-duration segment: no ratio to take, hold the earlier sample
                return Some(prev);
            }
            let next = coordinates[i];
            let ratio = (time - prev_t) as f64 / (next_t - prev_t) as f64;
            return Some(GpsPoint::new(
                prev.latitude + (next.latitude - prev.latitude) * ratio,
                prev.longitude + (next.longitude - prev.longitude) * ratio,
            ));
        }
    }

    None
}

/// Current marker position over a dataset at `time`.
///
/// Walks the tracks in dataset order and returns the first contributing
/// position; tracks whose span does not contain `time` contribute nothing.
/// When no track contributes there is no current position, which renders as
/// no marker rather than failing.
pub fn position_at(tracks: &[Track], time: i64) -> Option<GpsPoint> {
    tracks.iter().find_map(|track| track_position_at(track, time))
}
