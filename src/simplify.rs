//! Zoom-adaptive polyline simplification.
//!
//! Reduces a track's point density to match the on-screen resolution of the
//! current map zoom, so rendering cost scales with what is visible rather
//! than with raw sample count. Uses Douglas-Peucker with a tolerance halved
//! per zoom step: zooming in retains more points, zooming out fewer.
//!
//! Simplification is pure and always recomputed from the original track.
//! Rapid zoom oscillation therefore cannot accumulate drift: the output for
//! a given (track, zoom) pair is identical no matter what was computed
//! before. Endpoints are never dropped and the surviving samples keep their
//! original relative order, with timestamps following their coordinates.

use geo::{Coord, LineString};
use geo::algorithm::simplify::SimplifyIdx;

use crate::{ReplayConfig, Track};

/// Douglas-Peucker tolerance for a zoom level, in coordinate degrees.
///
/// Follows standard web-map zoom semantics: each zoom step doubles the
/// linear resolution, so the tolerance is halved.
///
/// # Example
/// ```
/// use track_replay::tolerance_for_zoom;
///
/// assert_eq!(tolerance_for_zoom(0, 0.001), 0.001);
/// assert_eq!(tolerance_for_zoom(1, 0.001), 0.0005);
/// assert!(tolerance_for_zoom(13, 0.001) < tolerance_for_zoom(12, 0.001));
/// ```
#[inline]
pub fn tolerance_for_zoom(zoom: u32, base_tolerance: f64) -> f64 {
    base_tolerance / 2f64.powi(zoom as i32)
}

/// Simplify a track for a zoom level.
///
/// Returns a new track whose samples are a strict subsequence of the input,
/// coordinate and timestamp arrays still index-aligned to each other. The
/// first and last samples are always retained (the path is treated as open).
///
/// Tracks with fewer than 3 samples have nothing to simplify and are
/// returned unchanged, as is any track when the effective tolerance is not
/// positive.
pub fn simplify_track(track: &Track, zoom: u32, config: &ReplayConfig) -> Track {
    if track.len() < 3 {
        return track.clone();
    }

    let tolerance = tolerance_for_zoom(zoom, config.base_tolerance);
    if tolerance <= 0.0 {
        return track.clone();
    }

    let line = LineString::new(
        track
            .coordinates()
            .iter()
            .map(|p| Coord { x: p.longitude, y: p.latitude })
            .collect(),
    );

    // Douglas-Peucker, keeping indices so timestamps follow their coordinates
    let kept = line.simplify_idx(&tolerance);
    track.keep_indices(&kept)
}

/// Simplify every track in a dataset for a zoom level.
pub fn simplify_tracks(tracks: &[Track], zoom: u32, config: &ReplayConfig) -> Vec<Track> {
    tracks
        .iter()
        .map(|track| simplify_track(track, zoom, config))
        .collect()
}

/// Simplify every track in a dataset in parallel.
///
/// Same output as [`simplify_tracks`]; recommended for datasets with many
/// long tracks, where a zoom change re-simplifies everything at once.
#[cfg(feature = "parallel")]
pub fn simplify_tracks_parallel(tracks: &[Track], zoom: u32, config: &ReplayConfig) -> Vec<Track> {
    use rayon::prelude::*;

    tracks
        .par_iter()
        .map(|track| simplify_track(track, zoom, config))
        .collect()
}
