//! # Track Replay
//!
//! High-performance temporal-geometric engine for rendering GPS activity
//! tracks with a scrubbable time slider.
//!
//! This library provides:
//! - Zoom-adaptive polyline simplification (Douglas-Peucker)
//! - Time-window clipping that keeps polylines visually connected
//! - Exact position interpolation for an arbitrary query time
//! - Viewport bounds derivation for map re-framing
//!
//! ## Features
//!
//! - **`parallel`** - Enable parallel processing with rayon
//! - **`serde`** - Enable serde derives for dataset interchange
//! - **`ffi`** - Enable FFI bindings for mobile platforms (iOS/Android)
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use track_replay::{GpsPoint, TimeRange, Track, position_at, clip_track};
//!
//! let track = Track::new(
//!     "run",
//!     vec![
//!         GpsPoint::new(51.51, -0.10),
//!         GpsPoint::new(51.51, -0.12),
//!         GpsPoint::new(51.52, -0.12),
//!         GpsPoint::new(51.52, -0.10),
//!     ],
//!     vec![0, 300_000, 600_000, 900_000],
//! ).unwrap();
//!
//! // Clip to the middle of the session; one padding sample is kept per side
//! let visible = clip_track(&track, &TimeRange::new(250_000, 650_000));
//! assert_eq!(visible.len(), 4);
//!
//! // Interpolate the marker position halfway through the first segment
//! let position = position_at(std::slice::from_ref(&track), 150_000);
//! assert!(position.is_some());
//! ```

use std::fmt;

use thiserror::Error;

// Geometry helpers (haversine, polyline length, bounds)
pub mod geo_utils;
pub use geo_utils::{bounds_or, compute_bounds};

// Zoom-adaptive polyline simplification
pub mod simplify;
pub use simplify::{simplify_track, simplify_tracks, tolerance_for_zoom};

#[cfg(feature = "parallel")]
pub use simplify::simplify_tracks_parallel;

// Time-window clipping with boundary padding
pub mod window;
pub use window::{clip_track, clip_tracks, visible_points};

// Query-time position interpolation
pub mod position;
pub use position::{position_at, track_position_at};

// Session pipeline driving a map viewport
pub mod session;
pub use session::{Frame, MapViewport, ReplaySession, ViewState};

#[cfg(feature = "ffi")]
uniffi::setup_scaffolding!();

/// Initialize logging for Android (only used in FFI)
#[cfg(all(feature = "ffi", target_os = "android"))]
fn init_logging() {
    use android_logger::Config;
    use log::LevelFilter;

    android_logger::init_once(
        Config::default()
            .with_max_level(LevelFilter::Debug)
            .with_tag("TrackReplayRust")
    );
}

#[cfg(all(feature = "ffi", not(target_os = "android")))]
fn init_logging() {
    // No-op on non-Android platforms
}

// ============================================================================
// Core Types
// ============================================================================

/// A GPS coordinate with latitude and longitude.
///
/// # Example
/// ```
/// use track_replay::GpsPoint;
/// let point = GpsPoint::new(51.5074, -0.1278); // London
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GpsPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsPoint {
    /// Create a new GPS point.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

/// Bounding box over a set of coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    /// Create bounds from GPS points.
    ///
    /// Returns `None` for empty input; callers that need a box in every case
    /// should go through [`bounds_or`] and supply their fallback.
    pub fn from_points(points: &[GpsPoint]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let mut min_lat = f64::MAX;
        let mut max_lat = f64::MIN;
        let mut min_lng = f64::MAX;
        let mut max_lng = f64::MIN;

        for p in points {
            min_lat = min_lat.min(p.latitude);
            max_lat = max_lat.max(p.latitude);
            min_lng = min_lng.min(p.longitude);
            max_lng = max_lng.max(p.longitude);
        }

        Some(Self { min_lat, max_lat, min_lng, max_lng })
    }

    /// Get the center point of the bounds.
    pub fn center(&self) -> GpsPoint {
        GpsPoint::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }
}

/// Inclusive `[start, end]` time window, in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeRange {
    pub start: i64,
    pub end: i64,
}

impl TimeRange {
    /// Create a time range. A reversed pair is swapped rather than rejected;
    /// slider thumbs cross mid-drag and that is a routine state, not an error.
    pub fn new(start: i64, end: i64) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self { start: end, end: start }
        }
    }

    /// Whether `t` lies inside the window (inclusive on both ends).
    pub fn contains(&self, t: i64) -> bool {
        self.start <= t && t <= self.end
    }

    /// Window length in milliseconds.
    pub fn span(&self) -> i64 {
        self.end - self.start
    }
}

/// Well-known activity categories, parsed from the open tag on a track.
///
/// Unknown tags map to [`ActivityKind::Other`] and render with the fallback
/// style; they are never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Enum))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActivityKind {
    Run,
    Hike,
    Cycle,
    Walk,
    Ruck,
    Other,
}

impl ActivityKind {
    /// Parse an activity tag, case-insensitively.
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "run" => Self::Run,
            "hike" => Self::Hike,
            "cycle" => Self::Cycle,
            "walk" => Self::Walk,
            "ruck" => Self::Ruck,
            _ => Self::Other,
        }
    }

    /// CSS color used when rendering this kind of activity.
    pub fn render_color(&self) -> &'static str {
        match self {
            Self::Run => "red",
            Self::Hike => "green",
            Self::Cycle => "blue",
            Self::Walk => "purple",
            Self::Ruck => "brown",
            Self::Other => "gray",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Run => "run",
            Self::Hike => "hike",
            Self::Cycle => "cycle",
            Self::Walk => "walk",
            Self::Ruck => "ruck",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// One recorded point of a track: a timestamp paired with a coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub timestamp: i64,
    pub coordinate: GpsPoint,
}

/// Raised when a track's parallel arrays disagree in length at construction.
///
/// This is the only fatal condition in the engine; every other edge case
/// (empty tracks, empty windows, out-of-range queries) is a defined normal
/// outcome with a well-specified empty or fallback value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("track has {coordinates} coordinates but {timestamps} timestamps")]
pub struct MalformedTrackError {
    pub coordinates: usize,
    pub timestamps: usize,
}

/// An immutable recorded activity: an open type tag plus parallel,
/// index-aligned coordinate and timestamp arrays.
///
/// Within one track, timestamps are non-decreasing in array order. Tracks are
/// never mutated after construction; the simplifier and the time-window
/// filter derive new tracks instead.
///
/// # Example
/// ```
/// use track_replay::{GpsPoint, Track};
///
/// let track = Track::new(
///     "hike",
///     vec![GpsPoint::new(51.50, -0.05), GpsPoint::new(51.51, -0.06)],
///     vec![1_000, 2_000],
/// ).unwrap();
///
/// assert_eq!(track.len(), 2);
/// assert_eq!(track.activity_type(), "hike");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    activity_type: String,
    coordinates: Vec<GpsPoint>,
    timestamps: Vec<i64>,
}

impl Track {
    /// Construct a track from parallel arrays.
    ///
    /// Fails with [`MalformedTrackError`] if the arrays differ in length; the
    /// invariant is checked here, where data enters the model, never later
    /// during rendering. A zero-sample track is valid and renders nothing.
    pub fn new(
        activity_type: impl Into<String>,
        coordinates: Vec<GpsPoint>,
        timestamps: Vec<i64>,
    ) -> Result<Self, MalformedTrackError> {
        if coordinates.len() != timestamps.len() {
            return Err(MalformedTrackError {
                coordinates: coordinates.len(),
                timestamps: timestamps.len(),
            });
        }
        Ok(Self {
            activity_type: activity_type.into(),
            coordinates,
            timestamps,
        })
    }

    /// The open activity tag, exactly as supplied at construction.
    pub fn activity_type(&self) -> &str {
        &self.activity_type
    }

    /// The tag parsed into a well-known category (or `Other`).
    pub fn kind(&self) -> ActivityKind {
        ActivityKind::from_tag(&self.activity_type)
    }

    /// Coordinates, index-aligned with [`Track::timestamps`].
    pub fn coordinates(&self) -> &[GpsPoint] {
        &self.coordinates
    }

    /// Timestamps in epoch milliseconds, index-aligned with coordinates.
    pub fn timestamps(&self) -> &[i64] {
        &self.timestamps
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    /// Whether the track has no samples.
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    /// The sample at `index`, if any.
    pub fn sample(&self, index: usize) -> Option<Sample> {
        Some(Sample {
            timestamp: *self.timestamps.get(index)?,
            coordinate: *self.coordinates.get(index)?,
        })
    }

    /// Iterate over samples in recorded order.
    pub fn samples(&self) -> impl Iterator<Item = Sample> + '_ {
        self.timestamps
            .iter()
            .zip(self.coordinates.iter())
            .map(|(&timestamp, &coordinate)| Sample { timestamp, coordinate })
    }

    /// First-to-last recorded time span, or `None` for an empty track.
    pub fn time_span(&self) -> Option<TimeRange> {
        Some(TimeRange::new(
            *self.timestamps.first()?,
            *self.timestamps.last()?,
        ))
    }

    /// Total haversine length of the track in meters.
    pub fn distance_meters(&self) -> f64 {
        geo_utils::polyline_length(&self.coordinates)
    }

    /// Derive a track keeping only the samples at `indices`.
    ///
    /// Indices must be sorted ascending; the result's coordinate and
    /// timestamp arrays stay aligned to each other.
    pub(crate) fn keep_indices(&self, indices: &[usize]) -> Self {
        Self {
            activity_type: self.activity_type.clone(),
            coordinates: indices.iter().map(|&i| self.coordinates[i]).collect(),
            timestamps: indices.iter().map(|&i| self.timestamps[i]).collect(),
        }
    }

    /// Derive a track keeping the contiguous sample range `[start, end]`.
    pub(crate) fn keep_slice(&self, start: usize, end: usize) -> Self {
        Self {
            activity_type: self.activity_type.clone(),
            coordinates: self.coordinates[start..=end].to_vec(),
            timestamps: self.timestamps[start..=end].to_vec(),
        }
    }

    /// Derive an empty track with the same activity tag.
    pub(crate) fn cleared(&self) -> Self {
        Self {
            activity_type: self.activity_type.clone(),
            coordinates: Vec::new(),
            timestamps: Vec::new(),
        }
    }
}

/// Dataset-interchange shape for a track: the open tag plus `[lat, lng]`
/// pairs and epoch-millisecond timestamps, as produced by the activity
/// exporter. Convert with `Track::try_from` to validate the length invariant.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawTrack {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub activity_type: String,
    pub coordinates: Vec<[f64; 2]>,
    pub timestamps: Vec<i64>,
}

impl TryFrom<RawTrack> for Track {
    type Error = MalformedTrackError;

    fn try_from(raw: RawTrack) -> Result<Self, Self::Error> {
        let points = raw
            .coordinates
            .iter()
            .map(|&[lat, lng]| GpsPoint::new(lat, lng))
            .collect();
        Track::new(raw.activity_type, points, raw.timestamps)
    }
}

impl From<&Track> for RawTrack {
    fn from(track: &Track) -> Self {
        RawTrack {
            activity_type: track.activity_type.clone(),
            coordinates: track
                .coordinates
                .iter()
                .map(|p| [p.latitude, p.longitude])
                .collect(),
            timestamps: track.timestamps.clone(),
        }
    }
}

/// Configuration for the replay engine.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct ReplayConfig {
    /// Douglas-Peucker tolerance at zoom level 0, in coordinate degrees.
    /// The effective tolerance is `base_tolerance / 2^zoom`.
    /// Default: 0.001 (~111 meters at the equator)
    pub base_tolerance: f64,

    /// Pixel padding passed to the viewport when fitting bounds.
    /// Default: 50
    pub fit_padding_px: u32,

    /// Bounds handed to the viewport when the dataset (or the selected
    /// window) contains no coordinates at all.
    /// Default: central London
    pub fallback_bounds: Bounds,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            base_tolerance: 0.001,
            fit_padding_px: 50,
            fallback_bounds: Bounds {
                min_lat: 51.48,
                max_lat: 51.53,
                min_lng: -0.15,
                max_lng: -0.05,
            },
        }
    }
}

// ============================================================================
// FFI Exports (only when feature enabled)
// ============================================================================

#[cfg(feature = "ffi")]
mod ffi {
    use super::*;
    use log::{info, warn};

    /// Input for flat buffer batch processing (zero-copy from a TypedArray).
    /// Coordinates arrive as `[lat1, lng1, lat2, lng2, ...]` with one
    /// timestamp per pair.
    #[derive(Debug, Clone, uniffi::Record)]
    pub struct FlatTrack {
        pub activity_type: String,
        /// Flat array of coordinates: [lat1, lng1, lat2, lng2, ...]
        pub coords: Vec<f64>,
        /// Epoch-millisecond timestamp per coordinate pair
        pub timestamps: Vec<i64>,
    }

    fn tracks_from_flat(tracks: Vec<FlatTrack>) -> Vec<Track> {
        tracks
            .into_iter()
            .filter_map(|t| {
                let points: Vec<GpsPoint> = t
                    .coords
                    .chunks_exact(2)
                    .map(|chunk| GpsPoint::new(chunk[0], chunk[1]))
                    .collect();
                match Track::new(t.activity_type, points, t.timestamps) {
                    Ok(track) => Some(track),
                    Err(e) => {
                        warn!("[TrackReplayRust] skipping malformed track: {e}");
                        None
                    }
                }
            })
            .collect()
    }

    fn track_to_flat(track: &Track) -> FlatTrack {
        FlatTrack {
            activity_type: track.activity_type().to_string(),
            coords: track
                .coordinates()
                .iter()
                .flat_map(|p| [p.latitude, p.longitude])
                .collect(),
            timestamps: track.timestamps().to_vec(),
        }
    }

    /// Simplify a batch of tracks for a zoom level.
    /// Malformed tracks (coordinate/timestamp length mismatch) are skipped.
    #[uniffi::export]
    pub fn simplify_tracks_flat(
        tracks: Vec<FlatTrack>,
        zoom: u32,
        config: ReplayConfig,
    ) -> Vec<FlatTrack> {
        init_logging();
        info!("[TrackReplayRust] simplify_tracks_flat: {} tracks at zoom {}", tracks.len(), zoom);

        let start = std::time::Instant::now();
        let tracks = tracks_from_flat(tracks);

        #[cfg(feature = "parallel")]
        let simplified = crate::simplify::simplify_tracks_parallel(&tracks, zoom, &config);

        #[cfg(not(feature = "parallel"))]
        let simplified = crate::simplify::simplify_tracks(&tracks, zoom, &config);

        let elapsed = start.elapsed();
        info!(
            "[TrackReplayRust] simplified {} tracks ({} -> {} points) in {:?}",
            simplified.len(),
            tracks.iter().map(Track::len).sum::<usize>(),
            simplified.iter().map(Track::len).sum::<usize>(),
            elapsed
        );

        simplified.iter().map(track_to_flat).collect()
    }

    /// Clip a batch of tracks to a time window, keeping one padding sample
    /// on each side of the window where available.
    #[uniffi::export]
    pub fn clip_tracks_flat(tracks: Vec<FlatTrack>, range: TimeRange) -> Vec<FlatTrack> {
        init_logging();
        let tracks = tracks_from_flat(tracks);
        let clipped = crate::window::clip_tracks(&tracks, &range);
        clipped.iter().map(track_to_flat).collect()
    }

    /// Interpolated marker position at `time`, or `None` when no track's
    /// recorded span contains it. The first track in dataset order wins.
    #[uniffi::export]
    pub fn position_at_flat(tracks: Vec<FlatTrack>, time: i64) -> Option<GpsPoint> {
        init_logging();
        let tracks = tracks_from_flat(tracks);
        crate::position::position_at(&tracks, time)
    }

    /// Bounding box over all points inside `range` (padding samples
    /// excluded), or `fallback` when the window holds no points.
    #[uniffi::export]
    pub fn visible_bounds_flat(
        tracks: Vec<FlatTrack>,
        range: TimeRange,
        fallback: Bounds,
    ) -> Bounds {
        init_logging();
        let tracks = tracks_from_flat(tracks);
        let points = crate::window::visible_points(&tracks, &range);
        crate::geo_utils::bounds_or(&points, fallback)
    }

    /// Get default configuration.
    #[uniffi::export]
    pub fn default_replay_config() -> ReplayConfig {
        init_logging();
        ReplayConfig::default()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn square_track() -> Track {
        Track::new(
            "run",
            vec![
                GpsPoint::new(51.51, -0.10),
                GpsPoint::new(51.51, -0.12),
                GpsPoint::new(51.52, -0.12),
                GpsPoint::new(51.52, -0.10),
            ],
            vec![0, 300_000, 600_000, 900_000],
        )
        .unwrap()
    }

    #[test]
    fn test_gps_point_validation() {
        assert!(GpsPoint::new(51.5074, -0.1278).is_valid());
        assert!(!GpsPoint::new(91.0, 0.0).is_valid());
        assert!(!GpsPoint::new(0.0, 181.0).is_valid());
        assert!(!GpsPoint::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_track_construction() {
        let track = square_track();
        assert_eq!(track.len(), 4);
        assert_eq!(track.kind(), ActivityKind::Run);
        assert_eq!(track.time_span(), Some(TimeRange::new(0, 900_000)));
    }

    #[test]
    fn test_track_length_mismatch_rejected() {
        let err = Track::new(
            "run",
            vec![GpsPoint::new(51.51, -0.10)],
            vec![0, 300_000],
        )
        .unwrap_err();
        assert_eq!(err, MalformedTrackError { coordinates: 1, timestamps: 2 });
    }

    #[test]
    fn test_empty_track_is_valid() {
        let track = Track::new("walk", vec![], vec![]).unwrap();
        assert!(track.is_empty());
        assert_eq!(track.time_span(), None);
        assert_eq!(track.distance_meters(), 0.0);
    }

    #[test]
    fn test_unknown_activity_tag_accepted() {
        let track = Track::new("paraglide", vec![], vec![]).unwrap();
        assert_eq!(track.activity_type(), "paraglide");
        assert_eq!(track.kind(), ActivityKind::Other);
        assert_eq!(track.kind().render_color(), "gray");
    }

    #[test]
    fn test_activity_kind_case_insensitive() {
        assert_eq!(ActivityKind::from_tag("Run"), ActivityKind::Run);
        assert_eq!(ActivityKind::from_tag("HIKE"), ActivityKind::Hike);
        assert_eq!(ActivityKind::from_tag("ruck"), ActivityKind::Ruck);
    }

    #[test]
    fn test_time_range_swaps_reversed_input() {
        let range = TimeRange::new(500, 100);
        assert_eq!(range, TimeRange::new(100, 500));
        assert!(range.contains(100));
        assert!(range.contains(500));
        assert!(!range.contains(501));
    }

    #[test]
    fn test_raw_track_round_trip() {
        let track = square_track();
        let raw = RawTrack::from(&track);
        let back = Track::try_from(raw).unwrap();
        assert_eq!(back, track);
    }

    #[test]
    fn test_raw_track_length_mismatch_rejected() {
        let raw = RawTrack {
            activity_type: "cycle".to_string(),
            coordinates: vec![[51.49, -0.10], [51.49, -0.15]],
            timestamps: vec![0],
        };
        assert!(Track::try_from(raw).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_raw_track_parses_dataset_json() {
        let json = r#"[
            {
                "type": "run",
                "coordinates": [[51.51, -0.1], [51.51, -0.12]],
                "timestamps": [0, 300000]
            }
        ]"#;
        let raws: Vec<RawTrack> = serde_json::from_str(json).unwrap();
        let tracks: Vec<Track> = raws
            .into_iter()
            .map(Track::try_from)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].activity_type(), "run");
        assert_eq!(tracks[0].timestamps(), &[0, 300_000]);
    }

    #[test]
    fn test_samples_iterate_in_order() {
        let track = square_track();
        let samples: Vec<Sample> = track.samples().collect();
        assert_eq!(samples.len(), 4);
        assert_eq!(samples[1].timestamp, 300_000);
        assert_eq!(samples[1].coordinate, GpsPoint::new(51.51, -0.12));
    }
}
