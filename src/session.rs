//! Session pipeline: dataset ownership and per-event recomputation.
//!
//! A [`ReplaySession`] owns the immutable dataset for the lifetime of a
//! viewing session and derives everything else on demand. The UI owns the
//! mutable [`ViewState`] (zoom, time window, scrub time) and passes it in per
//! call; the session reads it and returns new derived values, never mutating
//! shared state. Each derived result is a pure function of its inputs, so
//! re-entrant calls with different inputs cannot corrupt each other.
//!
//! [`ReplaySession::frame`] runs simplification and window clipping
//! synchronously in that order, so clipping always operates on the
//! simplification output for the zoom it was handed, never a stale one.

use std::sync::Arc;

use log::{debug, info};

use crate::geo_utils::bounds_or;
use crate::position::position_at;
use crate::window::{clip_tracks, visible_points};
use crate::{Bounds, GpsPoint, ReplayConfig, TimeRange, Track};

/// Map viewport capability, implemented by the embedding UI.
///
/// The session reads the zoom and commands a re-fit; it never renders tiles
/// or handles pan/zoom input itself.
pub trait MapViewport {
    /// Current zoom level of the map widget.
    fn current_zoom_level(&self) -> u32;

    /// Animate or snap the viewport to `bounds`, keeping `padding_px` pixels
    /// of margin on every side.
    fn fit_to_bounds(&mut self, bounds: Bounds, padding_px: u32);
}

/// UI-owned view state, passed into the session per call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    /// Current map zoom level (standard web-map semantics, ~0-20).
    pub zoom: u32,
    /// Active time window selected on the range slider.
    pub time_range: TimeRange,
    /// Scrub time for the current-position marker.
    pub current_time: i64,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// One polyline per dataset track, simplified for the frame's zoom and
    /// clipped to its time window (padding samples included). Tracks outside
    /// the window come back empty but keep their dataset slot.
    pub polylines: Vec<Track>,
    /// Interpolated marker position, if any track's span contains the scrub
    /// time.
    pub position: Option<GpsPoint>,
    /// Bounding box of the strictly in-range coordinates, falling back to
    /// the dataset bounds for an empty window.
    pub bounds: Bounds,
}

/// A loaded replay session over a fixed dataset.
///
/// The dataset is supplied once at startup by the external loader and shared
/// read-only from then on; derived tracks are new values, never in-place
/// mutations.
pub struct ReplaySession {
    tracks: Arc<[Track]>,
    config: ReplayConfig,
    dataset_bounds: Bounds,
    dataset_span: Option<TimeRange>,
}

impl ReplaySession {
    /// Create a session over a loaded dataset.
    pub fn new(tracks: Vec<Track>, config: ReplayConfig) -> Self {
        let tracks: Arc<[Track]> = tracks.into();

        let all_points: Vec<GpsPoint> = tracks
            .iter()
            .flat_map(|t| t.coordinates().iter().copied())
            .collect();
        let dataset_bounds = bounds_or(&all_points, config.fallback_bounds);

        let dataset_span = tracks
            .iter()
            .filter_map(Track::time_span)
            .reduce(|acc, span| {
                TimeRange::new(acc.start.min(span.start), acc.end.max(span.end))
            });

        info!(
            "[TrackReplay] session loaded: {} tracks, {} points, {:.1} km",
            tracks.len(),
            all_points.len(),
            tracks.iter().map(Track::distance_meters).sum::<f64>() / 1000.0
        );

        Self { tracks, config, dataset_bounds, dataset_span }
    }

    /// The loaded dataset, in load order.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Bounding box over the whole dataset (the configured fallback when the
    /// dataset holds no coordinates).
    pub fn dataset_bounds(&self) -> Bounds {
        self.dataset_bounds
    }

    /// Earliest-to-latest recorded time across all tracks.
    pub fn dataset_span(&self) -> Option<TimeRange> {
        self.dataset_span
    }

    /// View state for session start: default zoom, the full recorded span
    /// selected, scrub parked at its beginning.
    pub fn initial_view(&self) -> ViewState {
        let span = self.dataset_span.unwrap_or(TimeRange::new(0, 0));
        ViewState {
            zoom: 13,
            time_range: span,
            current_time: span.start,
        }
    }

    /// Frame the whole dataset on session start.
    pub fn start(&self, viewport: &mut dyn MapViewport) {
        viewport.fit_to_bounds(self.dataset_bounds, self.config.fit_padding_px);
    }

    /// Derive everything the renderer needs for the given view state.
    ///
    /// Simplification for `view.zoom` completes before the window filter
    /// runs, so padding samples are always chosen from the current zoom's
    /// simplified output. The marker position is interpolated from the raw
    /// samples for exactness.
    pub fn frame(&self, view: &ViewState) -> Frame {
        let simplified = self.simplified(view.zoom);
        let polylines = clip_tracks(&simplified, &view.time_range);
        let position = position_at(&self.tracks, view.current_time);

        let points = visible_points(&simplified, &view.time_range);
        let bounds = bounds_or(&points, self.dataset_bounds);

        debug!(
            "[TrackReplay] frame: zoom {}, window {}..{}, {} visible points, marker: {}",
            view.zoom,
            view.time_range.start,
            view.time_range.end,
            points.len(),
            if position.is_some() { "yes" } else { "no" },
        );

        Frame { polylines, position, bounds }
    }

    /// Marker position for a scrub-time change alone.
    ///
    /// Recomputed fresh on every call; scrubbing does not touch the
    /// simplified or clipped polylines.
    pub fn position_at_time(&self, time: i64) -> Option<GpsPoint> {
        position_at(&self.tracks, time)
    }

    /// React to a committed time-range selection by re-fitting the viewport
    /// to the points inside the new window.
    ///
    /// Called only when the selection is committed, not on every incremental
    /// drag. An empty window re-fits to the dataset bounds.
    pub fn commit_time_range(&self, range: TimeRange, viewport: &mut dyn MapViewport) {
        let simplified = self.simplified(viewport.current_zoom_level());
        let points = visible_points(&simplified, &range);
        let bounds = bounds_or(&points, self.dataset_bounds);
        viewport.fit_to_bounds(bounds, self.config.fit_padding_px);
    }

    fn simplified(&self, zoom: u32) -> Vec<Track> {
        #[cfg(feature = "parallel")]
        {
            crate::simplify::simplify_tracks_parallel(&self.tracks, zoom, &self.config)
        }
        #[cfg(not(feature = "parallel"))]
        {
            crate::simplify::simplify_tracks(&self.tracks, zoom, &self.config)
        }
    }
}
