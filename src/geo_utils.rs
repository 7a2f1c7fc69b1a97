//! # Geographic Utilities
//!
//! Core geographic computation utilities for GPS track replay.
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`haversine_distance`] | Great-circle distance between two GPS points |
//! | [`polyline_length`] | Total length of a GPS track in meters |
//! | [`compute_bounds`] | Bounding box of a coordinate set |
//! | [`bounds_or`] | Bounding box with an enforced fallback for empty input |
//!
//! All functions expect WGS84 coordinates (latitude/longitude in degrees),
//! which is the standard used by GPS receivers and mapping services.

use geo::{Point, Haversine, Distance};
use crate::{GpsPoint, Bounds};

// =============================================================================
// Distance Functions
// =============================================================================

/// Calculate the great-circle distance between two GPS points using the
/// Haversine formula.
///
/// Returns the distance in meters along the Earth's surface (assuming a
/// spherical Earth with radius 6,371 km).
///
/// # Example
///
/// ```rust
/// use track_replay::{GpsPoint, geo_utils};
///
/// let london = GpsPoint::new(51.5074, -0.1278);
/// let paris = GpsPoint::new(48.8566, 2.3522);
///
/// let distance = geo_utils::haversine_distance(&london, &paris);
/// assert!((distance - 343_560.0).abs() < 1000.0); // ~344 km
/// ```
#[inline]
pub fn haversine_distance(p1: &GpsPoint, p2: &GpsPoint) -> f64 {
    let point1 = Point::new(p1.longitude, p1.latitude);
    let point2 = Point::new(p2.longitude, p2.latitude);
    Haversine::distance(point1, point2)
}

/// Calculate the total length of a polyline (GPS track) in meters.
///
/// Sums the haversine distance between consecutive points. Empty or
/// single-point tracks return 0.0.
pub fn polyline_length(points: &[GpsPoint]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }

    points
        .windows(2)
        .map(|w| haversine_distance(&w[0], &w[1]))
        .sum()
}

// =============================================================================
// Bounding Box Functions
// =============================================================================

/// Compute the bounding box of a coordinate set.
///
/// Returns `None` for empty input. Callers that must always produce a box
/// (e.g. to re-fit the viewport) should use [`bounds_or`] instead.
///
/// # Example
///
/// ```rust
/// use track_replay::{GpsPoint, geo_utils};
///
/// let track = vec![
///     GpsPoint::new(51.5000, -0.1300),
///     GpsPoint::new(51.5100, -0.1200),
///     GpsPoint::new(51.5050, -0.1250),
/// ];
///
/// let bounds = geo_utils::compute_bounds(&track).unwrap();
/// assert_eq!(bounds.min_lat, 51.5000);
/// assert_eq!(bounds.max_lat, 51.5100);
/// assert_eq!(bounds.min_lng, -0.1300);
/// assert_eq!(bounds.max_lng, -0.1200);
/// ```
pub fn compute_bounds(points: &[GpsPoint]) -> Option<Bounds> {
    Bounds::from_points(points)
}

/// Compute the bounding box of a coordinate set, returning `fallback` for
/// empty input.
///
/// The fallback is part of the contract: an empty window while the user drags
/// a slider is a routine state, and the caller always receives a usable box,
/// never NaN corners.
///
/// # Example
///
/// ```rust
/// use track_replay::{Bounds, geo_utils};
///
/// let global = Bounds { min_lat: 51.48, max_lat: 51.53, min_lng: -0.15, max_lng: -0.05 };
/// let bounds = geo_utils::bounds_or(&[], global);
/// assert_eq!(bounds, global);
/// ```
pub fn bounds_or(points: &[GpsPoint], fallback: Bounds) -> Bounds {
    Bounds::from_points(points).unwrap_or(fallback)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    #[test]
    fn test_haversine_distance_same_point() {
        let p = GpsPoint::new(51.5074, -0.1278);
        assert_eq!(haversine_distance(&p, &p), 0.0);
    }

    #[test]
    fn test_haversine_distance_known_value() {
        // London to Paris is approximately 344 km
        let london = GpsPoint::new(51.5074, -0.1278);
        let paris = GpsPoint::new(48.8566, 2.3522);
        let dist = haversine_distance(&london, &paris);
        assert!(approx_eq(dist, 343_560.0, 5000.0)); // Within 5km
    }

    #[test]
    fn test_polyline_length_empty() {
        let empty: Vec<GpsPoint> = vec![];
        assert_eq!(polyline_length(&empty), 0.0);
    }

    #[test]
    fn test_polyline_length_single_point() {
        let single = vec![GpsPoint::new(51.5074, -0.1278)];
        assert_eq!(polyline_length(&single), 0.0);
    }

    #[test]
    fn test_polyline_length_two_points() {
        let track = vec![
            GpsPoint::new(51.5074, -0.1278),
            GpsPoint::new(51.5080, -0.1280),
        ];
        let length = polyline_length(&track);
        assert!(length > 0.0);
        assert!(length < 100.0); // Should be about 68m
    }

    #[test]
    fn test_compute_bounds() {
        let track = vec![
            GpsPoint::new(51.50, -0.13),
            GpsPoint::new(51.51, -0.12),
            GpsPoint::new(51.505, -0.125),
        ];
        let bounds = compute_bounds(&track).unwrap();
        assert_eq!(bounds.min_lat, 51.50);
        assert_eq!(bounds.max_lat, 51.51);
        assert_eq!(bounds.min_lng, -0.13);
        assert_eq!(bounds.max_lng, -0.12);
    }

    #[test]
    fn test_compute_bounds_empty_is_none() {
        assert_eq!(compute_bounds(&[]), None);
    }

    #[test]
    fn test_bounds_or_returns_fallback_for_empty_input() {
        let fallback = Bounds { min_lat: 51.48, max_lat: 51.53, min_lng: -0.15, max_lng: -0.05 };
        let bounds = bounds_or(&[], fallback);
        assert_eq!(bounds, fallback);
        assert!(bounds.min_lat.is_finite());
    }

    #[test]
    fn test_bounds_or_ignores_fallback_when_points_exist() {
        let fallback = Bounds { min_lat: 0.0, max_lat: 1.0, min_lng: 0.0, max_lng: 1.0 };
        let points = vec![GpsPoint::new(51.50, -0.13), GpsPoint::new(51.51, -0.12)];
        let bounds = bounds_or(&points, fallback);
        assert_eq!(bounds.min_lat, 51.50);
        assert_eq!(bounds.max_lng, -0.12);
    }

    #[test]
    fn test_bounds_center() {
        let bounds = Bounds { min_lat: 51.50, max_lat: 51.52, min_lng: -0.12, max_lng: -0.10 };
        let center = bounds.center();
        assert!(approx_eq(center.latitude, 51.51, 1e-9));
        assert!(approx_eq(center.longitude, -0.11, 1e-9));
    }
}
