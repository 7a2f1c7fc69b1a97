//! Sweep zoom levels over a long noisy track and report retained point
//! counts after simplification.
//!
//! Run with: cargo run --example zoom_levels --features parallel

use track_replay::{simplify_tracks_parallel, tolerance_for_zoom, GpsPoint, ReplayConfig, Track};

/// Build a wiggly two-hour ride: a straight heading with a sine-wave lateral
/// wobble, sampled every two seconds.
fn noisy_ride(samples: usize) -> Track {
    let coordinates: Vec<GpsPoint> = (0..samples)
        .map(|i| {
            let along = i as f64 * 0.00002;
            let wobble = (i as f64 * 0.7).sin() * 0.00008;
            GpsPoint::new(47.36 + along, 8.54 + wobble)
        })
        .collect();
    let timestamps: Vec<i64> = (0..samples as i64).map(|i| i * 2_000).collect();
    Track::new("cycle", coordinates, timestamps).unwrap()
}

fn main() {
    let config = ReplayConfig::default();
    let tracks = vec![noisy_ride(3_600)];

    println!("Zoom sweep over {} raw points\n", tracks[0].len());
    println!("{:>4}  {:>12}  {:>8}", "zoom", "tolerance", "points");

    for zoom in 0..=18 {
        let simplified = simplify_tracks_parallel(&tracks, zoom, &config);
        println!(
            "{:>4}  {:>12.9}  {:>8}",
            zoom,
            tolerance_for_zoom(zoom, config.base_tolerance),
            simplified[0].len()
        );
    }
}
