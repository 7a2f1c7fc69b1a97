//! Walk through a full replay session over a small dataset.
//!
//! Run with: cargo run --example replay_session

use track_replay::{
    Bounds, GpsPoint, MapViewport, ReplayConfig, ReplaySession, TimeRange, Track, ViewState,
};

/// Stand-in for the map widget: prints what the real viewport would do.
struct ConsoleViewport {
    zoom: u32,
}

impl MapViewport for ConsoleViewport {
    fn current_zoom_level(&self) -> u32 {
        self.zoom
    }

    fn fit_to_bounds(&mut self, bounds: Bounds, padding_px: u32) {
        println!(
            "   [viewport] fit to ({:.2}, {:.2})..({:.2}, {:.2}) with {}px padding",
            bounds.min_lat, bounds.min_lng, bounds.max_lat, bounds.max_lng, padding_px
        );
    }
}

fn dataset() -> Vec<Track> {
    // A morning run around a block (2025-07-01, five minutes per sample)
    let run_start = 1_751_364_000_000;
    let run = Track::new(
        "run",
        vec![
            GpsPoint::new(51.51, -0.10),
            GpsPoint::new(51.51, -0.12),
            GpsPoint::new(51.52, -0.12),
            GpsPoint::new(51.52, -0.10),
        ],
        (0..4).map(|i| run_start + i * 300_000).collect(),
    )
    .unwrap();

    // A slower hike the next day (thirty minutes per sample)
    let hike_start = 1_751_454_000_000;
    let hike = Track::new(
        "hike",
        vec![
            GpsPoint::new(51.50, -0.05),
            GpsPoint::new(51.51, -0.06),
            GpsPoint::new(51.51, -0.07),
        ],
        (0..3).map(|i| hike_start + i * 1_800_000).collect(),
    )
    .unwrap();

    // A ride on day three (fifteen minutes per sample)
    let cycle_start = 1_751_533_200_000;
    let cycle = Track::new(
        "cycle",
        vec![
            GpsPoint::new(51.49, -0.10),
            GpsPoint::new(51.49, -0.15),
            GpsPoint::new(51.50, -0.15),
            GpsPoint::new(51.50, -0.10),
        ],
        (0..4).map(|i| cycle_start + i * 900_000).collect(),
    )
    .unwrap();

    vec![run, hike, cycle]
}

fn main() {
    let session = ReplaySession::new(dataset(), ReplayConfig::default());
    let mut viewport = ConsoleViewport { zoom: 13 };

    println!("Track Replay Session\n");
    for track in session.tracks() {
        println!(
            "  {} ({}): {} points, {:.1} km",
            track.activity_type(),
            track.kind().render_color(),
            track.len(),
            track.distance_meters() / 1000.0
        );
    }

    println!("\n1. Session start frames the whole dataset:");
    session.start(&mut viewport);

    let span = session.dataset_span().expect("dataset is not empty");
    println!(
        "\n2. Recorded span: {} .. {} ({:.1} h)",
        span.start,
        span.end,
        span.span() as f64 / 3_600_000.0
    );

    // Scrub across the run at one-minute steps
    println!("\n3. Scrubbing through the first activity:");
    let run_span = session.tracks()[0].time_span().unwrap();
    let mut t = run_span.start;
    while t <= run_span.end {
        match session.position_at_time(t) {
            Some(p) => println!("   t+{:>4}s -> ({:.4}, {:.4})", (t - run_span.start) / 1000, p.latitude, p.longitude),
            None => println!("   t+{:>4}s -> no position", (t - run_span.start) / 1000),
        }
        t += 180_000;
    }

    // Narrow the window to the middle of the run and commit it
    println!("\n4. Committing a narrowed time range:");
    let narrowed = TimeRange::new(run_span.start + 300_000, run_span.start + 600_000);
    session.commit_time_range(narrowed, &mut viewport);

    let frame = session.frame(&ViewState {
        zoom: viewport.current_zoom_level(),
        time_range: narrowed,
        current_time: narrowed.start,
    });
    for polyline in &frame.polylines {
        println!(
            "   {}: {} points visible (padding included)",
            polyline.activity_type(),
            polyline.len()
        );
    }
}
