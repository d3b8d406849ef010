//! Route-line simulation driver.
//!
//! Builds a synthetic two-leg route, replays clock-driven progress
//! updates through the full flatten→index→locate→track→animate
//! pipeline, and logs the gradient expressions a rendering sink would
//! receive.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use rand::Rng;
use tracing::info;

use routeline_core::{
    haversine_distance, planar_distance, CongestionSegment, CongestionSeverity, Coordinate,
    GradientStops, LocationFix, ProgressSnapshot, Route, RouteLeg, RouteLineColors, RouteStep,
};
use routeline_view::{LineLayerSink, RouteLineView};

const BASE_LAT: f64 = 33.6846;
const BASE_LON: f64 = -117.8265;

#[derive(Parser, Debug)]
#[command(name = "routeline-sim", about = "Replay progress updates against a synthetic route")]
struct Args {
    /// Simulated travel speed in m/s
    #[arg(long, default_value_t = 15.0)]
    speed_mps: f64,

    /// Seconds between progress updates
    #[arg(long, default_value_t = 1.0)]
    update_interval_secs: f64,

    /// Points per step in the synthetic route
    #[arg(long, default_value_t = 8)]
    points_per_step: usize,

    /// Drive the plain two-color line instead of congestion coloring
    #[arg(long)]
    no_congestion: bool,
}

/// Sink that logs each gradient expression instead of rendering it.
struct LoggingSink;

impl LineLayerSink for LoggingSink {
    fn apply_gradient(&self, layer_id: &str, stops: &GradientStops) {
        info!(layer = layer_id, expression = %stops.to_expression(), "apply gradient");
    }

    fn remove_layer(&self, layer_id: &str) {
        info!(layer = layer_id, "remove layer");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    let route = synthetic_route(args.points_per_step);
    let congestion = (!args.no_congestion).then(|| synthetic_congestion(&route));

    let colors = RouteLineColors::default();
    colors.validate()?;

    let mut view = RouteLineView::new(Arc::new(LoggingSink), colors);
    view.set_route("sim", &route, congestion);

    let mut ticker = tokio::time::interval(Duration::from_secs_f64(args.update_interval_secs));
    let mut leg_index = 0usize;
    let mut traveled_in_step = 0.0f64;

    'drive: loop {
        ticker.tick().await;

        traveled_in_step += args.speed_mps * args.update_interval_secs;
        let mut step = &route.legs[leg_index].steps[0];
        if traveled_in_step >= step.distance_m {
            if leg_index + 1 < route.legs.len() {
                traveled_in_step -= step.distance_m;
                leg_index += 1;
                step = &route.legs[leg_index].steps[0];
            } else {
                traveled_in_step = step.distance_m;
            }
        }

        let shape = step.shape.as_deref().unwrap_or(&[]);
        let fix = LocationFix::now(position_along(shape, traveled_in_step));
        let snapshot = ProgressSnapshot {
            leg_index,
            step_index: 0,
            distance_traveled_m: traveled_in_step,
            step_distance_m: step.distance_m,
        };

        info!(
            leg = leg_index,
            traveled_m = traveled_in_step,
            at = %fix.timestamp,
            "progress update"
        );
        view.on_progress(&snapshot, fix.coordinate);

        if leg_index + 1 == route.legs.len() && traveled_in_step >= step.distance_m {
            // Let the final animation window drain before exiting.
            tokio::time::sleep(Duration::from_millis(1100)).await;
            break 'drive;
        }
    }

    view.clear();
    Ok(())
}

/// Two legs, one step each, heading north then east from the base
/// point with a little lateral jitter.
fn synthetic_route(points_per_step: usize) -> Route {
    let mut rng = rand::rng();
    let points = points_per_step.max(2);

    let mut make_step = |start: Coordinate, dlat: f64, dlon: f64| {
        let mut shape = Vec::with_capacity(points);
        for i in 0..points {
            let t = i as f64 / (points - 1) as f64;
            let jitter = if i == 0 || i == points - 1 {
                0.0
            } else {
                rng.random_range(-0.0002..0.0002)
            };
            shape.push(Coordinate::new(
                start.lat + dlat * t + jitter,
                start.lon + dlon * t + jitter,
            ));
        }
        let distance_m: f64 = shape
            .windows(2)
            .map(|pair| haversine_distance(pair[0], pair[1]))
            .sum();
        RouteStep::new(shape, distance_m)
    };

    let start = Coordinate::new(BASE_LAT, BASE_LON);
    let mid = Coordinate::new(BASE_LAT + 0.02, BASE_LON);
    let first = make_step(start, 0.02, 0.0);
    let second = make_step(mid, 0.0, 0.02);

    Route {
        legs: vec![
            RouteLeg { steps: vec![first] },
            RouteLeg {
                steps: vec![second],
            },
        ],
    }
}

/// Random severities over equal thirds of the route's planar length.
fn synthetic_congestion(route: &Route) -> Vec<CongestionSegment> {
    let mut rng = rand::rng();
    let severities = [
        CongestionSeverity::Low,
        CongestionSeverity::Moderate,
        CongestionSeverity::Heavy,
        CongestionSeverity::Severe,
        CongestionSeverity::Unknown,
    ];

    let total: f64 = route
        .legs
        .iter()
        .flat_map(|leg| leg.steps.iter())
        .filter_map(|step| step.shape.as_deref())
        .flat_map(|shape| shape.windows(2))
        .map(|pair| planar_distance(pair[0], pair[1]))
        .sum();

    (0..3)
        .map(|_| CongestionSegment {
            severity: severities[rng.random_range(0..severities.len())],
            planar_length: total / 3.0,
        })
        .collect()
}

/// Interpolate a coordinate `traveled_m` meters along a step shape.
fn position_along(shape: &[Coordinate], traveled_m: f64) -> Coordinate {
    let Some(&first) = shape.first() else {
        return Coordinate::new(BASE_LAT, BASE_LON);
    };
    if shape.len() < 2 || traveled_m <= 0.0 {
        return first;
    }

    let mut remaining = traveled_m;
    for pair in shape.windows(2) {
        let segment = haversine_distance(pair[0], pair[1]);
        if remaining <= segment && segment > 0.0 {
            let t = remaining / segment;
            return Coordinate::new(
                pair[0].lat + (pair[1].lat - pair[0].lat) * t,
                pair[0].lon + (pair[1].lon - pair[0].lon) * t,
            );
        }
        remaining -= segment;
    }

    shape[shape.len() - 1]
}
