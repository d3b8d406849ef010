//! Core data models for route-line progress tracking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A geodetic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// A location fix delivered by the location collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationFix {
    pub coordinate: Coordinate,
    pub timestamp: DateTime<Utc>,
}

impl LocationFix {
    /// Create a fix stamped with the current time.
    pub fn now(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            timestamp: Utc::now(),
        }
    }
}

/// A maneuver-bounded portion of a leg with its own coordinate shape.
///
/// `shape` may be absent or empty; both are valid (the step simply
/// contributes no geometry). `distance_m` is the step's total ground
/// distance as reported by the route collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteStep {
    #[serde(default)]
    pub shape: Option<Vec<Coordinate>>,
    pub distance_m: f64,
}

impl RouteStep {
    pub fn new(shape: Vec<Coordinate>, distance_m: f64) -> Self {
        Self {
            shape: Some(shape),
            distance_m,
        }
    }

    /// Number of coordinates this step contributes to the flat sequence.
    pub fn point_count(&self) -> usize {
        self.shape.as_ref().map(Vec::len).unwrap_or(0)
    }
}

/// A portion of a route between two waypoints, composed of steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteLeg {
    pub steps: Vec<RouteStep>,
}

/// An ordered route geometry supplied by the route collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    pub legs: Vec<RouteLeg>,
}

/// Progress within the active route, supplied on each update by the
/// navigation collaborator.
///
/// `leg_index` and `step_index` must reference the same route the
/// display state was built from; stale indices are rejected as a
/// no-update (see the locator).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub leg_index: usize,
    pub step_index: usize,
    /// Distance already traveled within the current step, in meters.
    pub distance_traveled_m: f64,
    /// The current step's total distance, in meters.
    pub step_distance_m: f64,
}

/// Traffic severity classification for a congestion segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CongestionSeverity {
    Low,
    Moderate,
    Heavy,
    Severe,
    Unknown,
}

/// A contiguous sub-range of the route's projected geometry tagged with
/// a traffic severity and its own planar length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CongestionSegment {
    pub severity: CongestionSeverity,
    /// Planar (projected) length of this segment, in the same unit the
    /// projector's distance function produces.
    pub planar_length: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_point_count_handles_missing_shape() {
        let step = RouteStep {
            shape: None,
            distance_m: 120.0,
        };
        assert_eq!(step.point_count(), 0);

        let step = RouteStep::new(vec![Coordinate::new(0.0, 0.0)], 0.0);
        assert_eq!(step.point_count(), 1);
    }

    #[test]
    fn severity_serializes_lowercase() {
        let json = serde_json::to_string(&CongestionSeverity::Moderate).unwrap();
        assert_eq!(json, "\"moderate\"");
    }
}
