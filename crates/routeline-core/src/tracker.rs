//! Traveled-fraction tracking.
//!
//! Owns the per-route progress state (flattened points, the
//! remaining-distance table, and the current/previous traveled
//! fractions) so the whole pipeline can be driven and tested without a
//! rendering view. Single writer: progress updates are applied one at
//! a time in arrival order.

use tracing::trace;

use crate::flatten::{flatten_route, FlatRoutePoints};
use crate::geometry::{Coordinate, ProgressSnapshot, Route};
use crate::index::DistanceTable;
use crate::locate::upcoming_point_index;
use crate::projection::planar_distance;

/// Normalized traveled fractions, both in [0, 1].
///
/// `previous <= current` is not guaranteed; replacing or completing a
/// route resets both to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TraveledFraction {
    pub current: f64,
    pub previous: f64,
}

/// The previous/current fraction pair produced by an accepted progress
/// update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FractionUpdate {
    pub previous: f64,
    pub current: f64,
}

/// Per-route progress state: geometry, distance table, and traveled
/// fractions. Built once per route; `update` is the per-fix hot path.
#[derive(Debug)]
pub struct RouteProgressTracker {
    points: FlatRoutePoints,
    distances: Option<DistanceTable>,
    fraction: TraveledFraction,
}

impl RouteProgressTracker {
    /// Flatten the route and precompute the remaining-distance table.
    pub fn new(route: &Route) -> Self {
        let points = flatten_route(route);
        let distances = DistanceTable::build(&points.flat);
        Self {
            points,
            distances,
            fraction: TraveledFraction::default(),
        }
    }

    pub fn fraction(&self) -> TraveledFraction {
        self.fraction
    }

    pub fn flat_points(&self) -> &FlatRoutePoints {
        &self.points
    }

    /// Whether the route produced any indexable geometry.
    pub fn has_geometry(&self) -> bool {
        self.distances.is_some()
    }

    /// Total planar route distance (zero when there is no geometry).
    pub fn total_distance(&self) -> f64 {
        self.distances
            .as_ref()
            .map(DistanceTable::total_distance)
            .unwrap_or(0.0)
    }

    /// Apply one progress update.
    ///
    /// Locates the upcoming flat-sequence point, derives the remaining
    /// planar distance via the live coordinate, and shifts the fraction
    /// pair. Numerically inconsistent updates (remaining distance past
    /// the route's envelope, negative offsets) are dropped without
    /// touching state, as is anything the locator rejects. Returns the
    /// new fraction pair only when state changed.
    pub fn update(
        &mut self,
        progress: &ProgressSnapshot,
        location: Coordinate,
    ) -> Option<FractionUpdate> {
        let distances = self.distances.as_ref()?;
        let index = upcoming_point_index(&self.points, progress)?;
        let entry = distances.get(index)?;

        let total = distances.total_distance();
        if total <= 0.0 {
            trace!("route has zero planar length; dropping progress update");
            return None;
        }

        let remaining = entry.distance_remaining + planar_distance(entry.point, location);
        if remaining > total {
            // Live coordinate projected past the route's precomputed
            // envelope (GPS noise); skip this update.
            trace!(remaining, total, "remaining distance exceeds route total");
            return None;
        }

        let offset = 1.0 - remaining / total;
        if offset < 0.0 {
            trace!(offset, "negative traveled offset; dropping update");
            return None;
        }

        self.fraction.previous = self.fraction.current;
        self.fraction.current = offset;
        Some(FractionUpdate {
            previous: self.fraction.previous,
            current: self.fraction.current,
        })
    }

    /// Drop both fractions back to zero (route replaced or completed).
    pub fn reset(&mut self) {
        self.fraction = TraveledFraction::default();
    }
}
