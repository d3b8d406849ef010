//! Route geometry flattening.
//!
//! Converts a route's legs→steps→shape structure into a nested index
//! mirroring the leg/step boundaries and one flat ordered sequence of
//! every coordinate in traversal order. Built once per route and
//! immutable afterward; shared endpoints between adjacent steps are
//! intentionally repeated so flat indices stay aligned with per-step
//! point counts.

use crate::geometry::{Coordinate, Route};

/// Flattened route geometry.
#[derive(Debug, Clone, Default)]
pub struct FlatRoutePoints {
    /// Per-leg, per-step coordinate shapes. A step with no usable
    /// shape is an empty inner vector, not an error.
    pub nested: Vec<Vec<Vec<Coordinate>>>,
    /// Concatenation of every step's coordinates across every leg.
    pub flat: Vec<Coordinate>,
}

impl FlatRoutePoints {
    pub fn is_empty(&self) -> bool {
        self.flat.is_empty()
    }

    /// Total number of coordinates in the flat sequence.
    pub fn point_count(&self) -> usize {
        self.flat.len()
    }
}

/// Flatten a route's geometry. A route with zero legs yields an empty
/// result.
pub fn flatten_route(route: &Route) -> FlatRoutePoints {
    let mut nested = Vec::with_capacity(route.legs.len());
    let mut flat = Vec::new();

    for leg in &route.legs {
        let mut leg_points = Vec::with_capacity(leg.steps.len());
        for step in &leg.steps {
            let shape = step.shape.clone().unwrap_or_default();
            flat.extend_from_slice(&shape);
            leg_points.push(shape);
        }
        nested.push(leg_points);
    }

    FlatRoutePoints { nested, flat }
}
