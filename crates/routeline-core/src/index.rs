//! Granular remaining-distance index.
//!
//! One back-to-front pass over the flat coordinate sequence yields,
//! for every point, the planar distance from that point to the route's
//! terminal point. Progress updates then reduce to a table lookup plus
//! one distance call instead of re-walking the route.

use crate::geometry::Coordinate;
use crate::projection::planar_distance;

/// A flat-sequence point paired with the cumulative planar distance
/// remaining from it to the end of the route.
#[derive(Debug, Clone, Copy)]
pub struct DistanceEntry {
    pub point: Coordinate,
    pub distance_remaining: f64,
}

/// Remaining-distance table, index-aligned with the flat coordinate
/// sequence it was built from. Read-only after construction.
#[derive(Debug, Clone)]
pub struct DistanceTable {
    entries: Vec<DistanceEntry>,
}

impl DistanceTable {
    /// Build the table from a flat coordinate sequence. Returns `None`
    /// for an empty sequence.
    pub fn build(points: &[Coordinate]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }

        let mut entries: Vec<DistanceEntry> = points
            .iter()
            .map(|&point| DistanceEntry {
                point,
                distance_remaining: 0.0,
            })
            .collect();

        let mut running = 0.0;
        for i in (1..points.len()).rev() {
            running += planar_distance(points[i], points[i - 1]);
            entries[i - 1].distance_remaining = running;
        }

        Some(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DistanceEntry> {
        self.entries.get(index)
    }

    /// Total planar distance of the route (remaining distance at the
    /// first point).
    pub fn total_distance(&self) -> f64 {
        self.entries
            .first()
            .map(|entry| entry.distance_remaining)
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon)
    }

    #[test]
    fn empty_input_yields_no_table() {
        assert!(DistanceTable::build(&[]).is_none());
    }

    #[test]
    fn single_point_has_zero_remaining() {
        let table = DistanceTable::build(&[coord(1.0, 1.0)]).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.total_distance(), 0.0);
    }

    #[test]
    fn remaining_distance_is_non_increasing_and_ends_at_zero() {
        let points = vec![
            coord(0.0, 0.0),
            coord(0.0, 0.1),
            coord(0.1, 0.1),
            coord(0.1, 0.3),
            coord(0.2, 0.3),
        ];
        let table = DistanceTable::build(&points).unwrap();
        assert_eq!(table.len(), points.len());

        for i in 1..table.len() {
            let prev = table.get(i - 1).unwrap().distance_remaining;
            let curr = table.get(i).unwrap().distance_remaining;
            assert!(prev >= curr, "entry {i} increased: {prev} -> {curr}");
        }
        assert_eq!(table.get(table.len() - 1).unwrap().distance_remaining, 0.0);
    }

    #[test]
    fn first_entry_equals_sum_of_segment_distances() {
        let points = vec![coord(0.0, 0.0), coord(0.0, 0.2), coord(0.15, 0.2)];
        let table = DistanceTable::build(&points).unwrap();

        let expected: f64 = points
            .windows(2)
            .map(|pair| planar_distance(pair[0], pair[1]))
            .sum();
        assert!((table.total_distance() - expected).abs() < 1e-15);
    }

    #[test]
    fn duplicate_neighbors_add_no_distance() {
        let p = coord(5.0, 5.0);
        let points = vec![coord(4.9, 5.0), p, p, coord(5.1, 5.0)];
        let table = DistanceTable::build(&points).unwrap();
        let a = table.get(1).unwrap().distance_remaining;
        let b = table.get(2).unwrap().distance_remaining;
        assert_eq!(a, b);
    }
}
