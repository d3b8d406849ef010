//! Upcoming point location.
//!
//! Given the navigation engine's reported progress (leg index, step
//! index, distance traveled within the step), finds the index into the
//! flat sequence of the nearest point at or ahead of the user. That
//! index anchors the traveled-fraction computation against the
//! precomputed remaining-distance table.

use tracing::warn;

use crate::flatten::FlatRoutePoints;
use crate::geometry::{Coordinate, ProgressSnapshot};
use crate::projection::haversine_distance;

/// Locate the flat-sequence index of the nearest point at or ahead of
/// the user's current along-route position.
///
/// Returns `None` when the route has no geometry, or when the snapshot
/// references a leg/step outside the stored nested structure. The
/// latter is a caller contract violation (a snapshot from a different
/// route than the one the table was built from); it trips a
/// `debug_assert!` in debug builds and degrades to "no update" in
/// release.
pub fn upcoming_point_index(
    points: &FlatRoutePoints,
    progress: &ProgressSnapshot,
) -> Option<usize> {
    if points.is_empty() {
        return None;
    }

    let Some(leg) = points.nested.get(progress.leg_index) else {
        debug_assert!(
            false,
            "progress leg index {} out of range ({} legs)",
            progress.leg_index,
            points.nested.len()
        );
        warn!(
            leg_index = progress.leg_index,
            legs = points.nested.len(),
            "progress snapshot references unknown leg; dropping update"
        );
        return None;
    };
    let Some(step_shape) = leg.get(progress.step_index) else {
        debug_assert!(
            false,
            "progress step index {} out of range ({} steps in leg {})",
            progress.step_index,
            leg.len(),
            progress.leg_index
        );
        warn!(
            leg_index = progress.leg_index,
            step_index = progress.step_index,
            "progress snapshot references unknown step; dropping update"
        );
        return None;
    };

    let mut all_remaining = points_ahead_in_step(
        step_shape,
        progress.distance_traveled_m,
        progress.step_distance_m,
    );

    // Every step after the current one within the current leg counts in
    // full, as does every later leg.
    for shape in leg.iter().skip(progress.step_index + 1) {
        all_remaining += shape.len();
    }
    for later_leg in points.nested.iter().skip(progress.leg_index + 1) {
        for shape in later_leg {
            all_remaining += shape.len();
        }
    }

    let total = points.point_count();
    // all_remaining counts at most every point but the first; a current
    // step with no geometry of its own can still push the count to the
    // full total, in which case there is no point behind the user to
    // anchor on.
    match total.checked_sub(all_remaining + 1) {
        Some(index) => Some(index),
        None => {
            warn!(
                total,
                all_remaining, "no anchor point behind current position; dropping update"
            );
            None
        }
    }
}

/// Count the step-shape coordinates strictly ahead of the user's
/// along-step position.
///
/// Equivalent to trimming the shape to `[distance_traveled, step
/// total]` and taking the trimmed point count minus one: vertices whose
/// cumulative arc length from the step start exceeds the traveled
/// distance, up to the step's reported total. A shape whose arc length
/// runs past the reported total contributes one point for the trimmed
/// end, the interpolated terminus, in place of everything beyond it. A
/// step with fewer than two usable coordinates contributes nothing.
fn points_ahead_in_step(
    shape: &[Coordinate],
    distance_traveled_m: f64,
    step_distance_m: f64,
) -> usize {
    if shape.len() < 2 {
        return 0;
    }

    let step_total = step_distance_m.max(0.0);
    let traveled = distance_traveled_m.clamp(0.0, step_total);
    let mut cumulative = 0.0;
    let mut ahead = 0;

    for pair in shape.windows(2) {
        cumulative += haversine_distance(pair[0], pair[1]);
        if cumulative <= traveled {
            continue;
        }
        ahead += 1;
        if cumulative > step_total {
            break;
        }
    }

    ahead
}
