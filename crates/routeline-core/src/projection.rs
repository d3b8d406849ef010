//! Coordinate projection and distance math.
//!
//! The route-line engine works in a unit-square Web-Mercator-like
//! projection. Distances in that space are a relative metric used only
//! for proportional comparisons within a single route; they are much
//! cheaper than geodesic distance and that is the point. Haversine is
//! kept for the one place meter-denominated distances are required
//! (trimming a step shape against the navigation engine's reported
//! along-step distance).

use crate::geometry::Coordinate;

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Project a longitude onto the unit square's horizontal axis.
pub fn project_x(lon: f64) -> f64 {
    lon / 360.0 + 0.5
}

/// Project a latitude onto the unit square's vertical axis.
///
/// Out-of-range latitudes clamp to [0, 1]. The reference behavior this
/// engine was modeled on clamped the upper bound to 1.1; that value is
/// a defect and is corrected here.
pub fn project_y(lat: f64) -> f64 {
    let sin_lat = lat.to_radians().sin();
    let y = 0.5 - 0.25 * ((1.0 + sin_lat) / (1.0 - sin_lat)).ln() / std::f64::consts::PI;
    y.clamp(0.0, 1.0)
}

/// Planar Euclidean distance between two coordinates in projected
/// unit-square space.
pub fn planar_distance(a: Coordinate, b: Coordinate) -> f64 {
    let dx = project_x(a.lon) - project_x(b.lon);
    let dy = project_y(a.lat) - project_y(b.lat);
    (dx * dx + dy * dy).sqrt()
}

/// Great-circle distance between two coordinates in meters.
pub fn haversine_distance(a: Coordinate, b: Coordinate) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let dphi = (b.lat - a.lat).to_radians();
    let dlambda = (b.lon - a.lon).to_radians();
    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_x_spans_unit_interval() {
        assert!((project_x(-180.0) - 0.0).abs() < 1e-12);
        assert!((project_x(0.0) - 0.5).abs() < 1e-12);
        assert!((project_x(180.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn project_y_clamps_to_unit_interval() {
        // Extreme latitudes blow up the mercator formula; they must
        // land on the clamp, not escape it.
        assert_eq!(project_y(90.0), 0.0);
        assert_eq!(project_y(-90.0), 1.0);
        assert!((project_y(0.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn planar_distance_is_zero_for_identical_points() {
        let p = Coordinate::new(47.3769, 8.5417);
        assert_eq!(planar_distance(p, p), 0.0);
    }

    #[test]
    fn planar_distance_is_non_negative_and_symmetric() {
        let a = Coordinate::new(47.0, 8.0);
        let b = Coordinate::new(47.1, 8.2);
        let d = planar_distance(a, b);
        assert!(d > 0.0);
        assert!((d - planar_distance(b, a)).abs() < 1e-15);
    }

    #[test]
    fn haversine_known_distance() {
        // ~111km per degree of latitude
        let d = haversine_distance(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0));
        assert!((d - 111_194.0).abs() < 100.0);
    }
}
