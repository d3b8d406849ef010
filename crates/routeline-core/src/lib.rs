pub mod flatten;
pub mod geometry;
pub mod gradient;
pub mod index;
pub mod locate;
pub mod projection;
pub mod tracker;

pub use flatten::{flatten_route, FlatRoutePoints};
pub use geometry::{
    CongestionSegment, CongestionSeverity, Coordinate, LocationFix, ProgressSnapshot, Route,
    RouteLeg, RouteStep,
};
pub use gradient::{
    build_route_line_gradient, parse_hex_color, ColorParseError, GradientStops, RouteLineColors,
    STOP_EPSILON,
};
pub use index::{DistanceEntry, DistanceTable};
pub use locate::upcoming_point_index;
pub use projection::{haversine_distance, planar_distance, project_x, project_y};
pub use tracker::{FractionUpdate, RouteProgressTracker, TraveledFraction};
