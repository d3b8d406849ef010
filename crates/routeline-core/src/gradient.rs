//! Gradient stop construction.
//!
//! Turns a traveled fraction plus optional per-segment congestion
//! classification into a sorted (position, color) sequence for the
//! rendering sink. Stop positions are quantized to a fixed precision
//! so keys from independent computations sort deterministically;
//! duplicate keys resolve last-write-wins. Epsilon offsets around
//! segment boundaries keep adjacent color bands from anti-aliasing
//! into each other at the rendering layer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::geometry::{CongestionSegment, CongestionSeverity};

/// Quantization scale for stop positions: ten-millionths.
const STOP_KEY_SCALE: f64 = 1e7;

/// Smallest representable gap between two stops; one quantum of the
/// stop precision, so `fraction - STOP_EPSILON` always survives
/// rounding as a distinct key.
pub const STOP_EPSILON: f64 = 1.0 / STOP_KEY_SCALE;

/// Route line color configuration: the traveled portion, the base
/// casing, and the severity table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteLineColors {
    pub traversed: String,
    pub casing: String,
    pub low: String,
    pub moderate: String,
    pub heavy: String,
    pub severe: String,
    pub unknown: String,
}

impl Default for RouteLineColors {
    fn default() -> Self {
        Self {
            traversed: "#B5B5B5".to_string(),
            casing: "#2F7AC6".to_string(),
            low: "#56A8FB".to_string(),
            moderate: "#FF9500".to_string(),
            heavy: "#FF4D4D".to_string(),
            severe: "#8F2447".to_string(),
            unknown: "#56A8FB".to_string(),
        }
    }
}

impl RouteLineColors {
    /// Color for a congestion severity; anything without a dedicated
    /// entry maps to the unknown color.
    pub fn for_severity(&self, severity: CongestionSeverity) -> &str {
        match severity {
            CongestionSeverity::Low => &self.low,
            CongestionSeverity::Moderate => &self.moderate,
            CongestionSeverity::Heavy => &self.heavy,
            CongestionSeverity::Severe => &self.severe,
            CongestionSeverity::Unknown => &self.unknown,
        }
    }

    /// Validate every configured color parses as `#RRGGBB`.
    pub fn validate(&self) -> Result<(), ColorParseError> {
        for color in [
            &self.traversed,
            &self.casing,
            &self.low,
            &self.moderate,
            &self.heavy,
            &self.severe,
            &self.unknown,
        ] {
            parse_hex_color(color)?;
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("color `{0}` is not a #RRGGBB hex string")]
    Malformed(String),
}

/// Parse a `#RRGGBB` hex color into its channels.
pub fn parse_hex_color(hex: &str) -> Result<(u8, u8, u8), ColorParseError> {
    let value = hex.strip_prefix('#').unwrap_or(hex);
    if value.len() != 6 || !value.is_ascii() {
        return Err(ColorParseError::Malformed(hex.to_string()));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&value[range], 16).map_err(|_| ColorParseError::Malformed(hex.to_string()))
    };
    Ok((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Sorted mapping from normalized line position to color.
///
/// Keys are positions quantized to [`STOP_EPSILON`] precision; negative
/// positions are dropped at insertion and positions above 1 clamp to 1.
/// Inserting an existing key overwrites it (last write wins).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GradientStops {
    stops: BTreeMap<u64, String>,
}

impl GradientStops {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a stop. Negative positions are silently dropped.
    pub fn insert(&mut self, position: f64, color: impl Into<String>) {
        if position < 0.0 || !position.is_finite() {
            return;
        }
        let key = (position.min(1.0) * STOP_KEY_SCALE).round() as u64;
        self.stops.insert(key, color.into());
    }

    /// Remove every stop strictly below `position`.
    pub fn discard_below(&mut self, position: f64) {
        let threshold = (position.clamp(0.0, 1.0) * STOP_KEY_SCALE).round() as u64;
        self.stops.retain(|&key, _| key >= threshold);
    }

    /// First stop at or above `position`, if any.
    pub fn first_at_or_above(&self, position: f64) -> Option<(f64, &str)> {
        let threshold = (position.clamp(0.0, 1.0) * STOP_KEY_SCALE).round() as u64;
        self.stops
            .range(threshold..)
            .next()
            .map(|(&key, color)| (key as f64 / STOP_KEY_SCALE, color.as_str()))
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Stops in ascending position order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, &str)> + '_ {
        self.stops
            .iter()
            .map(|(&key, color)| (key as f64 / STOP_KEY_SCALE, color.as_str()))
    }

    /// Render as a line-progress interpolation expression for the
    /// rendering sink.
    pub fn to_expression(&self) -> Value {
        let mut expr = vec![json!("step"), json!(["line-progress"])];
        let mut stops = self.iter();
        if let Some((_, first_color)) = stops.next() {
            expr.push(json!(first_color));
        }
        for (position, color) in self.iter().skip(1) {
            expr.push(json!(position));
            expr.push(json!(color));
        }
        Value::Array(expr)
    }
}

/// Build the gradient for a traveled fraction and optional congestion
/// classification.
///
/// Without congestion data the line is a hard two-color split at the
/// traveled fraction. With congestion data the untraveled portion keeps
/// per-segment severity colors and the traveled portion is painted
/// over uniformly.
pub fn build_route_line_gradient(
    fraction: f64,
    congestion: Option<&[CongestionSegment]>,
    colors: &RouteLineColors,
) -> GradientStops {
    let fraction = fraction.clamp(0.0, 1.0);

    let segments = match congestion {
        Some(segments) if !segments.is_empty() => segments,
        _ => return hard_split(fraction, colors),
    };

    let total: f64 = segments.iter().map(|segment| segment.planar_length).sum();
    if total <= 0.0 {
        return hard_split(fraction, colors);
    }

    let mut stops = GradientStops::new();
    let mut accumulated = 0.0;

    for (i, segment) in segments.iter().enumerate() {
        let color = colors.for_severity(segment.severity);
        if i == 0 {
            stops.insert(0.0, color);
        }
        accumulated += segment.planar_length;
        let end = accumulated / total;

        if let Some(next) = segments.get(i + 1) {
            stops.insert(end - STOP_EPSILON, color);
            stops.insert(end + STOP_EPSILON, colors.for_severity(next.severity));
        } else {
            stops.insert(1.0, color);
        }
    }

    // Paint the traveled portion over whatever congestion coloring it
    // overlaps.
    let boundary_color = stops
        .first_at_or_above(fraction)
        .map(|(_, color)| color.to_string())
        .unwrap_or_else(|| colors.for_severity(segments[segments.len() - 1].severity).to_string());
    stops.discard_below(fraction);
    stops.insert(0.0, colors.traversed.clone());
    stops.insert(fraction - STOP_EPSILON, colors.traversed.clone());
    stops.insert(fraction, boundary_color);

    stops
}

/// Two-color split at the traveled fraction: traversed behind, casing
/// ahead.
fn hard_split(fraction: f64, colors: &RouteLineColors) -> GradientStops {
    let mut stops = GradientStops::new();
    stops.insert(0.0, colors.traversed.clone());
    stops.insert(fraction - STOP_EPSILON, colors.traversed.clone());
    stops.insert(fraction, colors.casing.clone());
    stops
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(severity: CongestionSeverity, planar_length: f64) -> CongestionSegment {
        CongestionSegment {
            severity,
            planar_length,
        }
    }

    #[test]
    fn no_congestion_produces_hard_split() {
        let colors = RouteLineColors::default();
        let stops = build_route_line_gradient(0.5, None, &colors);
        let collected: Vec<_> = stops.iter().map(|(p, c)| (p, c.to_string())).collect();
        assert_eq!(collected.len(), 3);
        assert_eq!(collected[0], (0.0, colors.traversed.clone()));
        assert!((collected[1].0 - (0.5 - STOP_EPSILON)).abs() < 1e-12);
        assert_eq!(collected[1].1, colors.traversed);
        assert_eq!(collected[2], (0.5, colors.casing.clone()));
    }

    #[test]
    fn zero_fraction_collapses_to_single_casing_stop() {
        // 0 - epsilon is negative and dropped; the traversed stop at 0
        // is then overwritten by the casing stop (last write wins).
        let colors = RouteLineColors::default();
        let stops = build_route_line_gradient(0.0, None, &colors);
        assert_eq!(stops.len(), 1);
        let (position, color) = stops.iter().next().unwrap();
        assert_eq!(position, 0.0);
        assert_eq!(color, colors.casing);
    }

    #[test]
    fn stops_are_sorted_unique_and_in_unit_range() {
        let colors = RouteLineColors::default();
        let segments = vec![
            segment(CongestionSeverity::Low, 3.0),
            segment(CongestionSeverity::Heavy, 1.0),
            segment(CongestionSeverity::Moderate, 2.0),
        ];
        for fraction in [0.0, 0.2, 0.5, 0.75, 1.0] {
            let stops = build_route_line_gradient(fraction, Some(&segments), &colors);
            let positions: Vec<f64> = stops.iter().map(|(p, _)| p).collect();
            for pair in positions.windows(2) {
                assert!(pair[0] < pair[1], "positions not strictly ascending");
            }
            for p in &positions {
                assert!((0.0..=1.0).contains(p), "position {p} outside unit range");
            }
        }
    }

    #[test]
    fn congestion_boundaries_get_epsilon_stops() {
        let colors = RouteLineColors::default();
        let segments = vec![
            segment(CongestionSeverity::Low, 1.0),
            segment(CongestionSeverity::Severe, 1.0),
        ];
        let stops = build_route_line_gradient(0.0, Some(&segments), &colors);
        let collected: Vec<_> = stops.iter().map(|(p, c)| (p, c.to_string())).collect();

        // fraction 0 paints the start stop over with the low color via
        // the traveled overlay's boundary stop.
        assert_eq!(collected.first().unwrap().0, 0.0);
        assert_eq!(collected.first().unwrap().1, colors.low);
        // Severity boundary at 0.5 straddled by epsilon stops.
        assert!(collected
            .iter()
            .any(|(p, c)| (*p - (0.5 - STOP_EPSILON)).abs() < 1e-12 && *c == colors.low));
        assert!(collected
            .iter()
            .any(|(p, c)| (*p - (0.5 + STOP_EPSILON)).abs() < 1e-12 && *c == colors.severe));
        assert_eq!(collected.last().unwrap(), &(1.0, colors.severe.clone()));
    }

    #[test]
    fn traveled_overlay_discards_congestion_behind_user() {
        let colors = RouteLineColors::default();
        let segments = vec![
            segment(CongestionSeverity::Heavy, 1.0),
            segment(CongestionSeverity::Low, 1.0),
        ];
        let stops = build_route_line_gradient(0.75, Some(&segments), &colors);

        // Nothing but the traveled stops below 0.75.
        for (position, color) in stops.iter() {
            if position < 0.75 - STOP_EPSILON / 2.0 {
                assert_eq!(color, colors.traversed, "stop at {position} not traversed");
            }
        }
        // The boundary stop takes the color of the nearest retained
        // stop (the low segment's terminal stop at 1.0).
        let (_, boundary) = stops.first_at_or_above(0.75).unwrap();
        assert_eq!(boundary, colors.low);
    }

    #[test]
    fn unknown_severity_maps_to_unknown_color() {
        let colors = RouteLineColors::default();
        assert_eq!(
            colors.for_severity(CongestionSeverity::Unknown),
            colors.unknown
        );
    }

    #[test]
    fn expression_is_step_over_line_progress() {
        let colors = RouteLineColors::default();
        let stops = build_route_line_gradient(0.5, None, &colors);
        let expr = stops.to_expression();
        let arr = expr.as_array().unwrap();
        assert_eq!(arr[0], "step");
        assert_eq!(arr[1], serde_json::json!(["line-progress"]));
        // first color, then (position, color) pairs
        assert_eq!(arr.len(), 3 + 2 * (stops.len() - 1));
    }

    #[test]
    fn malformed_colors_fail_validation() {
        let mut colors = RouteLineColors::default();
        assert!(colors.validate().is_ok());
        colors.heavy = "#ZZZZZZ".to_string();
        assert!(matches!(
            colors.validate(),
            Err(ColorParseError::Malformed(_))
        ));
    }
}
