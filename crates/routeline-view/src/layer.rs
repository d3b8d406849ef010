//! Rendering sink seam.
//!
//! The map rendering pipeline is an external collaborator; this crate
//! only pushes gradient expressions at named layers and removes them
//! when a route is fully traveled.

use routeline_core::GradientStops;

/// Sink for rendered route-line layers. Implementations must tolerate
/// repeated applies to the same layer and removal of layers that were
/// never applied.
pub trait LineLayerSink: Send + Sync + 'static {
    fn apply_gradient(&self, layer_id: &str, stops: &GradientStops);
    fn remove_layer(&self, layer_id: &str);
}

/// Stable identifiers for the two layers a displayed route owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerIds {
    pub main: String,
    pub casing: String,
}

impl LayerIds {
    /// Derive the layer pair from a caller-chosen route name.
    pub fn for_route(route_name: &str) -> Self {
        Self {
            main: format!("route-line-{route_name}"),
            casing: format!("route-line-casing-{route_name}"),
        }
    }
}
