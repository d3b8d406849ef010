//! Per-route display state.
//!
//! The view owns everything the route display mutates: the progress
//! tracker, the congestion list, the layer identifiers, and the single
//! outstanding animation handle. Progress updates are applied serially
//! in arrival order; re-entrancy and shared mutation are the sink's
//! problem, not ours.

use std::sync::Arc;

use tracing::{debug, info};

use routeline_core::{
    build_route_line_gradient, CongestionSegment, Coordinate, ProgressSnapshot, Route,
    RouteLineColors, RouteProgressTracker,
};

use crate::animator::{spawn_animation, AnimationHandle, AnimationSpec};
use crate::layer::{LayerIds, LineLayerSink};

struct ActiveRoute {
    tracker: RouteProgressTracker,
    congestion: Option<Vec<CongestionSegment>>,
    layers: LayerIds,
}

/// Route-line display controller bound to a rendering sink.
pub struct RouteLineView<S: LineLayerSink> {
    sink: Arc<S>,
    colors: RouteLineColors,
    active: Option<ActiveRoute>,
    animation: Option<AnimationHandle>,
}

impl<S: LineLayerSink> RouteLineView<S> {
    pub fn new(sink: Arc<S>, colors: RouteLineColors) -> Self {
        Self {
            sink,
            colors,
            active: None,
            animation: None,
        }
    }

    /// Replace the displayed route. Cancels any in-flight animation,
    /// rebuilds the flattened geometry and distance table, and paints
    /// the initial (nothing traveled) gradients.
    pub fn set_route(
        &mut self,
        route_name: &str,
        route: &Route,
        congestion: Option<Vec<CongestionSegment>>,
    ) {
        self.cancel_animation();
        if let Some(previous) = self.active.take() {
            self.sink.remove_layer(&previous.layers.main);
            self.sink.remove_layer(&previous.layers.casing);
        }

        let tracker = RouteProgressTracker::new(route);
        let layers = LayerIds::for_route(route_name);
        info!(
            route = route_name,
            points = tracker.flat_points().point_count(),
            "route line set"
        );

        let main = build_route_line_gradient(0.0, congestion.as_deref(), &self.colors);
        let casing = build_route_line_gradient(0.0, None, &self.colors);
        self.sink.apply_gradient(&layers.main, &main);
        self.sink.apply_gradient(&layers.casing, &casing);

        self.active = Some(ActiveRoute {
            tracker,
            congestion,
            layers,
        });
    }

    /// Apply one progress update from the navigation collaborator.
    ///
    /// Completion (`fraction >= 1`) removes both layers and drops the
    /// route state; an unchanged fraction schedules nothing; everything
    /// else cancels the outstanding animation and starts a fresh one.
    pub fn on_progress(&mut self, progress: &ProgressSnapshot, location: Coordinate) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let Some(update) = active.tracker.update(progress, location) else {
            return;
        };

        if update.current >= 1.0 {
            debug!("route fully traveled; removing line layers");
            if let Some(handle) = self.animation.take() {
                handle.cancel();
            }
            if let Some(finished) = self.active.take() {
                self.sink.remove_layer(&finished.layers.main);
                self.sink.remove_layer(&finished.layers.casing);
            }
            return;
        }

        if update.current == update.previous {
            return;
        }

        if let Some(handle) = self.animation.take() {
            handle.cancel();
        }
        let spec = AnimationSpec {
            previous_fraction: update.previous,
            current_fraction: update.current,
            congestion: active.congestion.clone(),
            colors: self.colors.clone(),
            layers: active.layers.clone(),
        };
        self.animation = Some(spawn_animation(Arc::clone(&self.sink), spec));
    }

    /// Tear down the display: cancel animation, remove layers, drop
    /// route state.
    pub fn clear(&mut self) {
        self.cancel_animation();
        if let Some(active) = self.active.take() {
            self.sink.remove_layer(&active.layers.main);
            self.sink.remove_layer(&active.layers.casing);
        }
    }

    /// Current traveled fraction, zero when no route is displayed.
    pub fn fraction_traveled(&self) -> f64 {
        self.active
            .as_ref()
            .map(|active| active.tracker.fraction().current)
            .unwrap_or(0.0)
    }

    pub fn has_active_animation(&self) -> bool {
        self.animation
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    fn cancel_animation(&mut self) {
        if let Some(handle) = self.animation.take() {
            handle.cancel();
        }
    }
}

impl<S: LineLayerSink> Drop for RouteLineView<S> {
    fn drop(&mut self) {
        self.cancel_animation();
    }
}
