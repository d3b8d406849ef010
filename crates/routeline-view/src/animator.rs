//! Gradient transition animation.
//!
//! A fraction update is not painted as a jump cut: a short task
//! interpolates from the previous fraction to the new one over a fixed
//! wall-clock window, rebuilding and re-applying the gradients at each
//! tick. At most one task may be outstanding per route view; starting a
//! new one requires canceling the old handle first.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant};
use tracing::debug;

use routeline_core::{build_route_line_gradient, CongestionSegment, RouteLineColors};

use crate::layer::{LayerIds, LineLayerSink};

/// Tick cadence of the interpolation task.
pub const TICK_INTERVAL: Duration = Duration::from_millis(40);
/// Total interpolation window.
pub const ANIMATION_WINDOW_MS: u64 = 1000;

/// Handle to an in-flight gradient animation. Dropping the handle does
/// not cancel the task; call [`AnimationHandle::cancel`].
pub struct AnimationHandle {
    cancel_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl AnimationHandle {
    /// Stop the animation before its window elapses. Idempotent.
    pub fn cancel(&self) {
        if !*self.cancel_tx.borrow() {
            let _ = self.cancel_tx.send(true);
            debug!("gradient animation canceled");
        }
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Parameters for one animation run.
pub struct AnimationSpec {
    pub previous_fraction: f64,
    pub current_fraction: f64,
    pub congestion: Option<Vec<CongestionSegment>>,
    pub colors: RouteLineColors,
    pub layers: LayerIds,
}

/// Spawn the interpolation task. The caller is responsible for having
/// canceled any prior handle.
pub fn spawn_animation<S: LineLayerSink>(sink: Arc<S>, spec: AnimationSpec) -> AnimationHandle {
    let (cancel_tx, mut cancel_rx) = watch::channel(false);

    let task = tokio::spawn(async move {
        let start = Instant::now();
        let mut ticker = interval(TICK_INTERVAL);
        // The first tick of a tokio interval fires immediately; that
        // paints the previous fraction and keeps the line stable while
        // the window ramps up.
        loop {
            tokio::select! {
                _ = cancel_rx.changed() => {
                    if *cancel_rx.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    let elapsed_ms = start.elapsed().as_millis().min(u128::from(ANIMATION_WINDOW_MS)) as u64;
                    let elapsed_fraction = elapsed_ms as f64 / ANIMATION_WINDOW_MS as f64;
                    let interpolated = spec.previous_fraction
                        + (spec.current_fraction - spec.previous_fraction) * elapsed_fraction;

                    let main = build_route_line_gradient(
                        interpolated,
                        spec.congestion.as_deref(),
                        &spec.colors,
                    );
                    let casing = build_route_line_gradient(interpolated, None, &spec.colors);
                    sink.apply_gradient(&spec.layers.main, &main);
                    sink.apply_gradient(&spec.layers.casing, &casing);

                    if elapsed_ms >= ANIMATION_WINDOW_MS {
                        break;
                    }
                }
            }
        }
    });

    AnimationHandle { cancel_tx, task }
}
