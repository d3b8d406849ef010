pub mod animator;
pub mod layer;
pub mod view;

pub use animator::{spawn_animation, AnimationHandle, AnimationSpec, ANIMATION_WINDOW_MS, TICK_INTERVAL};
pub use layer::{LayerIds, LineLayerSink};
pub use view::RouteLineView;
