use crate::math::Rect;
use crate::window::WindowRegistry;

use super::GestureKind;

/// Side effects a gesture asks of the host UI.
///
/// All hooks default to no-ops so headless hosts only implement what they
/// need.
pub trait GestureSurface {
    /// Install the global pointer-move / pointer-up listeners
    fn attach_pointer_listeners(&mut self) {}

    /// Remove the listeners installed by `attach_pointer_listeners`
    fn detach_pointer_listeners(&mut self) {}

    /// Start the feedback cue (sound) for a gesture
    fn start_cue(&mut self, _kind: GestureKind) {}

    /// Stop any running feedback cue
    fn stop_cue(&mut self) {}
}

/// Everything the interaction engine needs from its host
pub trait GestureHost: WindowRegistry + GestureSurface {
    /// Bounds of the containing element, if it is currently mounted
    fn container_bounds(&self) -> Option<Rect>;

    /// Viewport rectangle, used when the container is unavailable
    fn viewport_bounds(&self) -> Rect;
}
