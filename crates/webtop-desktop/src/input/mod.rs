//! Pointer gesture handling
//!
//! Pure geometry for drag and resize, the gesture state machine and the
//! host hooks it drives.

mod direction;
mod drag;
mod host;
mod interaction;
mod resize;
mod state;

pub use direction::ResizeDirection;
pub use drag::calculate_drag;
pub use host::{GestureHost, GestureSurface};
pub use interaction::{GestureTarget, InteractionEngine};
pub use resize::calculate_resize;
pub use state::{ActiveGesture, GestureKind, GestureState};

use serde::Serialize;

/// Result of routing a pointer event through the desktop
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum InputResult {
    /// Input was consumed by the desktop
    Handled,
    /// Input was not over anything the desktop owns
    Unhandled,
    /// Input should go to the window's content
    Forward {
        window_id: crate::types::WindowId,
        local_x: f32,
        local_y: f32,
    },
}
