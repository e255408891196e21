use serde::{Deserialize, Serialize};

use super::{Rect, Size, Vec2};

/// Position and size of a window
///
/// Mutated freely while a gesture is active; written back to the window
/// registry only when the gesture ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowGeometry {
    pub position: Vec2,
    pub size: Size,
}

impl WindowGeometry {
    /// Create a geometry from position and size
    pub const fn new(position: Vec2, size: Size) -> Self {
        Self { position, size }
    }

    /// Create a geometry from raw components
    pub const fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// Rectangle covered by this geometry
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.position, self.size)
    }

    /// All components are finite
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.size.is_finite()
    }
}
