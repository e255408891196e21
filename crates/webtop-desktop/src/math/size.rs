use serde::{Deserialize, Serialize};

/// Window or viewport dimensions in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Component-wise maximum; used to enforce a minimum size
    pub fn max(self, other: Size) -> Size {
        Size::new(self.width.max(other.width), self.height.max(other.height))
    }

    /// Both dimensions are finite
    pub fn is_finite(self) -> bool {
        self.width.is_finite() && self.height.is_finite()
    }
}
