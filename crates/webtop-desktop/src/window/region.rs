use serde::{Deserialize, Serialize};

use crate::input::ResizeDirection;

/// Part of a window under the pointer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowRegion {
    TitleBar,
    Content,
    CloseButton,
    MinimizeButton,
    MaximizeButton,
    ResizeN,
    ResizeS,
    ResizeE,
    ResizeW,
    ResizeNE,
    ResizeNW,
    ResizeSE,
    ResizeSW,
}

impl WindowRegion {
    /// Check if this region is a resize handle
    pub fn is_resize(self) -> bool {
        self.resize_direction().is_some()
    }

    /// Direction of a resize handle
    pub fn resize_direction(self) -> Option<ResizeDirection> {
        match self {
            WindowRegion::ResizeN => Some(ResizeDirection::N),
            WindowRegion::ResizeS => Some(ResizeDirection::S),
            WindowRegion::ResizeE => Some(ResizeDirection::E),
            WindowRegion::ResizeW => Some(ResizeDirection::W),
            WindowRegion::ResizeNE => Some(ResizeDirection::NE),
            WindowRegion::ResizeNW => Some(ResizeDirection::NW),
            WindowRegion::ResizeSE => Some(ResizeDirection::SE),
            WindowRegion::ResizeSW => Some(ResizeDirection::SW),
            _ => None,
        }
    }

    /// Handle region for a resize direction
    pub fn from_direction(direction: ResizeDirection) -> Self {
        match direction {
            ResizeDirection::N => WindowRegion::ResizeN,
            ResizeDirection::S => WindowRegion::ResizeS,
            ResizeDirection::E => WindowRegion::ResizeE,
            ResizeDirection::W => WindowRegion::ResizeW,
            ResizeDirection::NE => WindowRegion::ResizeNE,
            ResizeDirection::NW => WindowRegion::ResizeNW,
            ResizeDirection::SE => WindowRegion::ResizeSE,
            ResizeDirection::SW => WindowRegion::ResizeSW,
        }
    }
}
