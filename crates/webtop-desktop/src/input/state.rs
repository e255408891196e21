use crate::math::{SizeConstraints, Vec2, WindowGeometry};
use crate::types::WindowId;

use super::ResizeDirection;

/// Kind of pointer gesture, used for feedback cues
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureKind {
    Drag,
    Resize,
}

/// Snapshot taken when a gesture begins plus the live geometry
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActiveGesture {
    pub window_id: WindowId,
    /// Pointer position at gesture start
    pub origin_pointer: Vec2,
    /// Window geometry at gesture start
    pub origin: WindowGeometry,
    /// Last good geometry (what a commit would write)
    pub current: WindowGeometry,
    pub constraints: SizeConstraints,
}

impl ActiveGesture {
    pub(crate) fn new(
        window_id: WindowId,
        origin_pointer: Vec2,
        origin: WindowGeometry,
        constraints: SizeConstraints,
    ) -> Self {
        Self {
            window_id,
            origin_pointer,
            origin,
            current: origin,
            constraints,
        }
    }
}

/// Gesture state machine.
///
/// `Idle -> Dragging -> Idle` and `Idle -> Resizing -> Idle`. The two
/// active states are exclusive; entering one replaces the other.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging(ActiveGesture),
    Resizing {
        gesture: ActiveGesture,
        direction: ResizeDirection,
    },
}

impl GestureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, GestureState::Idle)
    }

    /// Kind of the active gesture
    pub fn kind(&self) -> Option<GestureKind> {
        match self {
            GestureState::Idle => None,
            GestureState::Dragging(_) => Some(GestureKind::Drag),
            GestureState::Resizing { .. } => Some(GestureKind::Resize),
        }
    }

    /// The active gesture, if any
    pub fn gesture(&self) -> Option<&ActiveGesture> {
        match self {
            GestureState::Idle => None,
            GestureState::Dragging(gesture) | GestureState::Resizing { gesture, .. } => {
                Some(gesture)
            }
        }
    }

    pub(crate) fn gesture_mut(&mut self) -> Option<&mut ActiveGesture> {
        match self {
            GestureState::Idle => None,
            GestureState::Dragging(gesture) | GestureState::Resizing { gesture, .. } => {
                Some(gesture)
            }
        }
    }
}
