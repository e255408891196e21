//! Window interaction engine
//!
//! Turns raw pointer positions into live window geometry and commits the
//! final geometry to the registry exactly once per gesture.

use tracing::{debug, trace};

use crate::math::{Rect, SizeConstraints, Vec2, WindowGeometry};
use crate::types::WindowId;

use super::{
    calculate_drag, calculate_resize, ActiveGesture, GestureHost, GestureKind, GestureState,
    ResizeDirection,
};

/// Window a gesture starts on
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureTarget {
    pub window_id: WindowId,
    pub geometry: WindowGeometry,
    pub constraints: SizeConstraints,
}

impl GestureTarget {
    pub fn new(window_id: WindowId, geometry: WindowGeometry) -> Self {
        Self {
            window_id,
            geometry,
            constraints: SizeConstraints::default(),
        }
    }

    pub fn with_constraints(mut self, constraints: SizeConstraints) -> Self {
        self.constraints = constraints;
        self
    }
}

/// Drag/resize state machine.
///
/// The engine owns gesture geometry while a gesture is active. The host's
/// registry only sees it through `commit` when the gesture ends.
#[derive(Debug, Default)]
pub struct InteractionEngine {
    state: GestureState,
}

impl InteractionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    /// Check if a gesture is in progress
    pub fn is_active(&self) -> bool {
        !self.state.is_idle()
    }

    /// Window of the active gesture
    pub fn active_window(&self) -> Option<WindowId> {
        self.state.gesture().map(|g| g.window_id)
    }

    /// Live (uncommitted) geometry of the active gesture
    pub fn live_geometry(&self) -> Option<WindowGeometry> {
        self.state.gesture().map(|g| g.current)
    }

    /// Begin moving a window. Non-finite input is ignored.
    pub fn begin_drag<H>(&mut self, host: &mut H, pointer: Vec2, target: GestureTarget)
    where
        H: GestureHost + ?Sized,
    {
        if !Self::valid_start(pointer, &target) {
            return;
        }
        let gesture = ActiveGesture::new(
            target.window_id,
            pointer,
            target.geometry,
            target.constraints,
        );
        self.enter(host, GestureState::Dragging(gesture), GestureKind::Drag);
    }

    /// Begin resizing a window from an edge or corner. Non-finite input is ignored.
    pub fn begin_resize<H>(
        &mut self,
        host: &mut H,
        pointer: Vec2,
        target: GestureTarget,
        direction: ResizeDirection,
    ) where
        H: GestureHost + ?Sized,
    {
        if !Self::valid_start(pointer, &target) {
            return;
        }
        let gesture = ActiveGesture::new(
            target.window_id,
            pointer,
            target.geometry,
            target.constraints,
        );
        self.enter(
            host,
            GestureState::Resizing { gesture, direction },
            GestureKind::Resize,
        );
    }

    /// Update an active drag.
    ///
    /// Returns the geometry to render, or `None` when no drag is active.
    /// A non-finite pointer keeps the last good geometry.
    pub fn update_drag<H>(&mut self, host: &H, pointer: Vec2) -> Option<WindowGeometry>
    where
        H: GestureHost + ?Sized,
    {
        let bounds = Self::bounds(host);
        let GestureState::Dragging(gesture) = &mut self.state else {
            return None;
        };
        if !pointer.is_finite() {
            return Some(gesture.current);
        }
        let next = calculate_drag(gesture.origin, gesture.origin_pointer, pointer, bounds);
        Some(Self::accept(gesture, next))
    }

    /// Update an active resize. Same contract as [`update_drag`](Self::update_drag).
    pub fn update_resize<H>(&mut self, host: &H, pointer: Vec2) -> Option<WindowGeometry>
    where
        H: GestureHost + ?Sized,
    {
        let bounds = Self::bounds(host);
        let GestureState::Resizing { gesture, direction } = &mut self.state else {
            return None;
        };
        if !pointer.is_finite() {
            return Some(gesture.current);
        }
        let delta = pointer - gesture.origin_pointer;
        let next = calculate_resize(
            *direction,
            gesture.origin,
            delta,
            &gesture.constraints,
            bounds,
        );
        Some(Self::accept(gesture, next))
    }

    /// Update whichever gesture is active
    pub fn update<H>(&mut self, host: &H, pointer: Vec2) -> Option<WindowGeometry>
    where
        H: GestureHost + ?Sized,
    {
        match self.state.kind()? {
            GestureKind::Drag => self.update_drag(host, pointer),
            GestureKind::Resize => self.update_resize(host, pointer),
        }
    }

    /// Finish a drag, committing its geometry once
    pub fn end_drag<H>(&mut self, host: &mut H) -> Option<WindowGeometry>
    where
        H: GestureHost + ?Sized,
    {
        if self.state.kind() != Some(GestureKind::Drag) {
            return None;
        }
        self.finish(host)
    }

    /// Finish a resize, committing its geometry once
    pub fn end_resize<H>(&mut self, host: &mut H) -> Option<WindowGeometry>
    where
        H: GestureHost + ?Sized,
    {
        if self.state.kind() != Some(GestureKind::Resize) {
            return None;
        }
        self.finish(host)
    }

    /// Finish whichever gesture is active (pointer-up)
    pub fn end<H>(&mut self, host: &mut H) -> Option<WindowGeometry>
    where
        H: GestureHost + ?Sized,
    {
        self.finish(host)
    }

    /// Drop any active gesture without committing and release listeners.
    ///
    /// Called when the host surface goes away.
    pub fn teardown<H>(&mut self, host: &mut H)
    where
        H: GestureHost + ?Sized,
    {
        if let Some(gesture) = self.state.gesture() {
            debug!(window_id = gesture.window_id, "gesture torn down");
            host.stop_cue();
            host.detach_pointer_listeners();
            self.state = GestureState::Idle;
        }
    }

    fn valid_start(pointer: Vec2, target: &GestureTarget) -> bool {
        if pointer.is_finite() && target.geometry.is_finite() {
            true
        } else {
            debug!(window_id = target.window_id, "ignoring gesture with non-finite input");
            false
        }
    }

    fn enter<H>(&mut self, host: &mut H, next: GestureState, kind: GestureKind)
    where
        H: GestureHost + ?Sized,
    {
        let was_idle = self.state.is_idle();
        if let Some(previous) = self.state.gesture() {
            debug!(window_id = previous.window_id, "gesture replaced before commit");
            host.stop_cue();
        }
        self.state = next;

        if let Some(gesture) = self.state.gesture() {
            debug!(window_id = gesture.window_id, ?kind, "gesture begin");
            host.focus(gesture.window_id);
        }
        host.start_cue(kind);
        if was_idle {
            host.attach_pointer_listeners();
        }
    }

    fn finish<H>(&mut self, host: &mut H) -> Option<WindowGeometry>
    where
        H: GestureHost + ?Sized,
    {
        let gesture = *self.state.gesture()?;
        self.state = GestureState::Idle;

        let WindowGeometry { position, size } = gesture.current;
        debug!(
            window_id = gesture.window_id,
            x = position.x,
            y = position.y,
            width = size.width,
            height = size.height,
            "gesture commit"
        );
        host.commit(gesture.window_id, position, size);
        host.stop_cue();
        host.detach_pointer_listeners();
        Some(gesture.current)
    }

    fn accept(gesture: &mut ActiveGesture, next: WindowGeometry) -> WindowGeometry {
        if next.is_finite() {
            trace!(window_id = gesture.window_id, ?next, "gesture update");
            gesture.current = next;
        }
        gesture.current
    }

    /// Container bounds, falling back to the viewport when the container
    /// is missing or degenerate.
    fn bounds<H>(host: &H) -> Rect
    where
        H: GestureHost + ?Sized,
    {
        host.container_bounds()
            .filter(|r| {
                r.width > 0.0 && r.height > 0.0 && r.position().is_finite() && r.size().is_finite()
            })
            .unwrap_or_else(|| host.viewport_bounds())
    }
}
