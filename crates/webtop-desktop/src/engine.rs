//! Desktop engine
//!
//! Coordinates the window registry and the interaction engine, routing raw
//! pointer events from the host UI.

use serde::Serialize;
use tracing::debug;

use crate::error::{DesktopError, DesktopResult};
use crate::input::{
    GestureHost, GestureKind, GestureSurface, GestureTarget, InputResult, InteractionEngine,
    ResizeDirection,
};
use crate::math::{Rect, Size, Vec2};
use crate::types::WindowId;
use crate::window::{WindowConfig, WindowManager, WindowRegion, WindowRegistry, WindowState};

/// Primary pointer button
const PRIMARY_BUTTON: u8 = 0;

/// Surface with no listeners and no sound
struct SilentSurface;

impl GestureSurface for SilentSurface {}

/// Window information for positioning the host's window elements
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WindowScreenRect {
    pub id: WindowId,
    pub title: String,
    pub app_id: String,
    pub state: WindowState,
    pub focused: bool,
    /// Live geometry, including an uncommitted gesture
    pub rect: Rect,
    pub dragging: bool,
}

/// Main desktop engine
pub struct DesktopEngine {
    pub windows: WindowManager,
    interaction: InteractionEngine,
    viewport: Size,
    container: Option<Rect>,
    surface: Box<dyn GestureSurface>,
}

impl Default for DesktopEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Borrowed view of the engine handed to the interaction engine
struct EngineHost<'a> {
    windows: &'a mut WindowManager,
    surface: &'a mut Box<dyn GestureSurface>,
    viewport: Size,
    container: Option<Rect>,
}

impl WindowRegistry for EngineHost<'_> {
    fn commit(&mut self, id: WindowId, position: Vec2, size: Size) {
        WindowRegistry::commit(self.windows, id, position, size);
    }

    fn focus(&mut self, id: WindowId) {
        WindowRegistry::focus(self.windows, id);
    }
}

impl GestureSurface for EngineHost<'_> {
    fn attach_pointer_listeners(&mut self) {
        self.surface.attach_pointer_listeners();
    }

    fn detach_pointer_listeners(&mut self) {
        self.surface.detach_pointer_listeners();
    }

    fn start_cue(&mut self, kind: GestureKind) {
        self.surface.start_cue(kind);
    }

    fn stop_cue(&mut self) {
        self.surface.stop_cue();
    }
}

impl GestureHost for EngineHost<'_> {
    fn container_bounds(&self) -> Option<Rect> {
        self.container
    }

    fn viewport_bounds(&self) -> Rect {
        Rect::from_size(self.viewport)
    }
}

impl DesktopEngine {
    pub fn new() -> Self {
        Self {
            windows: WindowManager::new(),
            interaction: InteractionEngine::new(),
            viewport: Size::new(1920.0, 1080.0),
            container: None,
            surface: Box::new(SilentSurface),
        }
    }

    /// Initialize with the viewport size
    pub fn init(&mut self, width: f32, height: f32) {
        self.resize_viewport(width, height);
    }

    /// Install the host's listener and cue hooks
    pub fn set_surface(&mut self, surface: Box<dyn GestureSurface>) {
        self.surface = surface;
    }

    pub fn resize_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Size::new(width, height);
    }

    /// Set (or clear) the container windows are confined to
    pub fn set_container(&mut self, container: Option<Rect>) {
        self.container = container;
    }

    /// Rectangle windows are confined to
    pub fn bounds(&self) -> Rect {
        self.container
            .filter(|r| r.width > 0.0 && r.height > 0.0)
            .unwrap_or_else(|| Rect::from_size(self.viewport))
    }

    /// Check if a gesture is in progress
    pub fn is_dragging(&self) -> bool {
        self.interaction.is_active()
    }

    pub fn create_window(&mut self, config: WindowConfig) -> WindowId {
        self.windows.create(config)
    }

    /// Close a window, dropping any gesture on it
    pub fn close_window(&mut self, id: WindowId) {
        if self.interaction.active_window() == Some(id) {
            let (interaction, mut host) = self.split();
            interaction.teardown(&mut host);
        }
        self.windows.close(id);
    }

    pub fn focus_window(&mut self, id: WindowId) -> DesktopResult<()> {
        self.windows.focus(id)
    }

    pub fn minimize_window(&mut self, id: WindowId) -> DesktopResult<()> {
        self.windows.minimize(id)
    }

    /// Maximize into the current bounds, or restore if already maximized
    pub fn maximize_window(&mut self, id: WindowId) -> DesktopResult<()> {
        let bounds = self.bounds();
        self.windows.maximize(id, bounds)
    }

    pub fn restore_window(&mut self, id: WindowId) -> DesktopResult<()> {
        self.windows.restore(id)
    }

    /// Start a move gesture from a window's title bar.
    /// Called directly by host title bars to bypass hit testing.
    pub fn start_move_drag(&mut self, id: WindowId, x: f32, y: f32) -> DesktopResult<()> {
        let target = self.target(id)?;
        let (interaction, mut host) = self.split();
        interaction.begin_drag(&mut host, Vec2::new(x, y), target);
        Ok(())
    }

    /// Start a resize gesture from a direction tag ("n", "se", ...).
    /// Called directly by host resize handles to bypass hit testing.
    pub fn start_resize_drag(
        &mut self,
        id: WindowId,
        direction: &str,
        x: f32,
        y: f32,
    ) -> DesktopResult<()> {
        let direction: ResizeDirection = direction.parse()?;
        let target = self.target(id)?;
        let (interaction, mut host) = self.split();
        interaction.begin_resize(&mut host, Vec2::new(x, y), target, direction);
        Ok(())
    }

    /// Handle pointer down event
    pub fn handle_pointer_down(&mut self, x: f32, y: f32, button: u8) -> InputResult {
        if button != PRIMARY_BUTTON {
            return InputResult::Unhandled;
        }
        let point = Vec2::new(x, y);
        let Some((window_id, region)) = self.windows.region_at(point) else {
            return InputResult::Unhandled;
        };

        let outcome = match region {
            WindowRegion::CloseButton => {
                self.close_window(window_id);
                Ok(())
            }
            WindowRegion::MinimizeButton => self.minimize_window(window_id),
            WindowRegion::MaximizeButton => self.maximize_window(window_id),
            WindowRegion::TitleBar => self.drag_or_focus(window_id, point),
            WindowRegion::Content => {
                let Some(window) = self.windows.get(window_id) else {
                    return InputResult::Unhandled;
                };
                if window.content_interactive {
                    let local = point - window.position;
                    WindowRegistry::focus(&mut self.windows, window_id);
                    return InputResult::Forward {
                        window_id,
                        local_x: local.x,
                        local_y: local.y,
                    };
                }
                self.drag_or_focus(window_id, point)
            }
            handle => match handle.resize_direction() {
                Some(direction) => self.start_resize_drag(window_id, direction.tag(), x, y),
                None => Ok(()),
            },
        };

        if let Err(err) = outcome {
            debug!(%err, window_id, "pointer down ignored");
        }
        InputResult::Handled
    }

    /// Handle pointer move event
    pub fn handle_pointer_move(&mut self, x: f32, y: f32) -> InputResult {
        if !self.interaction.is_active() {
            return InputResult::Unhandled;
        }
        let (interaction, host) = self.split();
        interaction.update(&host, Vec2::new(x, y));
        InputResult::Handled
    }

    /// Handle pointer up event
    pub fn handle_pointer_up(&mut self) -> InputResult {
        let (interaction, mut host) = self.split();
        match interaction.end(&mut host) {
            Some(_) => InputResult::Handled,
            None => InputResult::Unhandled,
        }
    }

    /// Visible windows with their live rectangles, lowest z-order first
    pub fn window_rects(&self) -> Vec<WindowScreenRect> {
        let focused = self.windows.focused();
        let active = self.interaction.active_window();
        let live = self.interaction.live_geometry();

        self.windows
            .windows_by_z()
            .into_iter()
            .filter(|w| w.is_visible())
            .map(|w| {
                let dragging = active == Some(w.id);
                let rect = match live {
                    Some(geometry) if dragging => geometry.rect(),
                    _ => w.rect(),
                };
                WindowScreenRect {
                    id: w.id,
                    title: w.title.clone(),
                    app_id: w.app_id.clone(),
                    state: w.state,
                    focused: focused == Some(w.id),
                    rect,
                    dragging,
                }
            })
            .collect()
    }

    /// Title bar drags move normal windows; maximized windows only focus
    fn drag_or_focus(&mut self, id: WindowId, point: Vec2) -> DesktopResult<()> {
        match self.windows.get(id).map(|w| w.state) {
            Some(WindowState::Normal) => self.start_move_drag(id, point.x, point.y),
            Some(_) => self.focus_window(id),
            None => Err(DesktopError::WindowNotFound(id)),
        }
    }

    fn target(&self, id: WindowId) -> DesktopResult<GestureTarget> {
        let window = self.windows.get(id).ok_or(DesktopError::WindowNotFound(id))?;
        if window.state != WindowState::Normal {
            return Err(DesktopError::InvalidOperation {
                op: "start_gesture",
                reason: "window is not in the normal state",
            });
        }
        Ok(GestureTarget::new(id, window.geometry()).with_constraints(window.constraints))
    }

    fn split(&mut self) -> (&mut InteractionEngine, EngineHost<'_>) {
        (
            &mut self.interaction,
            EngineHost {
                windows: &mut self.windows,
                surface: &mut self.surface,
                viewport: self.viewport,
                container: self.container,
            },
        )
    }
}

impl Drop for DesktopEngine {
    fn drop(&mut self) {
        let (interaction, mut host) = self.split();
        interaction.teardown(&mut host);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> DesktopEngine {
        let mut engine = DesktopEngine::new();
        engine.init(1280.0, 800.0);
        engine
    }

    fn window(engine: &mut DesktopEngine, x: f32, y: f32) -> WindowId {
        engine.create_window(WindowConfig {
            title: "Test".to_string(),
            app_id: "test".to_string(),
            position: Some(Vec2::new(x, y)),
            size: Size::new(400.0, 300.0),
            ..Default::default()
        })
    }

    #[test]
    fn test_title_bar_drag_commits_on_pointer_up() {
        let mut engine = engine();
        let id = window(&mut engine, 100.0, 100.0);

        assert_eq!(engine.handle_pointer_down(200.0, 110.0, 0), InputResult::Handled);
        assert!(engine.is_dragging());

        engine.handle_pointer_move(250.0, 160.0);
        // Registry untouched mid-gesture, live rect moved
        assert_eq!(engine.windows.get(id).map(|w| w.position), Some(Vec2::new(100.0, 100.0)));
        assert_eq!(engine.window_rects()[0].rect.position(), Vec2::new(150.0, 150.0));

        assert_eq!(engine.handle_pointer_up(), InputResult::Handled);
        assert_eq!(engine.windows.get(id).map(|w| w.position), Some(Vec2::new(150.0, 150.0)));
        assert!(!engine.is_dragging());
        assert_eq!(engine.handle_pointer_up(), InputResult::Unhandled);
    }

    #[test]
    fn test_content_is_forwarded() {
        let mut engine = engine();
        let id = window(&mut engine, 100.0, 100.0);

        assert_eq!(
            engine.handle_pointer_down(150.0, 200.0, 0),
            InputResult::Forward {
                window_id: id,
                local_x: 50.0,
                local_y: 100.0,
            }
        );
        assert!(!engine.is_dragging());
    }

    #[test]
    fn test_non_interactive_content_drags() {
        let mut engine = engine();
        engine.create_window(WindowConfig {
            position: Some(Vec2::new(100.0, 100.0)),
            size: Size::new(400.0, 300.0),
            content_interactive: false,
            ..Default::default()
        });

        assert_eq!(engine.handle_pointer_down(150.0, 200.0, 0), InputResult::Handled);
        assert!(engine.is_dragging());
    }

    #[test]
    fn test_resize_handle_starts_resize() {
        let mut engine = engine();
        let id = window(&mut engine, 100.0, 100.0);

        engine.handle_pointer_down(500.0, 400.0, 0);
        engine.handle_pointer_move(600.0, 450.0);
        engine.handle_pointer_up();

        assert_eq!(engine.windows.get(id).map(|w| w.size), Some(Size::new(500.0, 350.0)));
    }

    #[test]
    fn test_start_resize_drag_rejects_bad_tag() {
        let mut engine = engine();
        let id = window(&mut engine, 100.0, 100.0);

        assert_eq!(
            engine.start_resize_drag(id, "up", 0.0, 0.0),
            Err(DesktopError::InvalidDirection("up".to_string()))
        );
        assert_eq!(
            engine.start_move_drag(42, 0.0, 0.0),
            Err(DesktopError::WindowNotFound(42))
        );
        assert!(!engine.is_dragging());
    }

    #[test]
    fn test_buttons_act_immediately() {
        let mut engine = engine();
        let id = window(&mut engine, 100.0, 100.0);

        // Maximize button: right edge 500, margin 8, close 476..492, max 454..470
        engine.handle_pointer_down(460.0, 114.0, 0);
        assert_eq!(engine.windows.get(id).map(|w| w.state), Some(WindowState::Maximized));
        assert_eq!(engine.windows.get(id).map(|w| w.rect()), Some(Rect::new(0.0, 0.0, 1280.0, 800.0)));

        // Maximized title bar focuses instead of dragging
        engine.handle_pointer_down(200.0, 10.0, 0);
        assert!(!engine.is_dragging());

        // Close button of the maximized window: 1280 - 8 - 16 = 1256
        engine.handle_pointer_down(1260.0, 14.0, 0);
        assert!(engine.windows.get(id).is_none());
    }

    #[test]
    fn test_container_confines_drag() {
        let mut engine = engine();
        engine.set_container(Some(Rect::new(0.0, 0.0, 600.0, 500.0)));
        let id = window(&mut engine, 100.0, 100.0);

        engine.start_move_drag(id, 200.0, 110.0).unwrap();
        engine.handle_pointer_move(2000.0, 2000.0);
        engine.handle_pointer_up();

        assert_eq!(engine.windows.get(id).map(|w| w.position), Some(Vec2::new(200.0, 200.0)));
    }

    #[test]
    fn test_secondary_button_is_unhandled() {
        let mut engine = engine();
        window(&mut engine, 100.0, 100.0);
        assert_eq!(engine.handle_pointer_down(200.0, 110.0, 2), InputResult::Unhandled);
    }

    #[test]
    fn test_closing_dragged_window_drops_gesture() {
        let mut engine = engine();
        let id = window(&mut engine, 100.0, 100.0);

        engine.start_move_drag(id, 200.0, 110.0).unwrap();
        engine.close_window(id);
        assert!(!engine.is_dragging());
        assert_eq!(engine.handle_pointer_up(), InputResult::Unhandled);
    }
}
