use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{DesktopError, DesktopResult};
use crate::math::{Rect, Size, Vec2, WindowGeometry};
use crate::types::WindowId;

use super::{Window, WindowConfig, WindowRegion, WindowRegistry, WindowState};

/// Where the first cascaded window opens
const CASCADE_ORIGIN: Vec2 = Vec2::new(40.0, 40.0);
/// Offset between cascaded windows
const CASCADE_STEP: f32 = 30.0;
/// Cascade wraps back to the origin after this many windows
const CASCADE_WRAP: usize = 10;

/// Manages window lifecycle, z-order and focus
#[derive(Clone, Debug)]
pub struct WindowManager {
    windows: BTreeMap<WindowId, Window>,
    /// Focus history, most recent last
    focus_stack: Vec<WindowId>,
    next_id: WindowId,
    next_z: u32,
}

impl Default for WindowManager {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowManager {
    pub fn new() -> Self {
        Self {
            windows: BTreeMap::new(),
            focus_stack: Vec::new(),
            next_id: 1,
            next_z: 0,
        }
    }

    /// Create a window and focus it
    pub fn create(&mut self, config: WindowConfig) -> WindowId {
        let id = self.next_id;
        self.next_id += 1;

        let position = config.position.unwrap_or_else(|| {
            let step = (self.windows.len() % CASCADE_WRAP) as f32 * CASCADE_STEP;
            CASCADE_ORIGIN + Vec2::new(step, step)
        });
        let z = self.bump_z();
        let window = Window::new(id, &config, position, z);
        debug!(id, app_id = %window.app_id, "window created");

        self.windows.insert(id, window);
        self.focus_stack.push(id);
        id
    }

    /// Close a window, returning it if it existed
    pub fn close(&mut self, id: WindowId) -> Option<Window> {
        let window = self.windows.remove(&id)?;
        self.focus_stack.retain(|&w| w != id);
        debug!(id, "window closed");
        Some(window)
    }

    pub fn get(&self, id: WindowId) -> Option<&Window> {
        self.windows.get(&id)
    }

    pub fn count(&self) -> usize {
        self.windows.len()
    }

    /// All windows, lowest z-order first
    pub fn windows_by_z(&self) -> Vec<&Window> {
        let mut windows: Vec<&Window> = self.windows.values().collect();
        windows.sort_by_key(|w| w.z_order);
        windows
    }

    /// Bring a window to the front and make it the focused window
    pub fn focus(&mut self, id: WindowId) -> DesktopResult<()> {
        if !self.windows.contains_key(&id) {
            return Err(DesktopError::WindowNotFound(id));
        }
        let z = self.bump_z();
        if let Some(window) = self.windows.get_mut(&id) {
            window.z_order = z;
        }
        self.focus_stack.retain(|&w| w != id);
        self.focus_stack.push(id);
        Ok(())
    }

    /// The most recently focused visible window
    pub fn focused(&self) -> Option<WindowId> {
        self.focus_stack
            .iter()
            .rev()
            .copied()
            .find(|id| self.windows.get(id).is_some_and(Window::is_visible))
    }

    pub fn minimize(&mut self, id: WindowId) -> DesktopResult<()> {
        let window = self.window_mut(id)?;
        window.state = WindowState::Minimized;
        Ok(())
    }

    /// Maximize a window into `bounds`, or restore it if already maximized
    pub fn maximize(&mut self, id: WindowId, bounds: Rect) -> DesktopResult<()> {
        let window = self.window_mut(id)?;
        match window.state {
            WindowState::Maximized => Self::restore_from_maximized(window),
            WindowState::Minimized => {
                return Err(DesktopError::InvalidOperation {
                    op: "maximize",
                    reason: "window is minimized",
                })
            }
            WindowState::Normal => {
                window.restore_geometry = Some(window.geometry());
                window.position = bounds.position();
                window.size = bounds.size();
                window.state = WindowState::Maximized;
            }
        }
        self.focus(id)
    }

    /// Return a minimized or maximized window to the normal state
    pub fn restore(&mut self, id: WindowId) -> DesktopResult<()> {
        let window = self.window_mut(id)?;
        match window.state {
            WindowState::Maximized => Self::restore_from_maximized(window),
            WindowState::Minimized => window.state = WindowState::Normal,
            WindowState::Normal => {}
        }
        self.focus(id)
    }

    /// Write committed gesture geometry. This is the only geometry writer.
    pub fn commit(&mut self, id: WindowId, position: Vec2, size: Size) -> DesktopResult<()> {
        let window = self.window_mut(id)?;
        window.position = position;
        window.size = size;
        Ok(())
    }

    /// Topmost window and region under a point
    pub fn region_at(&self, point: Vec2) -> Option<(WindowId, WindowRegion)> {
        self.windows_by_z()
            .into_iter()
            .rev()
            .find_map(|w| w.region_at(point).map(|region| (w.id, region)))
    }

    fn window_mut(&mut self, id: WindowId) -> DesktopResult<&mut Window> {
        self.windows
            .get_mut(&id)
            .ok_or(DesktopError::WindowNotFound(id))
    }

    fn restore_from_maximized(window: &mut Window) {
        if let Some(WindowGeometry { position, size }) = window.restore_geometry.take() {
            window.position = position;
            window.size = size;
        }
        window.state = WindowState::Normal;
    }

    fn bump_z(&mut self) -> u32 {
        let z = self.next_z;
        self.next_z += 1;
        z
    }

    pub(crate) fn parts(&self) -> (Vec<Window>, Vec<WindowId>, WindowId) {
        let windows = self.windows_by_z().into_iter().cloned().collect();
        (windows, self.focus_stack.clone(), self.next_id)
    }

    pub(crate) fn from_parts(
        windows: Vec<Window>,
        focus_stack: Vec<WindowId>,
        next_id: WindowId,
    ) -> Self {
        let mut manager = Self::new();
        for mut window in windows {
            window.z_order = manager.bump_z();
            manager.next_id = manager.next_id.max(window.id + 1);
            manager.windows.insert(window.id, window);
        }
        manager.next_id = manager.next_id.max(next_id);
        manager.focus_stack = focus_stack
            .into_iter()
            .filter(|id| manager.windows.contains_key(id))
            .collect();
        manager
    }
}

impl WindowRegistry for WindowManager {
    fn commit(&mut self, id: WindowId, position: Vec2, size: Size) {
        if let Err(err) = WindowManager::commit(self, id, position, size) {
            debug!(%err, "dropping commit");
        }
    }

    fn focus(&mut self, id: WindowId) {
        if let Err(err) = WindowManager::focus(self, id) {
            debug!(%err, "dropping focus");
        }
    }
}
