use serde::{Deserialize, Serialize};

use crate::math::{Rect, Size, SizeConstraints, Vec2, WindowGeometry, FRAME_STYLE};
use crate::types::WindowId;

use super::{WindowConfig, WindowRegion};

/// Window display state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowState {
    #[default]
    Normal,
    Minimized,
    Maximized,
}

/// A window on the desktop
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub id: WindowId,
    pub title: String,
    pub app_id: String,
    pub position: Vec2,
    pub size: Size,
    pub constraints: SizeConstraints,
    pub state: WindowState,
    pub z_order: u32,
    pub content_interactive: bool,
    /// Geometry to return to when leaving the maximized state
    pub restore_geometry: Option<WindowGeometry>,
}

impl Window {
    pub(crate) fn new(id: WindowId, config: &WindowConfig, position: Vec2, z_order: u32) -> Self {
        let constraints = config.constraints();
        Self {
            id,
            title: config.title.clone(),
            app_id: config.app_id.clone(),
            position,
            size: config.size.max(constraints.min_size),
            constraints,
            state: WindowState::Normal,
            z_order,
            content_interactive: config.content_interactive,
            restore_geometry: None,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.position, self.size)
    }

    pub fn geometry(&self) -> WindowGeometry {
        WindowGeometry::new(self.position, self.size)
    }

    pub fn is_visible(&self) -> bool {
        self.state != WindowState::Minimized
    }

    /// Hit test a point against the window frame.
    ///
    /// Resize handles straddle the border and are only active for normal
    /// windows. Title bar buttons sit at the right end of the title bar,
    /// close outermost.
    pub fn region_at(&self, point: Vec2) -> Option<WindowRegion> {
        if !self.is_visible() {
            return None;
        }

        let rect = self.rect();
        let style = &FRAME_STYLE;
        let half = style.resize_handle_size / 2.0;
        let resizable = self.state == WindowState::Normal;

        let hit_rect = if resizable { rect.expand(half) } else { rect };
        if !hit_rect.contains(point) {
            return None;
        }

        if resizable {
            let left = point.x < rect.x + half;
            let right = point.x >= rect.right() - half;
            let top = point.y < rect.y + half;
            let bottom = point.y >= rect.bottom() - half;
            let handle = match (top, bottom, left, right) {
                (true, _, true, _) => Some(WindowRegion::ResizeNW),
                (true, _, _, true) => Some(WindowRegion::ResizeNE),
                (_, true, true, _) => Some(WindowRegion::ResizeSW),
                (_, true, _, true) => Some(WindowRegion::ResizeSE),
                (true, _, _, _) => Some(WindowRegion::ResizeN),
                (_, true, _, _) => Some(WindowRegion::ResizeS),
                (_, _, true, _) => Some(WindowRegion::ResizeW),
                (_, _, _, true) => Some(WindowRegion::ResizeE),
                _ => None,
            };
            if handle.is_some() {
                return handle;
            }
        }

        if point.y < rect.y + style.title_bar_height {
            let button_top = rect.y + (style.title_bar_height - style.button_size) / 2.0;
            let in_button_row =
                point.y >= button_top && point.y < button_top + style.button_size;
            if in_button_row {
                let mut button_right = rect.right() - style.button_margin;
                for region in [
                    WindowRegion::CloseButton,
                    WindowRegion::MaximizeButton,
                    WindowRegion::MinimizeButton,
                ] {
                    let button_left = button_right - style.button_size;
                    if point.x >= button_left && point.x < button_right {
                        return Some(region);
                    }
                    button_right = button_left - style.button_spacing;
                }
            }
            return Some(WindowRegion::TitleBar);
        }

        Some(WindowRegion::Content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> Window {
        let config = WindowConfig {
            title: "Notes".to_string(),
            size: Size::new(400.0, 300.0),
            ..Default::default()
        };
        Window::new(1, &config, Vec2::new(100.0, 100.0), 0)
    }

    #[test]
    fn test_region_title_and_content() {
        let w = window();
        assert_eq!(w.region_at(Vec2::new(200.0, 110.0)), Some(WindowRegion::TitleBar));
        assert_eq!(w.region_at(Vec2::new(200.0, 250.0)), Some(WindowRegion::Content));
        assert_eq!(w.region_at(Vec2::new(50.0, 50.0)), None);
    }

    #[test]
    fn test_region_buttons() {
        let w = window();
        // Title bar is 28px with 16px buttons centered: rows 106..122
        // Close: 476..492, maximize: 454..470, minimize: 432..448
        assert_eq!(w.region_at(Vec2::new(480.0, 114.0)), Some(WindowRegion::CloseButton));
        assert_eq!(w.region_at(Vec2::new(460.0, 114.0)), Some(WindowRegion::MaximizeButton));
        assert_eq!(w.region_at(Vec2::new(440.0, 114.0)), Some(WindowRegion::MinimizeButton));
        assert_eq!(w.region_at(Vec2::new(450.0, 114.0)), Some(WindowRegion::TitleBar));
    }

    #[test]
    fn test_region_resize_handles() {
        let w = window();
        assert_eq!(w.region_at(Vec2::new(99.0, 99.0)), Some(WindowRegion::ResizeNW));
        assert_eq!(w.region_at(Vec2::new(501.0, 401.0)), Some(WindowRegion::ResizeSE));
        assert_eq!(w.region_at(Vec2::new(300.0, 398.0)), Some(WindowRegion::ResizeS));
        assert_eq!(w.region_at(Vec2::new(97.0, 250.0)), Some(WindowRegion::ResizeW));
        assert_eq!(w.region_at(Vec2::new(502.0, 250.0)), Some(WindowRegion::ResizeE));
    }

    #[test]
    fn test_maximized_has_no_handles() {
        let mut w = window();
        w.state = WindowState::Maximized;
        assert_eq!(w.region_at(Vec2::new(99.0, 99.0)), None);
        assert_eq!(w.region_at(Vec2::new(101.0, 250.0)), Some(WindowRegion::Content));
    }

    #[test]
    fn test_minimized_is_not_hit() {
        let mut w = window();
        w.state = WindowState::Minimized;
        assert_eq!(w.region_at(Vec2::new(200.0, 250.0)), None);
    }

    #[test]
    fn test_size_respects_minimum() {
        let config = WindowConfig {
            size: Size::new(50.0, 50.0),
            ..Default::default()
        };
        let w = Window::new(2, &config, Vec2::ZERO, 0);
        assert_eq!(w.size, Size::new(150.0, 100.0));
    }
}
