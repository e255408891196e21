use serde::{Deserialize, Serialize};

use crate::math::{Size, SizeConstraints, Vec2};

/// Configuration for creating a new window
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Application rendered inside the window
    pub app_id: String,
    /// Initial position (cascaded when `None`)
    pub position: Option<Vec2>,
    pub size: Size,
    /// Minimum size (defaults to 150x100)
    pub min_size: Option<Size>,
    /// Fixed width/height ratio kept while resizing
    pub aspect_ratio: Option<f32>,
    /// Whether pointer input on the content goes to the app. When false the
    /// whole content area acts as a drag surface.
    pub content_interactive: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            app_id: String::new(),
            position: None,
            size: Size::new(800.0, 600.0),
            min_size: None,
            aspect_ratio: None,
            content_interactive: true,
        }
    }
}

impl WindowConfig {
    /// Resize constraints derived from this configuration
    pub fn constraints(&self) -> SizeConstraints {
        let base = match self.min_size {
            Some(min) => SizeConstraints::with_min_size(min),
            None => SizeConstraints::default(),
        };
        match self.aspect_ratio {
            Some(ratio) => base.aspect(ratio),
            None => base,
        }
    }
}
