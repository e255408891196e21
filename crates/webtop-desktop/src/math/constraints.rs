//! Clamping and aspect-ratio helpers shared by drag and resize.

use serde::{Deserialize, Serialize};

use super::{Rect, Size, Vec2};

/// Minimum window size used when a window does not configure one
pub const DEFAULT_MIN_SIZE: Size = Size::new(150.0, 100.0);

/// Tolerance for comparing a width/height ratio against its target
pub const ASPECT_EPSILON: f32 = 1e-3;

/// Size limits applied to a window during resize
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SizeConstraints {
    /// Smallest allowed size
    pub min_size: Size,
    /// Required width / height ratio, if any
    pub aspect_ratio: Option<f32>,
}

impl Default for SizeConstraints {
    fn default() -> Self {
        Self {
            min_size: DEFAULT_MIN_SIZE,
            aspect_ratio: None,
        }
    }
}

impl SizeConstraints {
    /// Constraints with a custom minimum size
    pub fn with_min_size(min_size: Size) -> Self {
        Self {
            min_size,
            aspect_ratio: None,
        }
    }

    /// Add an aspect ratio. Non-positive or non-finite ratios are ignored.
    pub fn aspect(mut self, ratio: f32) -> Self {
        self.aspect_ratio = (ratio.is_finite() && ratio > 0.0).then_some(ratio);
        self
    }
}

/// Clamp `value` into `[lo, hi]`.
///
/// When the range is empty (`hi < lo`, e.g. a window larger than its
/// container) the result pins to `lo` instead of panicking.
#[inline]
pub fn clamp_axis(value: f32, lo: f32, hi: f32) -> f32 {
    if hi < lo {
        lo
    } else {
        value.clamp(lo, hi)
    }
}

/// Clamp a window position so that a window of `size` stays inside `bounds`.
pub fn clamp_position(bounds: Rect, position: Vec2, size: Size) -> Vec2 {
    Vec2::new(
        clamp_axis(position.x, bounds.x, bounds.right() - size.width),
        clamp_axis(position.y, bounds.y, bounds.bottom() - size.height),
    )
}

/// Height that satisfies `ratio` for a given width
#[inline]
pub fn height_for(width: f32, ratio: f32) -> f32 {
    width / ratio
}

/// Width that satisfies `ratio` for a given height
#[inline]
pub fn width_for(height: f32, ratio: f32) -> f32 {
    height * ratio
}

/// Check whether a size matches `ratio` within [`ASPECT_EPSILON`]
pub fn ratio_matches(size: Size, ratio: f32) -> bool {
    size.height > 0.0 && (size.width / size.height - ratio).abs() < ASPECT_EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_axis_empty_range_pins_low() {
        assert_eq!(clamp_axis(50.0, 0.0, 100.0), 50.0);
        assert_eq!(clamp_axis(-5.0, 0.0, 100.0), 0.0);
        assert_eq!(clamp_axis(150.0, 0.0, 100.0), 100.0);
        assert_eq!(clamp_axis(20.0, 0.0, -10.0), 0.0);
    }

    #[test]
    fn test_clamp_position_keeps_window_inside() {
        let bounds = Rect::new(0.0, 0.0, 800.0, 600.0);
        let size = Size::new(200.0, 100.0);

        let p = clamp_position(bounds, Vec2::new(700.0, -20.0), size);
        assert_eq!(p, Vec2::new(600.0, 0.0));

        let p = clamp_position(bounds, Vec2::new(100.0, 100.0), size);
        assert_eq!(p, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_ratio_helpers() {
        assert!((height_for(160.0, 16.0 / 9.0) - 90.0).abs() < 0.001);
        assert!((width_for(90.0, 16.0 / 9.0) - 160.0).abs() < 0.001);
        assert!(ratio_matches(Size::new(160.0, 90.0), 16.0 / 9.0));
        assert!(!ratio_matches(Size::new(160.0, 100.0), 16.0 / 9.0));
        assert!(!ratio_matches(Size::new(160.0, 0.0), 16.0 / 9.0));
    }

    #[test]
    fn test_constraints_ignore_bad_ratio() {
        assert_eq!(SizeConstraints::default().aspect(0.0).aspect_ratio, None);
        assert_eq!(SizeConstraints::default().aspect(f32::NAN).aspect_ratio, None);
        assert_eq!(SizeConstraints::default().aspect(2.0).aspect_ratio, Some(2.0));
        assert_eq!(SizeConstraints::default().min_size, DEFAULT_MIN_SIZE);
    }
}
