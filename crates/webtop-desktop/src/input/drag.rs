use crate::math::{clamp_position, Rect, Vec2, WindowGeometry};

/// Compute the geometry for a move gesture.
///
/// The window keeps its size and follows the pointer offset from where the
/// gesture began, clamped so it never leaves `bounds`.
pub fn calculate_drag(
    origin: WindowGeometry,
    origin_pointer: Vec2,
    pointer: Vec2,
    bounds: Rect,
) -> WindowGeometry {
    let target = origin.position + (pointer - origin_pointer);
    WindowGeometry::new(clamp_position(bounds, target, origin.size), origin.size)
}
