//! Resize geometry
//!
//! Converts a pointer delta on one edge or corner into a new window
//! geometry. The pipeline runs in a fixed order because later steps can
//! undo earlier ones:
//!
//! 1. apply the raw delta to the edges named by the direction
//! 2. enforce the aspect ratio (single axis derives the other; a corner
//!    follows whichever axis was dragged further)
//! 3. clamp to the minimum size
//! 4. re-enforce the ratio if clamping broke it, growing the lagging axis
//! 5. anchor the opposite edge for left/top drags
//! 6. shrink to the container, re-fit the ratio, clamp the position

use crate::math::{
    clamp_position, height_for, ratio_matches, width_for, Rect, Size, SizeConstraints, Vec2,
    WindowGeometry,
};

use super::ResizeDirection;

/// Compute the geometry for a resize gesture.
///
/// `origin` is the geometry when the gesture began and `delta` the pointer
/// movement since then. `bounds` is the container (or viewport) the window
/// must stay inside.
pub fn calculate_resize(
    direction: ResizeDirection,
    origin: WindowGeometry,
    delta: Vec2,
    constraints: &SizeConstraints,
    bounds: Rect,
) -> WindowGeometry {
    let start = origin.size;
    let mut width = start.width;
    let mut height = start.height;

    if direction.has_right() {
        width = start.width + delta.x;
    }
    if direction.has_left() {
        width = start.width - delta.x;
    }
    if direction.has_bottom() {
        height = start.height + delta.y;
    }
    if direction.has_top() {
        height = start.height - delta.y;
    }

    if let Some(ratio) = constraints.aspect_ratio {
        (width, height) = apply_ratio(direction, start, width, height, ratio);
    }

    width = width.max(constraints.min_size.width);
    height = height.max(constraints.min_size.height);

    if let Some(ratio) = constraints.aspect_ratio {
        if !ratio_matches(Size::new(width, height), ratio) {
            // Only grow here so the minimum from the previous step holds.
            if height_for(width, ratio) > height {
                height = height_for(width, ratio);
            } else {
                width = width_for(height, ratio);
            }
        }
    }

    let position = anchor(direction, origin, Size::new(width, height));
    fit_to_bounds(
        direction,
        origin,
        WindowGeometry::new(position, Size::new(width, height)),
        constraints.aspect_ratio,
        bounds,
    )
}

/// Enforce `ratio` on a raw resize result.
fn apply_ratio(
    direction: ResizeDirection,
    start: Size,
    width: f32,
    height: f32,
    ratio: f32,
) -> (f32, f32) {
    if direction.is_corner() {
        // Compare both changes in height units so portrait and landscape
        // ratios favor the same physical drag.
        let width_change = (width - start.width).abs() / ratio;
        let height_change = (height - start.height).abs();
        if width_change >= height_change {
            (width, height_for(width, ratio))
        } else {
            (width_for(height, ratio), height)
        }
    } else if direction.is_horizontal() {
        (width, height_for(width, ratio))
    } else {
        (width_for(height, ratio), height)
    }
}

/// Position that keeps the edges opposite the dragged ones fixed.
fn anchor(direction: ResizeDirection, origin: WindowGeometry, size: Size) -> Vec2 {
    let x = if direction.has_left() {
        origin.position.x + origin.size.width - size.width
    } else {
        origin.position.x
    };
    let y = if direction.has_top() {
        origin.position.y + origin.size.height - size.height
    } else {
        origin.position.y
    };
    Vec2::new(x, y)
}

/// Shrink a geometry that overflows `bounds`, then clamp its position.
fn fit_to_bounds(
    direction: ResizeDirection,
    origin: WindowGeometry,
    geometry: WindowGeometry,
    ratio: Option<f32>,
    bounds: Rect,
) -> WindowGeometry {
    let WindowGeometry { position, size } = geometry;
    let (mut x, mut y) = (position.x, position.y);
    let (mut width, mut height) = (size.width, size.height);

    if x < bounds.x {
        if direction.has_left() {
            width -= bounds.x - x;
        }
        x = bounds.x;
    }
    if x + width > bounds.right() {
        width = bounds.right() - x;
    }
    if y < bounds.y {
        if direction.has_top() {
            height -= bounds.y - y;
        }
        y = bounds.y;
    }
    if y + height > bounds.bottom() {
        height = bounds.bottom() - y;
    }

    width = width.max(0.0);
    height = height.max(0.0);

    if let Some(ratio) = ratio {
        if height > 0.0 && !ratio_matches(Size::new(width, height), ratio) {
            width = width.min(width_for(height, ratio));
            height = height_for(width, ratio);
            let anchored = anchor(direction, origin, Size::new(width, height));
            if direction.has_left() {
                x = anchored.x;
            }
            if direction.has_top() {
                y = anchored.y;
            }
        }
    }

    let size = Size::new(width, height);
    WindowGeometry::new(clamp_position(bounds, Vec2::new(x, y), size), size)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::math::ASPECT_EPSILON;
    use proptest::prelude::*;

    const BOUNDS: Rect = Rect::new(0.0, 0.0, 1920.0, 1080.0);

    fn direction() -> impl Strategy<Value = ResizeDirection> {
        prop::sample::select(ResizeDirection::ALL.to_vec())
    }

    fn corner() -> impl Strategy<Value = ResizeDirection> {
        prop::sample::select(vec![
            ResizeDirection::NE,
            ResizeDirection::NW,
            ResizeDirection::SE,
            ResizeDirection::SW,
        ])
    }

    proptest! {
        /// Corner resizes with an aspect ratio always end on that ratio
        #[test]
        fn corner_resize_keeps_ratio(
            dir in corner(),
            ratio in 0.5f32..3.0,
            x in 200.0f32..900.0,
            y in 150.0f32..500.0,
            height in 120.0f32..300.0,
            dx in -600.0f32..600.0,
            dy in -600.0f32..600.0,
        ) {
            let constraints = SizeConstraints::default().aspect(ratio);
            let start = WindowGeometry::from_xywh(x, y, height * ratio, height);
            let g = calculate_resize(dir, start, Vec2::new(dx, dy), &constraints, BOUNDS);

            prop_assert!(g.size.height > 0.0);
            let actual = g.size.width / g.size.height;
            prop_assert!(
                (actual - ratio).abs() < ASPECT_EPSILON,
                "ratio {} drifted to {} ({:?})", ratio, actual, g
            );
        }

        /// Every resize result lies inside the container
        #[test]
        fn resize_stays_in_bounds(
            dir in direction(),
            x in 0.0f32..1000.0,
            y in 0.0f32..600.0,
            width in 150.0f32..800.0,
            height in 100.0f32..400.0,
            dx in -3000.0f32..3000.0,
            dy in -3000.0f32..3000.0,
        ) {
            let start = WindowGeometry::from_xywh(x, y, width, height);
            let g = calculate_resize(dir, start, Vec2::new(dx, dy), &SizeConstraints::default(), BOUNDS);
            prop_assert!(BOUNDS.encloses(&g.rect(), 0.01), "{:?} escaped bounds", g);
        }

        /// Without a ratio, results away from the container edges respect the minimum size
        #[test]
        fn resize_respects_min_size(
            dir in direction(),
            dx in -500.0f32..500.0,
            dy in -500.0f32..500.0,
        ) {
            let start = WindowGeometry::from_xywh(700.0, 400.0, 300.0, 200.0);
            let constraints = SizeConstraints::default();
            let g = calculate_resize(dir, start, Vec2::new(dx, dy), &constraints, BOUNDS);

            prop_assert!(g.size.width >= constraints.min_size.width - 0.001);
            prop_assert!(g.size.height >= constraints.min_size.height - 0.001);
        }
    }
}
