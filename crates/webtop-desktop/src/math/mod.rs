//! Core geometry types for the desktop environment
//!
//! These types provide basic 2D math for window positioning and sizing,
//! plus the clamping and aspect-ratio helpers the interaction engine uses.

mod constraints;
mod geometry;
mod rect;
mod size;
mod style;
mod vec2;

pub use constraints::{
    clamp_axis, clamp_position, height_for, ratio_matches, width_for, SizeConstraints,
    ASPECT_EPSILON, DEFAULT_MIN_SIZE,
};
pub use geometry::WindowGeometry;
pub use rect::Rect;
pub use size::Size;
pub use style::{FrameStyle, FRAME_STYLE};
pub use vec2::Vec2;
