use crate::math::{Size, Vec2};
use crate::types::WindowId;

/// Single writer for committed window geometry.
///
/// The interaction engine never stores geometry itself; it commits through
/// this trait once a gesture ends.
pub trait WindowRegistry {
    /// Store the final geometry of a gesture
    fn commit(&mut self, id: WindowId, position: Vec2, size: Size);

    /// Bring a window to the front
    fn focus(&mut self, id: WindowId);
}
