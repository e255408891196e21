//! Window desktop for webtop
//!
//! This crate provides the window side of the browser desktop:
//! - Geometry utilities (clamping, aspect-ratio solving)
//! - Window management (create, close, focus, z-order, maximize)
//! - The interaction engine turning pointer gestures into window geometry
//! - Input routing and hit testing
//!
//! ## Architecture
//!
//! - [`math`]: Core geometry types (`Vec2`, `Size`, `Rect`, `WindowGeometry`)
//! - [`window`]: Window lifecycle and the [`WindowRegistry`] commit seam
//! - [`input`]: Drag/resize math and the gesture state machine
//! - [`persistence`]: Registry snapshots for storage
//!
//! Gesture geometry is local to the interaction engine until pointer-up,
//! when it is committed to the registry exactly once.
//!
//! ## Example
//!
//! ```rust
//! use webtop_desktop::{DesktopEngine, Size, Vec2, WindowConfig};
//!
//! let mut engine = DesktopEngine::new();
//! engine.init(1280.0, 800.0);
//!
//! let id = engine.create_window(WindowConfig {
//!     title: "Notes".to_string(),
//!     position: Some(Vec2::new(100.0, 100.0)),
//!     size: Size::new(400.0, 300.0),
//!     ..Default::default()
//! });
//!
//! engine.start_move_drag(id, 200.0, 110.0).unwrap();
//! engine.handle_pointer_move(260.0, 150.0);
//! engine.handle_pointer_up();
//!
//! assert_eq!(engine.windows.get(id).unwrap().position, Vec2::new(160.0, 140.0));
//! ```

pub mod error;
pub mod input;
pub mod math;
pub mod persistence;
pub mod types;
pub mod window;

mod engine;

// WASM exports (only available with "wasm" feature)
#[cfg(feature = "wasm")]
mod wasm;
#[cfg(feature = "wasm")]
pub use wasm::*;

pub use engine::{DesktopEngine, WindowScreenRect};
pub use error::{DesktopError, DesktopResult};
pub use input::{
    calculate_drag, calculate_resize, GestureHost, GestureKind, GestureState, GestureSurface,
    GestureTarget, InputResult, InteractionEngine, ResizeDirection,
};
pub use math::{Rect, Size, SizeConstraints, Vec2, WindowGeometry, FRAME_STYLE};
pub use persistence::Snapshot;
pub use types::WindowId;
pub use window::{Window, WindowConfig, WindowManager, WindowRegion, WindowRegistry, WindowState};
