//! Core type definitions for the desktop crate
//!
//! This module centralizes type aliases used throughout the crate
//! for consistency and discoverability.

/// Unique window identifier
///
/// Windows are identified by a monotonically increasing 64-bit integer.
/// Window IDs are unique within a `WindowManager` instance and are never
/// reused after a window closes.
pub type WindowId = u64;
