//! Error types for the desktop crate
//!
//! Gesture handling never fails across its public contract (invalid input
//! is a no-op). These errors cover caller mistakes against the window
//! registry and snapshot (de)serialization.

use thiserror::Error;

use crate::types::WindowId;

/// Errors that can occur in desktop operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DesktopError {
    /// Window with the given ID was not found
    #[error("window not found: {0}")]
    WindowNotFound(WindowId),

    /// A resize direction tag was not one of n/s/e/w/ne/nw/se/sw
    #[error("invalid resize direction: '{0}'")]
    InvalidDirection(String),

    /// An operation was attempted that is not valid in the current state
    #[error("invalid operation '{op}': {reason}")]
    InvalidOperation {
        /// The operation that was attempted
        op: &'static str,
        /// Why the operation failed
        reason: &'static str,
    },

    /// JSON serialization or deserialization failed
    #[error("serialization error: {0}")]
    SerializationError(String),
}

/// Result type alias for desktop operations
pub type DesktopResult<T> = Result<T, DesktopError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DesktopError::WindowNotFound(42);
        assert_eq!(err.to_string(), "window not found: 42");

        let err = DesktopError::InvalidDirection("up".to_string());
        assert_eq!(err.to_string(), "invalid resize direction: 'up'");

        let err = DesktopError::InvalidOperation {
            op: "maximize_window",
            reason: "window is minimized",
        };
        assert_eq!(
            err.to_string(),
            "invalid operation 'maximize_window': window is minimized"
        );
    }

    #[test]
    fn test_error_equality() {
        let err1 = DesktopError::WindowNotFound(42);
        let err2 = DesktopError::WindowNotFound(42);
        let err3 = DesktopError::WindowNotFound(43);

        assert_eq!(err1, err2);
        assert_ne!(err1, err3);
    }
}
