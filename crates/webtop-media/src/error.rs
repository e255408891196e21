//! Error types for the media crate
//!
//! Playback failures never cross the controller's public intents; they are
//! logged and folded into session state. These errors are what resources
//! report to the operation queue, plus caller mistakes such as selecting a
//! track that does not exist.

use thiserror::Error;
use webtop_store::StoreError;

/// Errors that can occur in media operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MediaError {
    /// Track index outside the queue
    #[error("track index {index} out of range for queue of {len}")]
    TrackOutOfRange {
        /// Requested index
        index: usize,
        /// Queue length
        len: usize,
    },

    /// The resource refused to start playback (e.g. autoplay policy)
    #[error("playback rejected: {0}")]
    PlaybackRejected(String),

    /// The resource failed an operation or reported an error event
    #[error("resource error: {0}")]
    Resource(String),

    /// Persisting session state failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl MediaError {
    /// Create a resource error with message.
    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }
}

/// Result type alias for media operations
pub type MediaResult<T> = Result<T, MediaError>;
