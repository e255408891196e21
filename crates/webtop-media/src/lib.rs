//! Media playback for webtop
//!
//! The desktop has one music player and one ambience player. Each owns a
//! single playback resource that outlives the window controlling it, so
//! audio keeps playing when the window closes.
//!
//! ## Architecture
//!
//! - [`session`]: queue, current track, position and volume; persisted
//!   after every change
//! - [`queue`]: the FIFO [`OperationQueue`], the only path to a resource
//! - [`sync`]: reconciliation between session and resource
//! - [`lifecycle`]: page visibility and unload events
//! - [`controller`]: [`PlaybackController`] tying the pieces together
//! - [`hub`]: [`MediaHub`], one controller per [`MediaKind`]
//!
//! The event loop is abstracted behind [`Scheduler`]; tests drive it with
//! `futures::executor::LocalPool`, the browser with `wasm-bindgen-futures`.
//!
//! ## Example
//!
//! ```rust
//! use webtop_media::{merge_tracks, source_id, Track};
//!
//! assert_eq!(source_id("https://www.youtube.com/watch?v=abc123&t=4"), "abc123");
//!
//! let queue = merge_tracks(
//!     &[],
//!     [
//!         Track::new("https://youtu.be/abc123", "Lo-fi", 0),
//!         Track::new("https://www.youtube.com/embed/abc123", "Lo-fi (embed)", 0),
//!     ],
//! );
//! assert_eq!(queue.len(), 1);
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod hub;
pub mod lifecycle;
pub mod operation;
pub mod queue;
pub mod resource;
pub mod sampler;
pub mod session;
pub mod sync;
pub mod track;

#[cfg(feature = "wasm")]
mod wasm;
#[cfg(feature = "wasm")]
pub use wasm::*;

pub use config::{MediaKind, PlaybackConfig};
pub use controller::PlaybackController;
pub use error::{MediaError, MediaResult};
pub use hub::MediaHub;
pub use lifecycle::{PageEvent, PageLifecycle, Subscription};
pub use operation::AudioOperation;
pub use queue::{OperationQueue, Scheduler};
pub use resource::{MediaResource, ResourceEvent, ResourceFuture};
pub use sampler::PositionSampler;
pub use session::{PersistedSession, PlaybackSession};
pub use sync::{plan_reconciliation, ActualPlayback, DesiredPlayback, SyncState};
pub use track::{merge_tracks, source_id, Track};
