//! Playback resource contract
//!
//! One resource exists per media kind (an audio element or an embedded
//! player). Commands are asynchronous and fallible; queries are cheap
//! synchronous reads of the resource's current state.

use futures::future::LocalBoxFuture;

use crate::error::MediaResult;

/// Future returned by resource commands
pub type ResourceFuture<'a> = LocalBoxFuture<'a, MediaResult<()>>;

/// Handle to the single playback device of a media kind.
///
/// Methods take `&self`; implementations use interior mutability because
/// the handle is shared by the queue worker and the controller.
pub trait MediaResource {
    /// Start playback. Fails when the platform rejects it (autoplay policy).
    fn play(&self) -> ResourceFuture<'_>;

    fn pause(&self) -> ResourceFuture<'_>;

    /// Load (or reload) the current source
    fn load(&self) -> ResourceFuture<'_>;

    fn set_source(&self, url: String) -> ResourceFuture<'_>;

    fn seek_to(&self, secs: f64) -> ResourceFuture<'_>;

    /// Volume in `[0, 1]`; resources with other scales convert
    fn set_volume(&self, volume: f64) -> ResourceFuture<'_>;

    /// Stop and drop the source
    fn release(&self) -> ResourceFuture<'_>;

    /// Source currently loaded, if any
    fn current_source(&self) -> Option<String>;

    /// Playback position in seconds
    fn current_time(&self) -> f64;

    /// Duration of the loaded source, once known
    fn duration(&self) -> Option<f64>;

    /// Whether the resource can accept commands without waiting for `Ready`
    fn is_ready(&self) -> bool;

    fn is_paused(&self) -> bool;
}

/// Events a resource reports back to its controller
#[derive(Clone, Debug, PartialEq)]
pub enum ResourceEvent {
    /// The resource finished initializing
    Ready,
    /// Enough data is buffered to play
    CanPlay,
    Play,
    Pause,
    Ended,
    Error(String),
    /// Position report, `secs` into the source at host time `now_ms`
    Progress { secs: f64, now_ms: f64 },
    /// Duration of the loaded source, in seconds
    Duration(f64),
}
