use std::fmt;

use crate::error::MediaResult;
use crate::resource::MediaResource;

/// A command for the playback resource.
///
/// Operations only reach the resource through the operation queue.
#[derive(Clone, Debug, PartialEq)]
pub enum AudioOperation {
    Play,
    Pause,
    /// Load (or reload) the current source
    Load,
    SetSource(String),
    /// Seek, in seconds
    SetPosition(f64),
    /// Volume in `[0, 1]`
    SetVolume(f64),
    /// Stop and drop the source
    Release,
}

impl AudioOperation {
    /// Run this operation against a resource
    pub async fn apply(&self, resource: &dyn MediaResource) -> MediaResult<()> {
        match self {
            AudioOperation::Play => resource.play().await,
            AudioOperation::Pause => resource.pause().await,
            AudioOperation::Load => resource.load().await,
            AudioOperation::SetSource(url) => resource.set_source(url.clone()).await,
            AudioOperation::SetPosition(secs) => resource.seek_to(*secs).await,
            AudioOperation::SetVolume(volume) => resource.set_volume(*volume).await,
            AudioOperation::Release => resource.release().await,
        }
    }
}

impl fmt::Display for AudioOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioOperation::Play => write!(f, "play"),
            AudioOperation::Pause => write!(f, "pause"),
            AudioOperation::Load => write!(f, "load"),
            AudioOperation::SetSource(url) => write!(f, "set_source({url})"),
            AudioOperation::SetPosition(secs) => write!(f, "set_position({secs:.1})"),
            AudioOperation::SetVolume(volume) => write!(f, "set_volume({volume:.2})"),
            AudioOperation::Release => write!(f, "release"),
        }
    }
}
