//! Reconciliation between the session and the resource
//!
//! When the panel mounts, the session says what should be happening and
//! the resource says what is. [`plan_reconciliation`] computes the smallest
//! command list that closes the gap; the controller enqueues it while in
//! [`SyncState::Reconciling`] so the resulting resource events are not
//! mistaken for user actions.

use crate::config::PlaybackConfig;
use crate::operation::AudioOperation;
use crate::resource::MediaResource;
use crate::session::PlaybackSession;

/// Controller synchronization state.
///
/// `AwaitingReady -> Reconciling -> Listening`, back to `Reconciling` on
/// every mount. `Unloading` is terminal and reachable from any state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SyncState {
    /// No reconciliation has run; waiting for the resource to be ready
    #[default]
    AwaitingReady,
    /// Reconciliation commands are in flight; resource events are ignored
    Reconciling,
    /// Resource events update the session
    Listening,
    /// The page is going away; nothing but the final release runs
    Unloading,
}

impl SyncState {
    /// Whether resource play/pause/ended/progress events should be ignored
    pub fn ignores_events(self) -> bool {
        !matches!(self, SyncState::Listening)
    }

    pub fn is_unloading(self) -> bool {
        matches!(self, SyncState::Unloading)
    }
}

/// What the session wants
#[derive(Clone, Debug, PartialEq)]
pub struct DesiredPlayback {
    pub source: Option<String>,
    pub position_secs: f64,
    pub is_playing: bool,
    pub volume: f64,
}

impl DesiredPlayback {
    pub fn from_session(session: &PlaybackSession) -> Self {
        Self {
            source: session.current_track().map(|t| t.source_url.clone()),
            position_secs: session.position_secs,
            is_playing: session.is_playing,
            volume: session.volume,
        }
    }
}

/// What the resource reports
#[derive(Clone, Debug, PartialEq)]
pub struct ActualPlayback {
    pub source: Option<String>,
    pub position_secs: f64,
    pub is_paused: bool,
}

impl ActualPlayback {
    pub fn from_resource(resource: &dyn MediaResource) -> Self {
        Self {
            source: resource.current_source(),
            position_secs: resource.current_time(),
            is_paused: resource.is_paused(),
        }
    }
}

/// Commands that bring the resource in line with the session.
///
/// - a source is loaded only when it differs from the resource's
/// - a seek is issued only when the position is off by more than the seek
///   threshold (always after a new source, unless starting from 0)
/// - play/pause is issued only when the resource is in the wrong state
pub fn plan_reconciliation(
    desired: &DesiredPlayback,
    actual: &ActualPlayback,
    config: &PlaybackConfig,
) -> Vec<AudioOperation> {
    let mut ops = Vec::new();

    let Some(source) = &desired.source else {
        if !actual.is_paused {
            ops.push(AudioOperation::Pause);
        }
        return ops;
    };

    let source_changed = actual.source.as_deref() != Some(source.as_str());
    if source_changed {
        ops.push(AudioOperation::SetSource(source.clone()));
        ops.push(AudioOperation::Load);
    }

    ops.push(AudioOperation::SetVolume(desired.volume));

    let drift = (actual.position_secs - desired.position_secs).abs();
    let needs_seek = if source_changed {
        desired.position_secs > 0.0
    } else {
        drift > config.seek_threshold_secs
    };
    if needs_seek {
        ops.push(AudioOperation::SetPosition(desired.position_secs));
    }

    // A freshly loaded source is paused
    let paused = source_changed || actual.is_paused;
    if desired.is_playing && paused {
        ops.push(AudioOperation::Play);
    } else if !desired.is_playing && !paused {
        ops.push(AudioOperation::Pause);
    }

    ops
}
