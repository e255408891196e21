use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Media players managed by the hub. Each kind owns exactly one resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaKind {
    Music,
    Ambience,
}

impl MediaKind {
    pub const ALL: [MediaKind; 2] = [MediaKind::Music, MediaKind::Ambience];

    /// Local store key holding the persisted session
    pub fn storage_key(self) -> &'static str {
        match self {
            MediaKind::Music => "webtop.media.music",
            MediaKind::Ambience => "webtop.media.ambience",
        }
    }
}

/// Tuning for a playback controller
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Pause between queued operations so embedded players don't drop commands
    pub settle_delay: Duration,
    /// Reconciliation seeks only when the resource is further off than this
    pub seek_threshold_secs: f64,
    /// Sampled positions closer than this are not written back
    pub drift_threshold_secs: f64,
    /// Minimum time between position samples
    pub sample_interval_ms: f64,
    /// Volume for a fresh session
    pub default_volume: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(50),
            seek_threshold_secs: 2.0,
            drift_threshold_secs: 1.0,
            sample_interval_ms: 5000.0,
            default_volume: 0.7,
        }
    }
}
