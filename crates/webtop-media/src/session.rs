//! Playback session state
//!
//! The session outlives the UI panel that controls it: closing the window
//! only flips `is_window_open`. It is reset only when its queue empties.

use serde::{Deserialize, Serialize};

use crate::error::{MediaError, MediaResult};
use crate::track::{merge_tracks, Track};

/// Playback state for one media kind
#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackSession {
    /// Play order
    pub queue: Vec<Track>,
    /// Index into `queue`; 0 when the queue is empty
    pub current_index: usize,
    pub is_playing: bool,
    pub position_secs: f64,
    /// Duration of the current track, once the resource reports it
    pub duration_secs: Option<f64>,
    /// Volume in `[0, 1]`
    pub volume: f64,
    /// Volume to restore when unmuting
    pub muted_volume: Option<f64>,
    /// Whether the controlling panel is mounted
    pub is_window_open: bool,
}

impl PlaybackSession {
    pub fn new(volume: f64) -> Self {
        Self {
            queue: Vec::new(),
            current_index: 0,
            is_playing: false,
            position_secs: 0.0,
            duration_secs: None,
            volume: clamp_volume(volume).unwrap_or(1.0),
            muted_volume: None,
            is_window_open: false,
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.queue.get(self.current_index)
    }

    pub fn is_muted(&self) -> bool {
        self.muted_volume.is_some()
    }

    /// Index after the current one, wrapping. `None` with one track or fewer.
    pub fn next_index(&self) -> Option<usize> {
        let len = self.len();
        (len > 1).then(|| (self.current_index + 1) % len)
    }

    /// Index before the current one, wrapping. `None` with one track or fewer.
    pub fn previous_index(&self) -> Option<usize> {
        let len = self.len();
        (len > 1).then(|| (self.current_index + len - 1) % len)
    }

    /// Make `index` current and rewind
    pub fn select(&mut self, index: usize) -> MediaResult<()> {
        if index >= self.len() {
            return Err(MediaError::TrackOutOfRange {
                index,
                len: self.len(),
            });
        }
        self.current_index = index;
        self.rewind();
        Ok(())
    }

    /// Move to the track after the current one, wrapping to 0.
    ///
    /// Unlike [`next_index`](Self::next_index) a single track wraps onto
    /// itself, which is how an `ended` event replays it.
    pub fn advance(&mut self) {
        if !self.is_empty() {
            self.current_index = (self.current_index + 1) % self.len();
            self.rewind();
        }
    }

    /// Set the position, clamped to `[0, duration]`. Non-finite input is ignored.
    pub fn set_position(&mut self, secs: f64) {
        if !secs.is_finite() {
            return;
        }
        let upper = self.duration_secs.unwrap_or(f64::MAX);
        self.position_secs = secs.clamp(0.0, upper);
    }

    /// Record the resource-reported duration of the current track
    pub fn set_duration(&mut self, secs: f64) {
        if secs.is_finite() && secs > 0.0 {
            self.duration_secs = Some(secs);
            self.set_position(self.position_secs);
        }
    }

    /// Set the volume, clamped to `[0, 1]`. Clears any mute.
    pub fn set_volume(&mut self, volume: f64) {
        if let Some(volume) = clamp_volume(volume) {
            self.volume = volume;
            self.muted_volume = None;
        }
    }

    /// Mute, or restore the volume from before muting
    pub fn toggle_mute(&mut self) {
        match self.muted_volume.take() {
            Some(previous) => self.volume = previous,
            None => {
                self.muted_volume = Some(self.volume);
                self.volume = 0.0;
            }
        }
    }

    /// Append a track unless its source id is already queued.
    /// Returns whether the queue changed.
    pub fn add_track(&mut self, source_url: impl Into<String>, title: impl Into<String>) -> bool {
        self.merge_remote([Track::new(source_url, title, 0)]) == 1
    }

    /// Merge tracks from the remote playlist, deduplicating by source id.
    /// Returns how many tracks were added.
    pub fn merge_remote<I>(&mut self, tracks: I) -> usize
    where
        I: IntoIterator<Item = Track>,
    {
        let before = self.len();
        self.queue = merge_tracks(&self.queue, tracks);
        self.len() - before
    }

    /// Remove a track, keeping `current_index` in range.
    ///
    /// Removing the current track makes the following track current (or
    /// the new last one). Emptying the queue resets playback.
    pub fn remove_track(&mut self, index: usize) -> MediaResult<Track> {
        if index >= self.len() {
            return Err(MediaError::TrackOutOfRange {
                index,
                len: self.len(),
            });
        }
        let removed = self.queue.remove(index);

        if self.queue.is_empty() {
            self.current_index = 0;
            self.is_playing = false;
            self.rewind();
        } else if index < self.current_index {
            self.current_index -= 1;
        } else if index == self.current_index {
            self.current_index = self.current_index.min(self.len() - 1);
            self.rewind();
        }
        Ok(removed)
    }

    /// State written to the local store
    pub fn to_persisted(&self) -> PersistedSession {
        PersistedSession {
            queue: self.queue.clone(),
            current_index: self.current_index,
            is_playing: self.is_playing,
            position_secs: self.position_secs,
            volume: self.volume,
            muted_volume: self.muted_volume,
        }
    }

    /// Rebuild a session from persisted state, repairing out-of-range values
    pub fn from_persisted(persisted: PersistedSession) -> Self {
        let mut session = Self::new(persisted.volume);
        session.queue = persisted.queue;
        session.muted_volume = persisted.muted_volume.and_then(clamp_volume);
        if !session.is_empty() {
            session.current_index = persisted.current_index.min(session.len() - 1);
            session.is_playing = persisted.is_playing;
            session.set_position(persisted.position_secs);
        }
        session
    }

    fn rewind(&mut self) {
        self.position_secs = 0.0;
        self.duration_secs = None;
    }
}

fn clamp_volume(volume: f64) -> Option<f64> {
    volume.is_finite().then(|| volume.clamp(0.0, 1.0))
}

/// Session fields that survive a reload
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersistedSession {
    pub queue: Vec<Track>,
    pub current_index: usize,
    pub is_playing: bool,
    pub position_secs: f64,
    pub volume: f64,
    #[serde(default)]
    pub muted_volume: Option<f64>,
}
