//! Tracks and source-id derivation
//!
//! The same video can arrive under several URL shapes (`watch?v=`,
//! `youtu.be/`, `/embed/`, `/shorts/`). Queues dedup on the derived id so
//! a playlist synced from the remote service never holds it twice.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use url::Url;

/// A playable entry in a session queue
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub source_url: String,
    pub title: String,
    /// Ordering key, unique within a queue
    pub sequence_id: u64,
}

impl Track {
    pub fn new(source_url: impl Into<String>, title: impl Into<String>, sequence_id: u64) -> Self {
        Self {
            source_url: source_url.into(),
            title: title.into(),
            sequence_id,
        }
    }

    /// Stable identifier used for deduplication
    pub fn source_id(&self) -> String {
        source_id(&self.source_url)
    }
}

/// Derive a stable identifier from a source URL.
///
/// Video URLs on the YouTube hosts yield the video id; anything else,
/// including other hosts that happen to carry a `v` query or an `/embed/`
/// path, yields the trimmed URL itself.
pub fn source_id(url: &str) -> String {
    let url = url.trim();
    video_id(url).unwrap_or_else(|| url.to_string())
}

const YOUTUBE_HOSTS: [&str; 3] = ["youtube.com", "www.youtube.com", "m.youtube.com"];

fn video_id(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    let host = url.host_str()?;
    if host == "youtu.be" {
        return take_id(url.path_segments()?.next()?);
    }
    if !YOUTUBE_HOSTS.contains(&host) {
        return None;
    }
    if let Some((_, id)) = url.query_pairs().find(|(key, _)| key == "v") {
        return take_id(&id);
    }
    let mut segments = url.path_segments()?;
    match segments.next()? {
        "embed" | "shorts" => take_id(segments.next()?),
        _ => None,
    }
}

fn take_id(rest: &str) -> Option<String> {
    let id: String = rest
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    (!id.is_empty()).then_some(id)
}

/// Append `incoming` to `existing`, skipping tracks whose source id is
/// already present. Appended tracks get fresh sequence ids after the
/// largest existing one; `existing` keeps its order.
pub fn merge_tracks<I>(existing: &[Track], incoming: I) -> Vec<Track>
where
    I: IntoIterator<Item = Track>,
{
    let mut seen: HashSet<String> = existing.iter().map(Track::source_id).collect();
    let mut next_sequence = existing
        .iter()
        .map(|t| t.sequence_id + 1)
        .max()
        .unwrap_or(0);

    let mut merged = existing.to_vec();
    for mut track in incoming {
        if !seen.insert(track.source_id()) {
            continue;
        }
        track.sequence_id = next_sequence;
        next_sequence += 1;
        merged.push(track);
    }
    merged
}
