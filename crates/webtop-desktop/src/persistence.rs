//! Window registry snapshots
//!
//! Window layout survives reloads by serializing the registry to JSON and
//! handing it to whatever local store the host uses.

use serde::{Deserialize, Serialize};

use crate::error::{DesktopError, DesktopResult};
use crate::types::WindowId;
use crate::window::{Window, WindowManager};

/// Serializable state of a [`WindowManager`]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Windows, lowest z-order first
    pub windows: Vec<Window>,
    /// Focus history, most recent last
    pub focus_stack: Vec<WindowId>,
    pub next_id: WindowId,
}

impl Snapshot {
    pub fn to_json(&self) -> DesktopResult<String> {
        serde_json::to_string(self).map_err(|e| DesktopError::SerializationError(e.to_string()))
    }

    pub fn from_json(json: &str) -> DesktopResult<Self> {
        serde_json::from_str(json).map_err(|e| DesktopError::SerializationError(e.to_string()))
    }
}

impl WindowManager {
    /// Capture the registry for persistence
    pub fn snapshot(&self) -> Snapshot {
        let (windows, focus_stack, next_id) = self.parts();
        Snapshot {
            windows,
            focus_stack,
            next_id,
        }
    }

    /// Rebuild a registry from a snapshot. Z-order is renumbered from the
    /// snapshot order and stale focus entries are dropped.
    pub fn restore_snapshot(snapshot: Snapshot) -> Self {
        WindowManager::from_parts(snapshot.windows, snapshot.focus_stack, snapshot.next_id)
    }
}
