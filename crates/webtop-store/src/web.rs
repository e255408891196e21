//! Browser `localStorage` sink.

use tracing::warn;

use crate::local::LocalStore;

/// [`LocalStore`] backed by `window.localStorage`.
///
/// When storage is unavailable (private mode, worker or server context)
/// this behaves like [`NullStore`](crate::NullStore).
pub struct WebStorage {
    storage: Option<web_sys::Storage>,
}

impl Default for WebStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl WebStorage {
    /// Bind to the current window's local storage, if any.
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            warn!("localStorage unavailable; persisted state will not survive reload");
        }
        Self { storage }
    }

    /// Whether a backing storage object exists.
    pub fn is_available(&self) -> bool {
        self.storage.is_some()
    }
}

impl LocalStore for WebStorage {
    fn save(&self, key: &str, value: &str) {
        if let Some(storage) = &self.storage {
            if let Err(err) = storage.set_item(key, value) {
                warn!(key, ?err, "localStorage write failed");
            }
        }
    }

    fn load(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = &self.storage {
            let _ = storage.remove_item(key);
        }
    }
}
