//! Synchronous key-value persistence sink.
//!
//! Used for state that should survive a page reload but does not belong
//! on the remote service. Implementations must never panic when storage
//! is missing: [`NullStore`] is the degenerate sink for contexts without
//! persistent storage.

use std::cell::RefCell;
use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::StoreResult;

/// Key-value persistence sink.
///
/// Methods take `&self` because a single sink is shared by every feature
/// that persists through it.
pub trait LocalStore {
    /// Store a value under `key`, replacing any previous value.
    fn save(&self, key: &str, value: &str);

    /// Load the value stored under `key`, if any.
    fn load(&self, key: &str) -> Option<String>;

    /// Remove the value stored under `key`.
    fn remove(&self, key: &str);
}

/// Load and deserialize a JSON value.
///
/// Missing keys and corrupt payloads both yield `None`; corrupt payloads
/// are logged so a bad write can be diagnosed.
pub fn load_json<T: DeserializeOwned>(store: &dyn LocalStore, key: &str) -> Option<T> {
    let raw = store.load(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(key, %err, "discarding corrupt persisted value");
            None
        }
    }
}

/// Serialize a value as JSON and save it.
pub fn save_json<T: Serialize + ?Sized>(
    store: &dyn LocalStore,
    key: &str,
    value: &T,
) -> StoreResult<()> {
    let raw = serde_json::to_string(value)?;
    store.save(key, &raw);
    Ok(())
}

/// In-memory sink for tests and headless hosts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl LocalStore for MemoryStore {
    fn save(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn load(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

/// Sink used when no persistent storage exists (e.g. server rendering).
///
/// Saves are dropped and every load misses.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullStore;

impl LocalStore for NullStore {
    fn save(&self, _key: &str, _value: &str) {}

    fn load(&self, _key: &str) -> Option<String> {
        None
    }

    fn remove(&self, _key: &str) {}
}
