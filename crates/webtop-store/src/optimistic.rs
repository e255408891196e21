//! Optimistic update with rollback.
//!
//! Local state changes immediately so the UI stays responsive; the remote
//! write runs afterwards and, if it fails, the pre-mutation snapshot is
//! restored.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use tracing::warn;

use crate::error::{StoreError, StoreResult};

/// Apply `apply` to `state`, then run the remote commit.
///
/// On commit failure the state is restored to its pre-mutation snapshot and
/// the error is returned. The commit future is created only after the local
/// mutation, so the remote write never observes the old local state.
pub async fn with_optimistic_update<S, A, C, Fut, T>(
    state: &RefCell<S>,
    apply: A,
    commit: C,
) -> StoreResult<T>
where
    S: Clone,
    A: FnOnce(&mut S),
    C: FnOnce() -> Fut,
    Fut: Future<Output = StoreResult<T>>,
{
    let snapshot = state.borrow().clone();
    apply(&mut state.borrow_mut());

    match commit().await {
        Ok(value) => Ok(value),
        Err(err) => {
            warn!(%err, "remote commit failed; rolling back optimistic update");
            *state.borrow_mut() = snapshot;
            Err(err)
        }
    }
}

/// Observable slot holding the most recent error for the UI layer.
///
/// Clones share the same slot.
#[derive(Clone, Debug, Default)]
pub struct ErrorSlot {
    inner: Rc<RefCell<Option<StoreError>>>,
}

impl ErrorSlot {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error, replacing any previous one.
    pub fn set(&self, err: StoreError) {
        *self.inner.borrow_mut() = Some(err);
    }

    /// Current error, if any.
    pub fn get(&self) -> Option<StoreError> {
        self.inner.borrow().clone()
    }

    /// Remove and return the current error.
    pub fn take(&self) -> Option<StoreError> {
        self.inner.borrow_mut().take()
    }

    /// Whether an error is currently recorded.
    pub fn is_set(&self) -> bool {
        self.inner.borrow().is_some()
    }
}
