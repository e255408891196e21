//! Page lifecycle bus
//!
//! Wraps visibility and unload signals so controllers subscribe to events
//! instead of reading a global "page is unloading" flag. Hosts forward the
//! platform events with [`PageLifecycle::emit`].

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::debug;

/// Page lifecycle signal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageEvent {
    /// The tab was hidden (switched away, minimized)
    Hidden,
    Visible,
    /// `pagehide`; `persisted` means the page enters the back/forward cache
    PageHide { persisted: bool },
    BeforeUnload,
}

impl PageEvent {
    /// Whether the page is actually going away, as opposed to being hidden
    pub fn is_unload(self) -> bool {
        matches!(
            self,
            PageEvent::BeforeUnload | PageEvent::PageHide { persisted: false }
        )
    }
}

type Listener = Rc<dyn Fn(PageEvent)>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

/// Broadcasts page lifecycle events to subscribers. Clones share listeners.
#[derive(Clone, Default)]
pub struct PageLifecycle {
    listeners: Rc<RefCell<Listeners>>,
}

impl PageLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. It stays registered until the returned
    /// subscription is dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, listener: impl Fn(PageEvent) + 'static) -> Subscription {
        let mut listeners = self.listeners.borrow_mut();
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.entries.push((id, Rc::new(listener)));
        Subscription {
            listeners: Rc::downgrade(&self.listeners),
            id,
        }
    }

    /// Deliver an event to every current subscriber
    pub fn emit(&self, event: PageEvent) {
        let snapshot: Vec<Listener> = self
            .listeners
            .borrow()
            .entries
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        debug!(?event, listeners = snapshot.len(), "page lifecycle event");
        for listener in snapshot {
            listener(event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.borrow().entries.len()
    }
}

/// Active subscription; unsubscribes on drop
pub struct Subscription {
    listeners: Weak<RefCell<Listeners>>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.borrow_mut().entries.retain(|(id, _)| *id != self.id);
        }
    }
}
