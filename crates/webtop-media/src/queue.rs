//! Serialized operation queue
//!
//! Embedded players silently drop commands issued back to back (a `play`
//! right after a `load` is the classic case). Every command for a resource
//! goes through one FIFO queue drained by a single worker, which awaits
//! each operation and a settle delay before starting the next. A failed
//! operation is logged and reported to the failure hook; the queue keeps
//! draining.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use futures::channel::oneshot;
use futures::future::{self, Either, LocalBoxFuture};
use futures::FutureExt;
use tracing::{debug, warn};

use crate::error::MediaError;
use crate::operation::AudioOperation;
use crate::resource::MediaResource;

/// Event-loop seam: spawning local tasks and timers
pub trait Scheduler {
    /// Run a task on the current thread's event loop
    fn spawn_local(&self, task: LocalBoxFuture<'static, ()>);

    /// Resolve after `duration`
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;
}

type FailureHook = Rc<dyn Fn(&AudioOperation, &MediaError)>;

struct QueueInner {
    resource: Rc<dyn MediaResource>,
    scheduler: Rc<dyn Scheduler>,
    settle_delay: Duration,
    pending: RefCell<VecDeque<AudioOperation>>,
    draining: Cell<bool>,
    completed: Cell<u64>,
    failed: Cell<u64>,
    on_failure: RefCell<Option<FailureHook>>,
    idle_waiters: RefCell<Vec<oneshot::Sender<()>>>,
}

/// FIFO command queue for one resource. Clones share the same queue.
#[derive(Clone)]
pub struct OperationQueue {
    inner: Rc<QueueInner>,
}

impl OperationQueue {
    pub fn new(
        resource: Rc<dyn MediaResource>,
        scheduler: Rc<dyn Scheduler>,
        settle_delay: Duration,
    ) -> Self {
        Self {
            inner: Rc::new(QueueInner {
                resource,
                scheduler,
                settle_delay,
                pending: RefCell::new(VecDeque::new()),
                draining: Cell::new(false),
                completed: Cell::new(0),
                failed: Cell::new(0),
                on_failure: RefCell::new(None),
                idle_waiters: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Append an operation. Starts the worker if it is not running.
    pub fn enqueue(&self, operation: AudioOperation) {
        debug!(%operation, "enqueue");
        self.inner.pending.borrow_mut().push_back(operation);

        if !self.inner.draining.replace(true) {
            let inner = Rc::clone(&self.inner);
            self.inner.scheduler.spawn_local(drain(inner).boxed_local());
        }
    }

    /// Append several operations in order
    pub fn enqueue_all<I>(&self, operations: I)
    where
        I: IntoIterator<Item = AudioOperation>,
    {
        for operation in operations {
            self.enqueue(operation);
        }
    }

    /// Called with every failed operation and its error
    pub fn set_failure_hook(&self, hook: impl Fn(&AudioOperation, &MediaError) + 'static) {
        *self.inner.on_failure.borrow_mut() = Some(Rc::new(hook));
    }

    /// Operations waiting to run (excluding the one in flight)
    pub fn len(&self) -> usize {
        self.inner.pending.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the worker is running
    pub fn is_draining(&self) -> bool {
        self.inner.draining.get()
    }

    /// Operations that finished successfully
    pub fn completed(&self) -> u64 {
        self.inner.completed.get()
    }

    /// Operations that failed
    pub fn failed(&self) -> u64 {
        self.inner.failed.get()
    }

    /// Resolves once the queue has fully drained
    pub fn idle(&self) -> impl Future<Output = ()> + 'static {
        if !self.is_draining() {
            return Either::Left(future::ready(()));
        }
        let (tx, rx) = oneshot::channel();
        self.inner.idle_waiters.borrow_mut().push(tx);
        Either::Right(rx.map(|_| ()))
    }
}

async fn drain(inner: Rc<QueueInner>) {
    loop {
        let next = inner.pending.borrow_mut().pop_front();
        let Some(operation) = next else {
            break;
        };

        match operation.apply(inner.resource.as_ref()).await {
            Ok(()) => {
                inner.completed.set(inner.completed.get() + 1);
                debug!(%operation, "operation complete");
            }
            Err(err) => {
                inner.failed.set(inner.failed.get() + 1);
                warn!(%operation, %err, "operation failed");
                let hook = inner.on_failure.borrow().clone();
                if let Some(hook) = hook {
                    hook(&operation, &err);
                }
            }
        }

        inner.scheduler.sleep(inner.settle_delay).await;
    }

    inner.draining.set(false);
    let waiters = std::mem::take(&mut *inner.idle_waiters.borrow_mut());
    for waiter in waiters {
        let _ = waiter.send(());
    }
}
