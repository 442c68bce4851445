use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use crate::buckets::PriorityBuckets;
use crate::mpmc::{QueueEvents, RecvError, SendError};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Stopped,
    Running,
}

/// Everything the queue mutates, guarded by one mutex. The mutex is the
/// queue's single linearization point; it is never held across an observer
/// callback or a condvar wait.
struct Shared<T> {
    buckets: PriorityBuckets<T>,
    lifecycle: Lifecycle,
    /// Set when a `put` observed `len >= hwm` with an observer attached,
    /// cleared by the `get` that drains back to `lwm`. Suppresses `on_lwm`
    /// for low-watermark crossings that were never preceded by `on_hwm`.
    hwm_latched: bool,
    events: Option<Arc<dyn QueueEvents>>,
}

/// A bounded, priority-ordered, multi-producer multi-consumer queue.
///
/// Producers block while the queue is full, consumers block while it is
/// empty, and both are released promptly by [`stop`](Self::stop). An
/// optional [`QueueEvents`] observer is told about lifecycle transitions
/// and high/low watermark crossings; see the [module docs](crate::mpmc)
/// for the flow-control protocol built on top of those callbacks.
///
/// The queue itself is not cloned; producers and consumers share it
/// through an `Arc`.
pub struct MessageQueue<T> {
    shared: Mutex<Shared<T>>,
    /// Signaled when the queue grows or the lifecycle turns STOPPED
    readers: Condvar,
    /// Signaled when the queue shrinks or the lifecycle turns STOPPED
    writers: Condvar,
    capacity: usize,
    lwm: usize,
    hwm: usize,
}

impl<T> MessageQueue<T> {
    /// Creates a queue holding at most `capacity` messages, with low and
    /// high watermarks at `lwm` and `hwm`.
    ///
    /// The queue starts stopped; call [`run`](Self::run) before the first
    /// `put` or `get`.
    ///
    /// # Panics
    ///
    /// Invalid configuration is a programming error, not a runtime one:
    /// requires `capacity > 0`, `lwm < hwm` and `hwm <= capacity`.
    pub fn new(capacity: usize, lwm: usize, hwm: usize) -> Self {
        assert!(capacity > 0, "capacity must be positive");
        assert!(lwm < hwm, "lwm must be below hwm");
        assert!(hwm <= capacity, "hwm must not exceed capacity");

        Self {
            shared: Mutex::new(Shared {
                buckets: PriorityBuckets::default(),
                lifecycle: Lifecycle::Stopped,
                hwm_latched: false,
                events: None,
            }),
            readers: Condvar::new(),
            writers: Condvar::new(),
            capacity,
            lwm,
            hwm,
        }
    }

    /// Enqueues `message` at `priority`, blocking while the queue is full.
    ///
    /// If the queue sits at or above its high watermark and an observer is
    /// installed, `on_hwm` is dispatched first — on this thread, with the
    /// queue lock released — and may itself block (see
    /// [`GateEvents`](crate::gate::GateEvents)). Once the callback
    /// returns, the put proceeds without re-examining the watermark, so
    /// racing producers can transiently push the size above `hwm`; the
    /// `capacity` bound is never exceeded.
    ///
    /// Returns the message back in [`SendError`] if the queue is stopped
    /// on entry or becomes stopped while this call is blocked. An `Ok`
    /// means the message is resident; an `Err` means it is not.
    pub fn put(&self, message: T, priority: i32) -> Result<(), SendError<T>> {
        let mut shared = self.lock();
        if shared.lifecycle == Lifecycle::Stopped {
            return Err(SendError(message));
        }

        if shared.buckets.len() >= self.hwm {
            if let Some(events) = shared.events.clone() {
                shared.hwm_latched = true;
                drop(shared);
                events.on_hwm();
                shared = self.lock();
                if shared.lifecycle == Lifecycle::Stopped {
                    return Err(SendError(message));
                }
                // The watermark is deliberately not re-examined here. The
                // queue does not assume on_hwm paused anyone; producers
                // racing through this point push the size above hwm.
            }
        }

        shared = self
            .writers
            .wait_while(shared, |s| {
                s.lifecycle == Lifecycle::Running && s.buckets.len() == self.capacity
            })
            .unwrap_or_else(PoisonError::into_inner);
        if shared.lifecycle == Lifecycle::Stopped {
            return Err(SendError(message));
        }

        shared.buckets.push(priority, message);
        drop(shared);
        self.readers.notify_all();
        Ok(())
    }

    /// Dequeues the highest-priority message, blocking while the queue is
    /// empty. Ties within a priority deliver in insertion order.
    ///
    /// When this pop drains the queue back to its low watermark and a
    /// preceding `put` latched the high watermark, `on_lwm` is dispatched
    /// on this thread with the lock released, exactly once per latch edge.
    ///
    /// Returns [`RecvError`] if the queue is stopped on entry or becomes
    /// stopped while this call is blocked; resident messages are not
    /// delivered to calls that arrive after `stop`.
    pub fn get(&self) -> Result<T, RecvError> {
        let mut shared = self.lock();
        if shared.lifecycle == Lifecycle::Stopped {
            return Err(RecvError);
        }

        shared = self
            .readers
            .wait_while(shared, |s| {
                s.lifecycle == Lifecycle::Running && s.buckets.is_empty()
            })
            .unwrap_or_else(PoisonError::into_inner);
        if shared.lifecycle == Lifecycle::Stopped {
            return Err(RecvError);
        }

        let message = shared
            .buckets
            .pop_highest()
            .expect("woken with no pending messages");

        if shared.hwm_latched && shared.buckets.len() == self.lwm {
            if let Some(events) = shared.events.clone() {
                shared.hwm_latched = false;
                drop(shared);
                events.on_lwm();
                self.writers.notify_all();
                return Ok(message);
            }
        }

        drop(shared);
        self.writers.notify_all();
        Ok(message)
    }

    /// Installs, replaces or removes the observer.
    ///
    /// Replacement is safe while callbacks are in flight: every dispatch
    /// goes through a strong clone of the handle taken under the lock, so
    /// an in-progress callback keeps its observer alive.
    pub fn set_events(&self, events: Option<Arc<dyn QueueEvents>>) {
        self.lock().events = events;
    }

    /// Transitions to RUNNING and dispatches `on_start` (with the lock
    /// released, on this thread). Calling `run` on a queue that is already
    /// running re-emits `on_start`.
    pub fn run(&self) {
        let mut shared = self.lock();
        shared.lifecycle = Lifecycle::Running;
        let events = shared.events.clone();
        drop(shared);
        if let Some(events) = events {
            events.on_start();
        }
        self.writers.notify_all();
        self.readers.notify_all();
    }

    /// Transitions to STOPPED, dispatches `on_stop` and releases every
    /// blocked `put` and `get`. Idempotent, and safe to call repeatedly;
    /// each call re-emits `on_stop`. Dropping the queue stops it.
    pub fn stop(&self) {
        let mut shared = self.lock();
        shared.lifecycle = Lifecycle::Stopped;
        let events = shared.events.clone();
        drop(shared);
        if let Some(events) = events {
            events.on_stop();
        }
        self.writers.notify_all();
        self.readers.notify_all();
    }

    /// Snapshot of the number of resident messages.
    pub fn len(&self) -> usize {
        self.lock().buckets.len()
    }

    /// Returns true if no message is resident.
    pub fn is_empty(&self) -> bool {
        self.lock().buckets.is_empty()
    }

    /// Maximum number of resident messages.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    fn lock(&self) -> MutexGuard<'_, Shared<T>> {
        // Shared state is only mutated under the lock by non-panicking
        // code; a poisoned lock still holds a consistent queue.
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Drop for MessageQueue<T> {
    fn drop(&mut self) {
        self.stop();
    }
}
