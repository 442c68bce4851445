//! Writer suspension gate
//!
//! The flow-control half of the watermark protocol: the queue reports
//! crossings through [`QueueEvents`], and a [`WriterGate`] turns those
//! reports into "pause every writer until further notice". One gate serves
//! one population of writers; applications running several queues give
//! each queue's writers their own gate.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use log::debug;

use crate::mpmc::QueueEvents;

#[derive(Clone, Copy, PartialEq, Eq)]
enum GateState {
    Suspended,
    Running,
}

/// Suspend/resume coordinator shared by a population of writer threads.
///
/// Suspension is cooperative and self-inflicted: a writer is only ever
/// paused by its own call to [`suspend_all`](Self::suspend_all), typically
/// made from inside the queue's `on_hwm` callback. Threads that never call
/// it are unaffected by the gate's state. This is what makes the
/// high-watermark callback naturally self-blocking — each writer that
/// trips the watermark parks itself, while the others keep going until
/// they trip it too.
pub struct WriterGate {
    state: Mutex<GateState>,
    notify: Condvar,
}

impl WriterGate {
    /// Creates a gate in the suspended state: writers that consult it park
    /// until the first wake, typically the queue's `on_start`.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GateState::Suspended),
            notify: Condvar::new(),
        }
    }

    /// Parks the calling thread until [`wake_all`](Self::wake_all).
    ///
    /// The gate is flipped to suspended first, so a wake that happened
    /// before this call does not leak through.
    pub fn suspend_all(&self) {
        let mut state = self.lock();
        *state = GateState::Suspended;
        while *state == GateState::Suspended {
            state = self
                .notify
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Releases every parked writer. A no-op while the gate is already
    /// running.
    pub fn wake_all(&self) {
        *self.lock() = GateState::Running;
        self.notify.notify_all();
    }

    /// Returns true while the gate is suspended: writers inside
    /// [`suspend_all`](Self::suspend_all) stay parked until the next
    /// [`wake_all`](Self::wake_all).
    #[inline]
    pub fn is_suspended(&self) -> bool {
        *self.lock() == GateState::Suspended
    }

    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for WriterGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Queue observer that drives a [`WriterGate`].
///
/// Wire it up with [`set_events`](crate::mpmc::MessageQueue::set_events)
/// and the watermark protocol falls out: the writer whose `put` crosses
/// the high watermark suspends itself inside `on_hwm`, and the low
/// watermark, queue start and queue stop all wake the whole writer
/// population. Waking on stop is what lets suspended writers observe the
/// stopped queue and exit.
pub struct GateEvents {
    gate: Arc<WriterGate>,
}

impl GateEvents {
    pub fn new(gate: Arc<WriterGate>) -> Self {
        Self { gate }
    }
}

impl QueueEvents for GateEvents {
    fn on_start(&self) {
        self.gate.wake_all();
    }

    fn on_stop(&self) {
        self.gate.wake_all();
    }

    fn on_hwm(&self) {
        debug!("high watermark reached, suspending writers");
        self.gate.suspend_all();
    }

    fn on_lwm(&self) {
        debug!("low watermark reached, waking writers");
        self.gate.wake_all();
    }
}
