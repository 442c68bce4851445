//! Writer and reader worker threads
//!
//! Thin thread wrappers for pumping a [`MessageQueue`] until it stops:
//! a [`Writer`] composes and puts messages at a fixed priority, a
//! [`Reader`] gets messages and hands them to a handler. Both tally their
//! successful operations into a shared [`Tally`], which is how shutdown
//! tests check conservation (every message put is eventually read).

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};

use crossbeam_utils::CachePadded;
use log::{debug, trace};

use crate::mpmc::MessageQueue;

/// Shared counters of successful queue operations.
///
/// The queue itself never looks at these; they exist for the application
/// and its tests. Padded so the writer herd and the reader herd don't
/// false-share a cache line.
#[derive(Default)]
pub struct Tally {
    written: CachePadded<AtomicUsize>,
    read: CachePadded<AtomicUsize>,
}

impl Tally {
    /// Number of `put` calls that returned `Ok`.
    pub fn written(&self) -> usize {
        self.written.load(Ordering::Relaxed)
    }

    /// Number of messages delivered to reader handlers.
    pub fn read(&self) -> usize {
        self.read.load(Ordering::Relaxed)
    }

    fn record_written(&self) {
        self.written.fetch_add(1, Ordering::Relaxed);
    }

    fn record_read(&self) {
        self.read.fetch_add(1, Ordering::Relaxed);
    }
}

/// A writer thread feeding one queue at a fixed priority.
///
/// The thread loops composing messages with the factory and putting them
/// until the queue reports stopped. Dropping the writer stops the queue —
/// otherwise a blocked or gate-suspended thread could never be joined —
/// and then joins it.
pub struct Writer<T> {
    queue: Arc<MessageQueue<T>>,
    handle: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Writer<T> {
    /// Spawns the writer thread. `compose` receives the per-writer
    /// sequence number of the message it is about to build.
    pub fn spawn<F>(
        queue: Arc<MessageQueue<T>>,
        priority: i32,
        tally: Arc<Tally>,
        mut compose: F,
    ) -> Self
    where
        F: FnMut(usize) -> T + Send + 'static,
    {
        let handle = {
            let queue = queue.clone();
            thread::spawn(move || {
                let mut seq = 0;
                loop {
                    let message = compose(seq);
                    if queue.put(message, priority).is_err() {
                        break;
                    }
                    tally.record_written();
                    trace!("writer put message #{seq} at priority {priority}");
                    seq += 1;
                }
                debug!("writer at priority {priority} detected queue stop after {seq} messages");
            })
        };
        Self {
            queue,
            handle: Some(handle),
        }
    }
}

impl<T> Drop for Writer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            // stop() wakes both condvar waiters and gate-suspended
            // writers. A writer that was preempted between the lifecycle
            // check and its gate park can miss a single wake, so keep
            // stopping until the thread has actually wound down.
            while !handle.is_finished() {
                self.queue.stop();
                thread::yield_now();
            }
            let _ = handle.join();
        }
    }
}

/// A reader thread draining one queue into a handler.
///
/// The thread loops getting messages until the queue reports stopped.
/// Dropping the reader stops the queue and joins the thread, mirroring
/// [`Writer`].
pub struct Reader<T> {
    queue: Arc<MessageQueue<T>>,
    handle: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Reader<T> {
    pub fn spawn<F>(queue: Arc<MessageQueue<T>>, tally: Arc<Tally>, mut handle_message: F) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        let handle = {
            let queue = queue.clone();
            thread::spawn(move || {
                let mut seq = 0_usize;
                while let Ok(message) = queue.get() {
                    handle_message(message);
                    tally.record_read();
                    seq += 1;
                    trace!("reader handled message #{seq}");
                }
                debug!("reader detected queue stop after {seq} messages");
            })
        };
        Self {
            queue,
            handle: Some(handle),
        }
    }
}

impl<T> Drop for Reader<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.queue.stop();
            let _ = handle.join();
        }
    }
}
