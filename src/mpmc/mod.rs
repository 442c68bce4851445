//! Bounded priority MPMC queue with watermark flow control
//!
//! A mutex-and-condvar queue mediating between writer and reader threads
//! under three simultaneous constraints: strict priority ordering on
//! delivery, a hard capacity that blocks writers when full, and
//! out-of-band watermark notifications the application uses to suspend and
//! resume the whole writer population.
//!
//! ## How it works
//!
//!```text
//!            put(msg, prio)                            get()
//! writer ──────────► ┌───────────────────────────┐ ◄────────── reader
//! writer ──────────► │  prio 9 → [ a, b ]        │ ◄────────── reader
//! writer ──────────► │  prio 4 → [ c ]           │
//!                    │  prio 1 → [ d, e, f ]     │
//!                    └───────────────────────────┘
//!                     bounded by capacity; pop takes
//!                     the front of the highest bucket
//!```
//!
//! Delivery always selects the numerically largest priority currently
//! resident; within one priority, messages leave in insertion order. There
//! is no global FIFO across priorities and no fairness guarantee — a
//! sustained high-priority influx starves lower buckets.
//!
//! ## Watermarks
//!
//! An optional [`QueueEvents`] observer receives four callbacks, each
//! dispatched with the queue lock released, on the thread that caused the
//! transition:
//!
//! | Callback   | Fires when                                     | Typical reaction |
//! |------------|------------------------------------------------|------------------|
//! | `on_start` | `run()`                                        | wake all writers |
//! | `on_stop`  | `stop()` (and queue drop)                      | wake all writers |
//! | `on_hwm`   | a `put` finds the queue at or above `hwm`      | the calling writer suspends itself |
//! | `on_lwm`   | a `get` drains back to `lwm` after an `on_hwm` | wake all writers |
//!
//! `on_hwm` may block its caller — that is the intended flow-control
//! mechanism, packaged in [`GateEvents`](crate::gate::GateEvents). Because
//! the queue refuses to encode writer-pause policy, it does not re-check
//! the watermark after `on_hwm` returns: racing writers may briefly push
//! the size above `hwm` (never above capacity). The `on_hwm`/`on_lwm`
//! pair is edge-latched — draining past `lwm` again without an
//! intervening `on_hwm` stays silent.
//!
//! ## Stopping
//!
//! `stop()` releases every blocked `put` and `get` and makes all
//! subsequent calls return the stopped error until the next `run()`. A
//! message is either resident (its `put` returned `Ok`) or handed back
//! inside [`SendError`]; nothing is silently dropped.
//!
//! ## Example
//!
//!```
//! use marea::mpmc::MessageQueue;
//!
//! let queue = MessageQueue::new(8, 1, 6);
//! queue.run();
//!
//! queue.put("routine", 1).unwrap();
//! queue.put("urgent", 5).unwrap();
//!
//! assert_eq!(queue.get(), Ok("urgent"));
//! assert_eq!(queue.get(), Ok("routine"));
//! queue.stop();
//! ```
mod error;
mod events;
mod queue;

pub use error::{RecvError, SendError};
pub use events::QueueEvents;
pub use queue::MessageQueue;
