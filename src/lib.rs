//! Bounded, priority-ordered MPMC message queues with watermark-driven
//! flow control.
//!
//! - [`mpmc::MessageQueue`] — the queue: blocking `put`/`get`, strict
//!   priority delivery with FIFO tie-break, a RUNNING/STOPPED lifecycle,
//!   and high/low watermark notifications dispatched to an observer.
//! - [`gate::WriterGate`] — the suspend/resume coordinator those
//!   notifications drive: the writer that trips the high watermark parks
//!   itself until the low watermark (or a stop) wakes the population.
//! - [`worker`] — ready-made writer/reader threads that pump a queue
//!   until it stops, counting their traffic.

mod buckets;

pub mod gate;
pub mod mpmc;
pub mod worker;
