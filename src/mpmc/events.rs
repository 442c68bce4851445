/// Notification sink for queue lifecycle and watermark transitions.
///
/// The queue never invokes a callback while holding its internal lock, and
/// always calls through a strong local clone of the installed handle, so
/// [`set_events`](super::MessageQueue::set_events) on another thread cannot
/// invalidate a callback mid-call.
///
/// Callback threads are whoever triggered the transition:
///
/// | Callback   | Runs on                                        |
/// |------------|------------------------------------------------|
/// | `on_start` | the caller of [`run`](super::MessageQueue::run)  |
/// | `on_stop`  | the caller of [`stop`](super::MessageQueue::stop) |
/// | `on_hwm`   | the producer whose `put` crossed the high watermark |
/// | `on_lwm`   | the consumer whose `get` drained back to the low watermark |
///
/// This attribution is load-bearing: `on_hwm` may block its caller (see
/// [`GateEvents`](crate::gate::GateEvents)), which is precisely how
/// producer self-suspension works. Implementations must be thread-safe,
/// must not panic, and must tolerate repeated `on_start`/`on_stop` — a
/// `run()` on an already-running queue re-emits `on_start`, and every
/// `stop()` (including the one performed on drop) re-emits `on_stop`.
pub trait QueueEvents: Send + Sync {
    fn on_start(&self);
    fn on_stop(&self);
    fn on_hwm(&self);
    fn on_lwm(&self);
}
