use std::error::Error;
use std::fmt;

/// Returned by [`put`](super::MessageQueue::put) when the queue is stopped.
///
/// The rejected message is handed back so the caller can retry after a
/// later `run()` or dispose of it.
pub struct SendError<T>(pub T);

impl<T> SendError<T> {
    /// Consumes the error, yielding the message that was not enqueued.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for SendError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SendError(..)")
    }
}

impl<T> fmt::Display for SendError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("putting on a stopped queue")
    }
}

impl<T> Error for SendError<T> {}

/// Returned by [`get`](super::MessageQueue::get) when the queue is stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecvError;

impl fmt::Display for RecvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("getting from a stopped queue")
    }
}

impl Error for RecvError {}
