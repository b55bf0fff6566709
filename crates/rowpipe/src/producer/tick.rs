use core::time::Duration;

/// Abstracts how a generation run hands control back to the scheduler
/// between chunks.
///
/// Keeps [`ChunkedProducer`](crate::ChunkedProducer) generic over the async
/// runtime and lets tests substitute a deterministic tick.
pub trait TickProvider {
    /// The future must be `Send` so a run can be spawned onto a multi-threaded
    /// runtime.
    fn tick(frame: Duration) -> impl Future<Output = ()> + Send;
}

/// Sleeps one frame on Tokio's timer between chunks.
///
/// Useful when generation should leave a fixed share of every frame to the
/// front end.
#[cfg(feature = "async-tokio")]
pub struct TokioSleep;

#[cfg(feature = "async-tokio")]
impl TickProvider for TokioSleep {
    fn tick(frame: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(frame)
    }
}

/// Yields to the Tokio scheduler between chunks, ignoring the frame length.
///
/// Generation finishes as fast as the runtime allows while queued work still
/// gets a turn after every chunk. Under heavy load a timer-based tick
/// ([`TokioSleep`]) causes less scheduler churn.
#[cfg(feature = "async-tokio")]
pub struct TokioYield;

#[cfg(feature = "async-tokio")]
impl TickProvider for TokioYield {
    fn tick(_frame: Duration) -> impl Future<Output = ()> + Send {
        tokio::task::yield_now()
    }
}
