use super::{manager::WorkerPool, request::WorkRequest};
use rowpipe::Result;
use std::sync::Arc;

/// The only way the coordinator reaches a DataWorker.
///
/// Implementations deliver a [`WorkRequest`] somewhere that will eventually
/// answer through the request's reply channel. [`WorkerPool`] is the real
/// transport; tests script replies by hand to force any arrival order.
pub trait WorkerChannel: Send + Sync + 'static {
    /// Hands `request` to a worker. Resolves once the request is queued, not
    /// when it is answered.
    fn dispatch(&self, request: WorkRequest) -> impl Future<Output = Result<()>> + Send;

    /// Stops accepting work and releases the workers.
    fn shutdown(&self) -> impl Future<Output = Result<()>> + Send {
        async { Ok(()) }
    }
}

impl WorkerChannel for WorkerPool {
    fn dispatch(&self, request: WorkRequest) -> impl Future<Output = Result<()>> + Send {
        self.send_to_next_worker(request)
    }

    fn shutdown(&self) -> impl Future<Output = Result<()>> + Send {
        WorkerPool::shutdown(self)
    }
}

impl<C> WorkerChannel for Arc<C>
where
    C: WorkerChannel,
{
    fn dispatch(&self, request: WorkRequest) -> impl Future<Output = Result<()>> + Send {
        C::dispatch(self, request)
    }

    fn shutdown(&self) -> impl Future<Output = Result<()>> + Send {
        C::shutdown(self)
    }
}
