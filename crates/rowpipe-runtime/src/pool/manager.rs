//! Asynchronous pool of DataWorkers.
//!
//! [`WorkerPool`] owns one bounded [`mpsc::Sender`] per worker, distributes
//! requests round-robin and supports coordinated shutdown through a shared
//! [`CancellationToken`]. Workers never share state, so no locking is
//! involved.

use super::{request::WorkRequest, worker::worker_loop};
use core::time::Duration;
use rowpipe::{Error, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::{
    sync::{mpsc, oneshot},
    time::timeout,
};
use tokio_util::sync::CancellationToken;

/// Requests a worker may have queued before senders wait.
pub const DEFAULT_QUEUE_DEPTH: usize = 16;

/// A cooperative pool of asynchronous workers that process [`WorkRequest`]s.
pub struct WorkerPool {
    workers: Vec<mpsc::Sender<WorkRequest>>,
    next_worker: AtomicUsize,
    shutdown_token: CancellationToken,
    shutdown_timeout: Duration,
}

impl WorkerPool {
    /// Constructs a [`WorkerPool`] from already running worker channels.
    pub const fn new(
        workers: Vec<mpsc::Sender<WorkRequest>>,
        shutdown_token: CancellationToken,
        shutdown_timeout: Duration,
    ) -> Self {
        Self {
            workers,
            next_worker: AtomicUsize::new(0),
            shutdown_token,
            shutdown_timeout,
        }
    }

    /// Spawns `num_workers` worker tasks (at least one) on the current Tokio
    /// runtime.
    pub fn spawn(num_workers: usize, queue_depth: usize, shutdown_timeout: Duration) -> Self {
        let num_workers = num_workers.max(1);
        let mut workers = Vec::with_capacity(num_workers);

        for worker_id in 0..num_workers {
            let (tx, rx) = mpsc::channel(queue_depth.max(1));
            tokio::spawn(worker_loop(worker_id, rx));
            workers.push(tx);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("Spawned {num_workers} data workers");

        Self::new(workers, CancellationToken::new(), shutdown_timeout)
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shutdown_token.is_cancelled()
    }

    /// Returns the index of the next worker to receive work (round-robin).
    pub fn next_worker_index(&self) -> usize {
        self.next_worker.fetch_add(1, Ordering::Relaxed) % self.workers.len()
    }

    /// Sends a [`WorkRequest`] to the next worker in the pool.
    ///
    /// # Errors
    ///
    /// - [`Error::ServiceShutdown`] once [`shutdown`](Self::shutdown) started
    ///   or when the pool has no workers.
    /// - [`Error::WorkerChannel`] if the worker's channel is closed.
    pub async fn send_to_next_worker(&self, request: WorkRequest) -> Result<()> {
        if self.shutdown_token.is_cancelled() || self.workers.is_empty() {
            return Err(Error::ServiceShutdown);
        }

        let worker_idx = self.next_worker_index();
        let kind = request.kind();

        match self.workers[worker_idx].send(request).await {
            Ok(()) => Ok(()),
            Err(_) => Err(Error::channel(format!(
                "Worker {worker_idx} channel closed ({kind} request)"
            ))),
        }
    }

    /// Gracefully shuts down all workers in the pool.
    ///
    /// - Cancels the shared [`CancellationToken`] so no new work is accepted.
    /// - Sends a [`WorkRequest::Shutdown`] to each worker. It queues behind
    ///   requests already sent, so in-flight work still gets its reply.
    /// - Waits up to the configured timeout per worker for acknowledgements.
    ///
    /// Calling it again is a no-op.
    pub async fn shutdown(&self) -> Result<()> {
        if self.shutdown_token.is_cancelled() {
            return Ok(());
        }

        #[cfg(feature = "tracing")]
        tracing::info!("Refusing new worker requests");
        self.shutdown_token.cancel();

        #[cfg(feature = "tracing")]
        tracing::debug!("Notifying all workers to shut down");
        let mut shutdown_handles = Vec::with_capacity(self.workers.len());

        for (i, worker) in self.workers.iter().enumerate() {
            let (tx, rx) = oneshot::channel();
            if let Err(_e) = worker.send(WorkRequest::Shutdown { response: tx }).await {
                #[cfg(feature = "tracing")]
                tracing::error!("Failed to send shutdown to worker {i}: {_e}");
            } else {
                shutdown_handles.push((i, rx));
            }
        }

        let limit = self.shutdown_timeout;
        let acknowledgements = shutdown_handles.into_iter().map(|(_i, rx)| async move {
            match timeout(limit, rx).await {
                Ok(Ok(())) => {
                    #[cfg(feature = "tracing")]
                    tracing::trace!("Worker {_i} shutdown acknowledged");
                }
                Ok(Err(_e)) => {
                    #[cfg(feature = "tracing")]
                    tracing::error!("Worker {_i} dropped its shutdown ack: {_e}");
                }
                Err(_) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!("Worker {_i} shutdown timed out after {limit:?}");
                }
            }
        });

        futures::future::join_all(acknowledgements).await;

        #[cfg(feature = "tracing")]
        tracing::info!("Worker pool shutdown complete");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::call;
    use rowpipe::{Dataset, FieldDef, FieldKind, FilterSpec, Record, Schema, SortSpec, Value};
    use std::sync::Arc;

    fn dataset(names: &[&str]) -> Dataset {
        let schema = Schema::new(
            vec![
                FieldDef::new("id", FieldKind::Id).sortable(),
                FieldDef::new("name", FieldKind::Text).sortable(),
            ],
            "id",
        )
        .unwrap();
        Dataset::from_records(
            Arc::new(schema),
            names.iter().enumerate().map(|(i, name)| {
                Record::new(vec![Value::Id(format!("id-{i}")), Value::from(*name)])
            }),
        )
    }

    fn names(dataset: &Dataset) -> Vec<String> {
        dataset
            .rows()
            .iter()
            .map(|row| row.get(1).unwrap().to_string())
            .collect()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn workers_answer_every_request_kind() {
        let pool = WorkerPool::spawn(2, DEFAULT_QUEUE_DEPTH, Duration::from_secs(1));
        let data = dataset(&["Bob", "alice", "Carl", "Sal"]);

        let sorted = call::sort(&pool, data.clone(), SortSpec::ascending("name"))
            .await
            .unwrap();
        assert_eq!(names(&sorted), vec!["alice", "Bob", "Carl", "Sal"]);

        let filtered = call::filter(&pool, data.clone(), FilterSpec::query("al"))
            .await
            .unwrap();
        assert_eq!(names(&filtered), vec!["alice", "Sal"]);

        let values = call::distinct_values(&pool, data, "name").await.unwrap();
        assert_eq!(values, vec!["alice", "Bob", "Carl", "Sal"]);

        pool.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn worker_errors_are_replied_not_dropped() {
        let pool = WorkerPool::spawn(1, DEFAULT_QUEUE_DEPTH, Duration::from_secs(1));
        let err = call::sort(&pool, dataset(&["a"]), SortSpec::ascending("nope"))
            .await
            .unwrap_err();
        assert_eq!(err, Error::invalid_field("nope"));
        pool.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn requests_after_shutdown_are_rejected() {
        let pool = WorkerPool::spawn(3, DEFAULT_QUEUE_DEPTH, Duration::from_secs(1));
        assert_eq!(pool.len(), 3);

        pool.shutdown().await.unwrap();
        assert!(pool.is_shut_down());
        pool.shutdown().await.unwrap();

        let err = call::filter(&pool, dataset(&["a"]), FilterSpec::query("a"))
            .await
            .unwrap_err();
        assert_eq!(err, Error::ServiceShutdown);
    }

    #[tokio::test]
    async fn dispatch_is_round_robin() {
        let pool = WorkerPool::spawn(3, DEFAULT_QUEUE_DEPTH, Duration::from_secs(1));
        let picked: Vec<_> = (0..6).map(|_| pool.next_worker_index()).collect();
        assert_eq!(picked, vec![0, 1, 2, 0, 1, 2]);
        pool.shutdown().await.unwrap();
    }
}
