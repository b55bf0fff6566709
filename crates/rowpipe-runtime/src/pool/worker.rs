use super::request::{Reply, WorkRequest};
use rowpipe::{Error, Result, distinct_field_values, filter, sort};
use tokio::sync::mpsc;

/// Worker task processing [`WorkRequest`]s until told to shut down.
///
/// The algorithms are CPU bound, so each request runs on Tokio's blocking
/// pool while this task waits for it. A worker handles one request at a time;
/// superseded requests still run to completion and the coordinator discards
/// their results.
///
/// # Arguments
///
/// - `worker_id`: Numeric identifier used in logs and error contexts.
/// - `rx`: Receiver through which [`WorkRequest`]s arrive.
pub async fn worker_loop(worker_id: usize, mut rx: mpsc::Receiver<WorkRequest>) {
    #[cfg(feature = "tracing")]
    tracing::trace!("Worker {worker_id} started");

    while let Some(work) = rx.recv().await {
        match work {
            WorkRequest::Sort {
                dataset,
                spec,
                response,
            } => {
                let result = run_blocking(worker_id, move || sort(&dataset, &spec)).await;
                reply(worker_id, response, result);
            }
            WorkRequest::Filter {
                dataset,
                spec,
                response,
            } => {
                let result = run_blocking(worker_id, move || filter(&dataset, &spec)).await;
                reply(worker_id, response, result);
            }
            WorkRequest::DistinctValues {
                dataset,
                field,
                response,
            } => {
                let result =
                    run_blocking(worker_id, move || distinct_field_values(&dataset, &field)).await;
                reply(worker_id, response, result);
            }
            WorkRequest::Shutdown { response } => {
                #[cfg(feature = "tracing")]
                tracing::debug!("Worker {worker_id} received shutdown signal");

                if response.send(()).is_err() {
                    #[cfg(feature = "tracing")]
                    tracing::error!("Worker {worker_id} failed to acknowledge shutdown");
                }
                break;
            }
        }
    }

    #[cfg(feature = "tracing")]
    tracing::trace!("Worker {worker_id} stopped");
}

/// Runs `op` on the blocking pool. A panic inside `op` becomes a
/// `WorkerChannel` error instead of taking the worker down.
async fn run_blocking<T, F>(worker_id: usize, op: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(op).await {
        Ok(result) => result,
        Err(e) => Err(Error::channel(format!(
            "Worker {worker_id} blocking task failed: {e}"
        ))),
    }
}

fn reply<T>(_worker_id: usize, response: Reply<T>, result: Result<T>) {
    if response.send(result).is_err() {
        // The requester stopped waiting; nothing left to do with the result.
        #[cfg(feature = "tracing")]
        tracing::trace!("Worker {_worker_id} reply dropped by requester");
    }
}
