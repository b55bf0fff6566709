//! Request/reply wrappers over a [`WorkerChannel`].
//!
//! Each call creates a fresh oneshot, dispatches the request and awaits the
//! single reply. A reply sender dropped without answering (worker gone,
//! request discarded) surfaces as [`Error::WorkerChannel`].

use super::{channel::WorkerChannel, request::WorkRequest};
use rowpipe::{Dataset, Error, FilterSpec, Result, SortSpec};
use tokio::sync::oneshot;

pub async fn sort<C>(channel: &C, dataset: Dataset, spec: SortSpec) -> Result<Dataset>
where
    C: WorkerChannel,
{
    let (response, rx) = oneshot::channel();
    channel
        .dispatch(WorkRequest::Sort {
            dataset,
            spec,
            response,
        })
        .await?;
    await_reply(rx, "sort").await
}

pub async fn filter<C>(channel: &C, dataset: Dataset, spec: FilterSpec) -> Result<Dataset>
where
    C: WorkerChannel,
{
    let (response, rx) = oneshot::channel();
    channel
        .dispatch(WorkRequest::Filter {
            dataset,
            spec,
            response,
        })
        .await?;
    await_reply(rx, "filter").await
}

pub async fn distinct_values<C>(
    channel: &C,
    dataset: Dataset,
    field: impl Into<String>,
) -> Result<Vec<String>>
where
    C: WorkerChannel,
{
    let (response, rx) = oneshot::channel();
    channel
        .dispatch(WorkRequest::DistinctValues {
            dataset,
            field: field.into(),
            response,
        })
        .await?;
    await_reply(rx, "distinct").await
}

async fn await_reply<T>(rx: oneshot::Receiver<Result<T>>, kind: &str) -> Result<T> {
    match rx.await {
        Ok(result) => result,
        Err(_) => Err(Error::channel(format!("{kind} reply dropped before an answer"))),
    }
}
