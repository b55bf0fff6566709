use rowpipe::{Dataset, FilterSpec, Result, SortSpec};
use tokio::sync::oneshot;

/// Reply slot for a single worker request.
pub type Reply<T> = oneshot::Sender<Result<T>>;

/// A message sent to a DataWorker.
///
/// Every variant carries its own reply channel, so each request receives
/// exactly one answer. Datasets travel as `Arc` snapshots; the worker never
/// sees the coordinator's state.
#[derive(Debug)]
pub enum WorkRequest {
    /// Stable collated sort of `dataset` by `spec`.
    Sort {
        dataset: Dataset,
        spec: SortSpec,
        response: Reply<Dataset>,
    },

    /// Free-text and facet filter over `dataset`.
    Filter {
        dataset: Dataset,
        spec: FilterSpec,
        response: Reply<Dataset>,
    },

    /// Sorted distinct values of `field`, used as facet options.
    DistinctValues {
        dataset: Dataset,
        field: String,
        response: Reply<Vec<String>>,
    },

    /// Request the worker to shut down gracefully.
    ///
    /// - `response`: One-shot channel acknowledging that the worker stopped.
    Shutdown { response: oneshot::Sender<()> },
}

impl WorkRequest {
    /// Short name used in logs and error contexts.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Sort { .. } => "sort",
            Self::Filter { .. } => "filter",
            Self::DistinctValues { .. } => "distinct",
            Self::Shutdown { .. } => "shutdown",
        }
    }
}
