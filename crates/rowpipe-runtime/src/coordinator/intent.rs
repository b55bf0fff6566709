use rowpipe::{Dataset, Result};
use tokio::sync::oneshot;

/// A user action forwarded to the coordinator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    /// Free-text query edit. Debounced.
    Search(String),
    /// Header click on `field`: same field flips direction, else ascending.
    SortBy(String),
    /// Facet selection; `None` or an empty value clears it.
    SelectFacet(Option<String>),
    ChangePage(usize),
    NextPage,
    PrevPage,
    ChangePageSize(usize),
    /// Replace the dataset with a freshly generated one.
    Generate,
}

/// Messages on the handle-to-coordinator channel. `ack` fires once the
/// command has been applied and the resulting snapshot published.
#[derive(Debug)]
pub(crate) enum Command {
    Intent {
        intent: Intent,
        ack: oneshot::Sender<()>,
    },
    Shutdown {
        ack: oneshot::Sender<()>,
    },
}

/// Results flowing back into the coordinator from tasks it spawned.
#[derive(Debug)]
pub(crate) enum Completion {
    Progress {
        epoch: u64,
        rows: usize,
    },
    Generated {
        epoch: u64,
        result: Result<Dataset>,
    },
    Sorted {
        seq: u64,
        version: u64,
        spec: rowpipe::SortSpec,
        result: Result<Dataset>,
    },
    Filtered {
        seq: u64,
        version: u64,
        result: Result<Dataset>,
    },
    FacetValues {
        seq: u64,
        result: Result<Vec<String>>,
    },
    QueryQuiet {
        ticket: u64,
    },
}
