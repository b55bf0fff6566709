//! Error types shared by the data pipeline.
//!
//! ## Error Cases
//! - `InvalidField`: a sort, filter or facet request named a column the
//!   dataset does not have (or one that cannot be sorted).
//! - `GenerationAborted`: a generation run was superseded by a newer one.
//! - `WorkerChannel`: a request or reply could not travel between the
//!   coordinator and a worker.
//! - `ServiceShutdown`: work was submitted after the worker pool shut down.

/// Result alias used throughout `rowpipe`.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Unified error type for generation and worker operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The named field does not exist, or does not support the operation.
    #[error("Invalid field: {field}")]
    InvalidField { field: String },

    /// A newer generation run started before this one completed.
    #[error("Generation {epoch} aborted by a newer run")]
    GenerationAborted { epoch: u64 },

    /// Internal channel failure (closed queue, dropped reply, panicked task).
    #[error("Worker channel error: {context}")]
    WorkerChannel { context: String },

    /// The worker pool no longer accepts requests.
    #[error("Worker pool is shutting down")]
    ServiceShutdown,
}

impl Error {
    pub fn invalid_field(field: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
        }
    }

    pub fn channel(context: impl Into<String>) -> Self {
        Self::WorkerChannel {
            context: context.into(),
        }
    }

    /// Superseded generations are expected control flow, not failures worth
    /// surfacing to a user.
    pub const fn is_silent(&self) -> bool {
        matches!(self, Self::GenerationAborted { .. })
    }
}
