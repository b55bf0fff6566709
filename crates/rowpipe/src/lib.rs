//! Building blocks for keeping a very large in-memory table responsive.
//!
//! - [`ChunkedProducer`] fills a [`Dataset`] in bounded chunks, yielding to the
//!   scheduler between chunks and aborting when a newer run supersedes it.
//! - [`sort`], [`filter`] and [`distinct_field_values`] are the stateless
//!   operations a background worker runs over a dataset snapshot.
//! - [`Pagination`] derives the visible slice and keeps the page in bounds.
//!
//! Rows are shared as `Arc<Record>`, so sorting and filtering a million-row
//! dataset moves pointers rather than payloads.

pub mod collate;
mod error;
mod generator;
mod model;
mod ops;
mod pagination;
mod producer;
mod query;

pub use crate::error::*;
pub use crate::generator::*;
pub use crate::model::*;
pub use crate::ops::*;
pub use crate::pagination::*;
pub use crate::producer::*;
pub use crate::query::*;
