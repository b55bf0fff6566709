use crate::{Record, Row, Schema};
use std::sync::Arc;

/// An immutable, cheaply clonable snapshot of rows sharing one schema.
///
/// A dataset is never mutated after construction. Sorting or filtering
/// produces a new dataset over the same `Arc<Record>`s, so handing a snapshot
/// to a worker costs two reference-count bumps.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Dataset {
    schema: Arc<Schema>,
    rows: Arc<[Row]>,
}

impl Dataset {
    pub fn new(schema: Arc<Schema>, rows: Vec<Row>) -> Self {
        Self {
            schema,
            rows: rows.into(),
        }
    }

    pub fn empty(schema: Arc<Schema>) -> Self {
        Self::new(schema, Vec::new())
    }

    pub fn from_records(schema: Arc<Schema>, records: impl IntoIterator<Item = Record>) -> Self {
        Self::new(schema, records.into_iter().map(Arc::new).collect())
    }

    /// A dataset over `rows` that keeps this dataset's schema.
    #[must_use]
    pub fn with_rows(&self, rows: Vec<Row>) -> Self {
        Self::new(Arc::clone(&self.schema), rows)
    }

    pub const fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// True when both datasets share the same row allocation.
    pub fn shares_rows_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.rows, &other.rows)
    }
}
