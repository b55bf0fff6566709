//! Stateless dataset operations executed by background workers.
//!
//! Every operation takes an immutable [`Dataset`](crate::Dataset) snapshot and
//! returns a new value; nothing here keeps state between calls.
//!
//! - [`sort`] - stable, collated sort on one sortable column.
//! - [`filter`] - free-text query across string columns plus optional facet.
//! - [`distinct_field_values`] - sorted unique values of one column.

mod distinct;
mod filter;
mod sort;
#[cfg(test)]
mod tests;

pub use distinct::*;
pub use filter::*;
pub use sort::*;
