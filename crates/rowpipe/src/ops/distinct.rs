use crate::{Dataset, Result, collate};
use std::{borrow::Cow, collections::HashSet};

/// Returns the distinct rendered values of `field`, collated and
/// deduplicated so the same dataset always yields the same list.
///
/// # Errors
///
/// Returns [`Error::InvalidField`](crate::Error::InvalidField) for an unknown
/// column.
#[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip(dataset), fields(rows = dataset.len())))]
pub fn distinct_field_values(dataset: &Dataset, field: &str) -> Result<Vec<String>> {
    let column = dataset.schema().index_of(field)?;

    let seen: HashSet<Cow<'_, str>> = dataset
        .rows()
        .iter()
        .filter_map(|row| row.get(column))
        .map(|cell| cell.render())
        .collect();

    let mut values: Vec<String> = seen.into_iter().map(Cow::into_owned).collect();
    values.sort_by(|a, b| collate::compare(a, b));
    Ok(values)
}
