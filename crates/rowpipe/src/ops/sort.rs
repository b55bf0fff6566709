use crate::{Dataset, Direction, Result, SortSpec, Value, collate};
use core::cmp::Ordering;

/// Returns `dataset` stably sorted by `spec`.
///
/// String-typed values compare with [`collate::compare`], dates compare
/// chronologically. A descending sort reverses the comparator rather than the
/// output, so rows with equal keys keep their input order in both directions.
/// An unsorted spec returns the input unchanged.
///
/// # Errors
///
/// Returns [`Error::InvalidField`](crate::Error::InvalidField) when the field
/// is unknown or not sortable.
#[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip_all, fields(rows = dataset.len())))]
pub fn sort(dataset: &Dataset, spec: &SortSpec) -> Result<Dataset> {
    let Some(field) = spec.field.as_deref() else {
        return Ok(dataset.clone());
    };
    let column = dataset.schema().sortable_index(field)?;

    let mut rows = dataset.rows().to_vec();
    match spec.direction {
        Direction::Ascending => {
            rows.sort_by(|a, b| compare_values(a.get(column), b.get(column)));
        }
        Direction::Descending => {
            rows.sort_by(|a, b| compare_values(b.get(column), a.get(column)));
        }
    }
    Ok(dataset.with_rows(rows))
}

/// Orders two cells of the same column. Missing cells sort first.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Date(x)), Some(Value::Date(y))) => x.cmp(y),
        (Some(x), Some(y)) => match (x.as_str(), y.as_str()) {
            (Some(x), Some(y)) => collate::compare(x, y),
            _ => collate::compare(&x.render(), &y.render()),
        },
    }
}
