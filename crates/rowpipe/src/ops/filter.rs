use crate::{Dataset, FilterSpec, Record, Result};

/// Returns the rows of `dataset` that match `spec`, in input order.
///
/// A row matches when
/// - the query is empty, or at least one string-typed column contains it
///   case-insensitively, and
/// - the facet has no value, or the facet column renders exactly to it.
///
/// With neither constraint set the input is returned as-is.
///
/// # Errors
///
/// Returns [`Error::InvalidField`](crate::Error::InvalidField) when an active
/// facet names an unknown column.
#[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip_all, fields(rows = dataset.len(), query = %spec.query)))]
pub fn filter(dataset: &Dataset, spec: &FilterSpec) -> Result<Dataset> {
    if spec.is_identity() {
        return Ok(dataset.clone());
    }

    let schema = dataset.schema();
    let facet = match spec.facet.as_ref() {
        Some(facet) => match facet.active_value() {
            Some(value) => Some((schema.index_of(&facet.field)?, value)),
            None => None,
        },
        None => None,
    };
    let needle = Needle::new(&spec.query);
    let columns: Vec<usize> = schema.string_columns().collect();

    let rows = dataset
        .rows()
        .iter()
        .filter(|row| {
            let facet_match = facet.is_none_or(|(column, value)| {
                row.get(column).is_some_and(|cell| cell.render() == value)
            });
            facet_match && needle.as_ref().is_none_or(|n| n.matches(row, &columns))
        })
        .cloned()
        .collect();

    Ok(dataset.with_rows(rows))
}

/// A lowercased query, with an allocation-free path for ASCII haystacks.
struct Needle {
    folded: String,
    ascii: bool,
}

impl Needle {
    fn new(query: &str) -> Option<Self> {
        if query.is_empty() {
            return None;
        }
        Some(Self {
            folded: query.to_lowercase(),
            ascii: query.is_ascii(),
        })
    }

    fn matches(&self, record: &Record, columns: &[usize]) -> bool {
        columns.iter().any(|&column| {
            record
                .get(column)
                .and_then(|cell| cell.as_str())
                .is_some_and(|text| self.found_in(text))
        })
    }

    fn found_in(&self, haystack: &str) -> bool {
        if self.ascii && haystack.is_ascii() {
            let needle = self.folded.as_bytes();
            haystack
                .as_bytes()
                .windows(needle.len())
                .any(|window| window.eq_ignore_ascii_case(needle))
        } else {
            haystack.to_lowercase().contains(&self.folded)
        }
    }
}
