//! Sort and filter requests as plain values, so they can travel to a worker
//! and back without borrowing view state.

/// Sort order for a [`SortSpec`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

impl Direction {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    pub const fn arrow(self) -> char {
        match self {
            Self::Ascending => '↑',
            Self::Descending => '↓',
        }
    }
}

/// Which column to sort on and in which direction.
///
/// `field: None` is the unsorted initial state; sorting with it is a no-op.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SortSpec {
    pub field: Option<String>,
    pub direction: Direction,
}

impl SortSpec {
    pub const fn unsorted() -> Self {
        Self {
            field: None,
            direction: Direction::Ascending,
        }
    }

    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            direction: Direction::Ascending,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            direction: Direction::Descending,
        }
    }

    pub const fn is_unsorted(&self) -> bool {
        self.field.is_none()
    }

    /// Header-click semantics: clicking the current column flips the
    /// direction, clicking another column starts ascending.
    #[must_use]
    pub fn toggle_on(&self, field: &str) -> Self {
        match self.field.as_deref() {
            Some(current) if current == field => Self {
                field: self.field.clone(),
                direction: self.direction.toggled(),
            },
            _ => Self::ascending(field),
        }
    }
}

/// Exact-match constraint on one designated column.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FacetSpec {
    pub field: String,
    pub value: Option<String>,
}

impl FacetSpec {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: None,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: Option<String>) -> Self {
        self.value = value;
        self
    }

    /// An empty or missing value means "no constraint".
    pub fn active_value(&self) -> Option<&str> {
        self.value.as_deref().filter(|v| !v.is_empty())
    }
}

/// Free-text query plus optional facet.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterSpec {
    pub query: String,
    pub facet: Option<FacetSpec>,
}

impl FilterSpec {
    pub fn query(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            facet: None,
        }
    }

    #[must_use]
    pub fn with_facet(mut self, facet: FacetSpec) -> Self {
        self.facet = Some(facet);
        self
    }

    /// Neither constraint is set, so filtering returns the input unchanged.
    pub fn is_identity(&self) -> bool {
        self.query.is_empty()
            && self
                .facet
                .as_ref()
                .and_then(FacetSpec::active_value)
                .is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_clicks_toggle_direction() {
        let spec = SortSpec::unsorted().toggle_on("name");
        assert_eq!(spec, SortSpec::ascending("name"));

        let spec = spec.toggle_on("name");
        assert_eq!(spec, SortSpec::descending("name"));

        let spec = spec.toggle_on("email");
        assert_eq!(spec, SortSpec::ascending("email"));
    }

    #[test]
    fn empty_facet_value_is_no_constraint() {
        let facet = FacetSpec::new("vehicle").with_value(Some(String::new()));
        assert_eq!(facet.active_value(), None);
        assert!(FilterSpec::default().with_facet(facet).is_identity());
        assert!(!FilterSpec::query("al").is_identity());
    }
}
