use chrono::NaiveDate;
use core::fmt;
use std::borrow::Cow;

/// A single primitive cell.
///
/// `Text` and `Id` are string-typed and take part in free-text search. `Date`
/// does not; it sorts chronologically and renders as ISO-8601.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    Text(String),
    Date(NaiveDate),
    Id(String),
}

impl Value {
    /// Returns the string payload for string-typed values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Id(s) => Some(s),
            Self::Date(_) => None,
        }
    }

    pub const fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub const fn is_string(&self) -> bool {
        !matches!(self, Self::Date(_))
    }

    /// The text form used for facet matching, facet options and display.
    pub fn render(&self) -> Cow<'_, str> {
        match self {
            Self::Text(s) | Self::Id(s) => Cow::Borrowed(s),
            Self::Date(d) => Cow::Owned(d.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) | Self::Id(s) => f.write_str(s),
            Self::Date(d) => write!(f, "{d}"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}
