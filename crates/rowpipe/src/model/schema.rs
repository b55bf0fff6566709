use crate::{Error, Result};

/// The primitive type stored in a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FieldKind {
    Text,
    Date,
    Id,
}

impl FieldKind {
    /// String-typed columns take part in free-text search.
    pub const fn is_string(self) -> bool {
        !matches!(self, Self::Date)
    }
}

/// Column definition: name used on the wire, label used for display.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FieldDef {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub sortable: bool,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            kind,
            sortable: false,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    #[must_use]
    pub const fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }
}

/// Ordered column layout shared by every record of a dataset.
///
/// One column is the distinguished identifier; it is expected to be unique
/// within a generation run.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Schema {
    fields: Vec<FieldDef>,
    id_field: usize,
}

impl Schema {
    /// Builds a schema whose identifier column is `id_field`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidField`] if `id_field` is not one of `fields`.
    pub fn new(fields: Vec<FieldDef>, id_field: &str) -> Result<Self> {
        let id_field = fields
            .iter()
            .position(|f| f.name == id_field)
            .ok_or_else(|| Error::invalid_field(id_field))?;
        Ok(Self { fields, id_field })
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, index: usize) -> Option<&FieldDef> {
        self.fields.get(index)
    }

    pub const fn id_index(&self) -> usize {
        self.id_field
    }

    /// Resolves a column name to its index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidField`] for unknown names.
    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.fields
            .iter()
            .position(|f| f.name == name)
            .ok_or_else(|| Error::invalid_field(name))
    }

    /// Resolves a column name that must be on the sortable whitelist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidField`] for unknown or non-sortable names.
    pub fn sortable_index(&self, name: &str) -> Result<usize> {
        let index = self.index_of(name)?;
        if self.fields[index].sortable {
            Ok(index)
        } else {
            Err(Error::invalid_field(name))
        }
    }

    /// Indices of columns searched by free-text queries.
    pub fn string_columns(&self) -> impl Iterator<Item = usize> + '_ {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.kind.is_string())
            .map(|(i, _)| i)
    }

    pub fn sortable_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| f.sortable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Schema {
        Schema::new(
            vec![
                FieldDef::new("id", FieldKind::Id).sortable(),
                FieldDef::new("name", FieldKind::Text).sortable(),
                FieldDef::new("born", FieldKind::Date),
            ],
            "id",
        )
        .unwrap()
    }

    #[test]
    fn resolves_known_fields() {
        let schema = schema();
        assert_eq!(schema.index_of("name").unwrap(), 1);
        assert_eq!(schema.id_index(), 0);
        assert_eq!(schema.string_columns().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn rejects_unknown_and_unsortable_fields() {
        let schema = schema();
        assert_eq!(
            schema.index_of("nope"),
            Err(Error::invalid_field("nope"))
        );
        assert_eq!(
            schema.sortable_index("born"),
            Err(Error::invalid_field("born"))
        );
    }

    #[test]
    fn id_field_must_exist() {
        let err = Schema::new(vec![FieldDef::new("name", FieldKind::Text)], "id").unwrap_err();
        assert_eq!(err, Error::invalid_field("id"));
    }
}
