//! View state owned by the coordinator and the snapshots it publishes.
//!
//! [`ViewState`] is the authoritative tuple of query, sort spec, facet
//! selection and pagination plus the filtered rows they produced. Page rows
//! and page counts are derived synchronously from it whenever a
//! [`ViewSnapshot`] is taken.

use rowpipe::{
    Dataset, Error, FacetSpec, FilterSpec, Pagination, Row, Schema, SortSpec, total_pages,
};
use serde::Serialize;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    /// The request was rejected; the view is unchanged.
    Warning,
    /// Something failed between the coordinator and a worker.
    Error,
}

/// Non-fatal message for the user about the last failed request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn from_error(error: &Error) -> Self {
        let kind = match error {
            Error::InvalidField { .. } => NoticeKind::Warning,
            _ => NoticeKind::Error,
        };
        Self {
            kind,
            message: error.to_string(),
        }
    }
}

/// Everything a front end needs to render one frame.
#[derive(Clone, Debug, Serialize)]
pub struct ViewSnapshot {
    pub schema: Arc<Schema>,
    pub page_rows: Vec<Row>,
    pub page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    pub filtered_count: usize,
    pub total_count: usize,
    /// A generation run or a worker request is outstanding.
    pub busy: bool,
    /// A query edit is waiting out the debounce window.
    pub query_pending: bool,
    pub sort_spec: SortSpec,
    pub query: String,
    pub facet_field: String,
    pub facet_value: Option<String>,
    pub facet_options: Vec<String>,
    /// Rows produced so far by the running (or last) generation.
    pub generated_rows: usize,
    pub target_rows: usize,
    pub notice: Option<Notice>,
}

impl ViewSnapshot {
    /// Nothing outstanding; the snapshot reflects every intent sent so far.
    pub const fn is_settled(&self) -> bool {
        !self.busy && !self.query_pending
    }
}

#[derive(Debug)]
pub struct ViewState {
    filtered: Dataset,
    total_count: usize,
    pagination: Pagination,
    query: String,
    sort_spec: SortSpec,
    facet: FacetSpec,
    facet_options: Vec<String>,
    generated_rows: usize,
    target_rows: usize,
    notice: Option<Notice>,
}

impl ViewState {
    pub fn new(schema: Arc<Schema>, facet_field: &str, page_size: usize, target_rows: usize) -> Self {
        Self {
            filtered: Dataset::empty(schema),
            total_count: 0,
            pagination: Pagination::new(page_size),
            query: String::new(),
            sort_spec: SortSpec::unsorted(),
            facet: FacetSpec::new(facet_field),
            facet_options: Vec::new(),
            generated_rows: 0,
            target_rows,
            notice: None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub const fn sort_spec(&self) -> &SortSpec {
        &self.sort_spec
    }

    pub fn filter_spec(&self) -> FilterSpec {
        FilterSpec::query(self.query.clone()).with_facet(self.facet.clone())
    }

    pub fn filtered(&self) -> &Dataset {
        &self.filtered
    }

    pub const fn pagination(&self) -> Pagination {
        self.pagination
    }

    /// A new query always starts from the first page.
    pub fn set_query(&mut self, query: String) {
        self.query = query;
        self.pagination.reset();
    }

    pub fn set_facet_value(&mut self, value: Option<String>) {
        self.facet.value = value;
        self.pagination.reset();
    }

    pub fn set_sort_spec(&mut self, spec: SortSpec) {
        self.sort_spec = spec;
    }

    /// Installs a filter result and clamps the page to the new row count.
    pub fn set_filtered(&mut self, filtered: Dataset) {
        self.filtered = filtered;
        self.pagination.clamp(self.filtered.len());
    }

    /// Installs a freshly generated dataset as the unfiltered view.
    pub fn set_dataset(&mut self, dataset: &Dataset) {
        self.total_count = dataset.len();
        self.generated_rows = dataset.len();
        self.set_filtered(dataset.clone());
    }

    pub fn set_facet_options(&mut self, options: Vec<String>) {
        self.facet_options = options;
    }

    pub const fn set_generated_rows(&mut self, rows: usize) {
        self.generated_rows = rows;
    }

    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    pub fn go_to_page(&mut self, page: usize) -> bool {
        self.pagination.go_to(page, self.filtered.len())
    }

    pub fn next_page(&mut self) -> bool {
        self.pagination.next(self.filtered.len())
    }

    pub fn prev_page(&mut self) -> bool {
        self.pagination.prev(self.filtered.len())
    }

    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        self.pagination.set_page_size(page_size, self.filtered.len())
    }

    /// Back to the initial query, sort, facet and page for a new generation.
    /// The previous rows are dropped right away.
    pub fn reset_for_generation(&mut self, target_rows: usize) {
        self.query.clear();
        self.sort_spec = SortSpec::unsorted();
        self.facet.value = None;
        self.facet_options.clear();
        self.pagination.reset();
        self.filtered = Dataset::empty(Arc::clone(self.filtered.schema()));
        self.total_count = 0;
        self.generated_rows = 0;
        self.target_rows = target_rows;
    }

    pub fn snapshot(&self, busy: bool, query_pending: bool) -> ViewSnapshot {
        let len = self.filtered.len();
        ViewSnapshot {
            schema: Arc::clone(self.filtered.schema()),
            page_rows: self.pagination.slice(self.filtered.rows()).to_vec(),
            page: self.pagination.page(),
            total_pages: total_pages(len, self.pagination.page_size()),
            page_size: self.pagination.page_size(),
            filtered_count: len,
            total_count: self.total_count,
            busy,
            query_pending,
            sort_spec: self.sort_spec.clone(),
            query: self.query.clone(),
            facet_field: self.facet.field.clone(),
            facet_value: self.facet.active_value().map(str::to_owned),
            facet_options: self.facet_options.clone(),
            generated_rows: self.generated_rows,
            target_rows: self.target_rows,
            notice: self.notice.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowpipe::{FieldDef, FieldKind, Record, Value};

    fn dataset(len: usize) -> Dataset {
        let schema = Schema::new(vec![FieldDef::new("id", FieldKind::Id)], "id").unwrap();
        Dataset::from_records(
            Arc::new(schema),
            (0..len).map(|i| Record::new(vec![Value::Id(format!("{i}"))])),
        )
    }

    #[test]
    fn snapshot_derives_the_visible_page() {
        let data = dataset(47);
        let mut view = ViewState::new(Arc::clone(data.schema()), "id", 15, 47);
        view.set_dataset(&data);
        assert!(view.go_to_page(4));

        let snapshot = view.snapshot(false, false);
        assert_eq!(snapshot.total_pages, 4);
        assert_eq!(snapshot.page_rows.len(), 2);
        assert_eq!(snapshot.filtered_count, 47);
        assert!(snapshot.is_settled());
    }

    #[test]
    fn narrower_filter_result_clamps_the_page() {
        let data = dataset(47);
        let mut view = ViewState::new(Arc::clone(data.schema()), "id", 15, 47);
        view.set_dataset(&data);
        view.go_to_page(4);

        view.set_filtered(data.with_rows(data.rows()[..5].to_vec()));
        assert_eq!(view.pagination().page(), 1);

        view.set_query("x".into());
        assert_eq!(view.snapshot(true, true).query, "x");
    }

    #[test]
    fn invalid_field_is_a_warning() {
        let notice = Notice::from_error(&Error::invalid_field("age"));
        assert_eq!(notice.kind, NoticeKind::Warning);
        assert_eq!(notice.message, "Invalid field: age");
        assert_eq!(
            Notice::from_error(&Error::channel("closed")).kind,
            NoticeKind::Error
        );
    }
}
