//! Page arithmetic over a filtered row set.
//!
//! The page is 1-based and always satisfies `1 <= page <= total_pages`, where
//! an empty result still counts as one (empty) page.

use core::ops::Range;

pub const DEFAULT_PAGE_SIZE: usize = 15;

/// `max(1, ceil(len / page_size))`. A zero page size is treated as one.
pub const fn total_pages(len: usize, page_size: usize) -> usize {
    let pages = len.div_ceil(if page_size == 0 { 1 } else { page_size });
    if pages == 0 { 1 } else { pages }
}

/// Current page and page size.
///
/// Navigation methods take the filtered length and return `true` only when
/// they changed something, so callers know whether to republish the view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Pagination {
    page: usize,
    page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pagination {
    pub const fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: if page_size == 0 { 1 } else { page_size },
        }
    }

    pub const fn page(&self) -> usize {
        self.page
    }

    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    pub const fn total_pages(&self, len: usize) -> usize {
        total_pages(len, self.page_size)
    }

    /// Pulls the page back in range after the row count shrank.
    pub fn clamp(&mut self, len: usize) -> bool {
        let last = self.total_pages(len);
        if self.page > last {
            self.page = last;
            true
        } else {
            false
        }
    }

    /// Jumps to `page`; out-of-range targets are ignored.
    pub fn go_to(&mut self, page: usize, len: usize) -> bool {
        if page == 0 || page > self.total_pages(len) || page == self.page {
            return false;
        }
        self.page = page;
        true
    }

    pub fn next(&mut self, len: usize) -> bool {
        self.go_to(self.page + 1, len)
    }

    pub fn prev(&mut self, len: usize) -> bool {
        self.go_to(self.page.saturating_sub(1), len)
    }

    /// Changes the page size and clamps the page. Zero is ignored.
    pub fn set_page_size(&mut self, page_size: usize, len: usize) -> bool {
        if page_size == 0 || page_size == self.page_size {
            return false;
        }
        self.page_size = page_size;
        self.clamp(len);
        true
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// Row indices shown on the current page, bounded by `len`.
    pub fn range(&self, len: usize) -> Range<usize> {
        let start = (self.page - 1).saturating_mul(self.page_size).min(len);
        let end = start.saturating_add(self.page_size).min(len);
        start..end
    }

    pub fn slice<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        &rows[self.range(rows.len())]
    }
}
