//! Client-side paging over the cached owner collection.
//!
//! Paging is a pure derivation: nothing here touches the network. The
//! [`Paginator`] holds the page index and size; every call to
//! [`Paginator::view`] clamps the index against the collection it is given,
//! so a shrinking collection (e.g. deleting the last row of the last page)
//! moves the view back instead of showing an empty page.

use thiserror::Error;

/// Page sizes offered to the user.
pub const PAGE_SIZES: [usize; 4] = [5, 10, 20, 50];

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("page size must be at least 1")]
pub struct PageSizeError;

/// Number of pages needed for `len` items; 0 when empty.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

/// One visible page of a collection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// 1-based.
    pub current_page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Page<'_, T> {
    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Page numbers to render as buttons, `1..=total_pages`.
    pub fn page_numbers(&self) -> std::ops::RangeInclusive<usize> {
        1..=self.total_pages
    }

    /// `"Page 2 of 3 (23 items)"`.
    pub fn summary(&self) -> String {
        format!(
            "Page {} of {} ({} items)",
            self.current_page, self.total_pages, self.total_items
        )
    }
}

/// Slice `records` for a 1-based page. Out-of-range pages are empty.
pub fn paginate<T>(records: &[T], current_page: usize, page_size: usize) -> Page<'_, T> {
    let start = current_page
        .saturating_sub(1)
        .saturating_mul(page_size)
        .min(records.len());
    let end = start.saturating_add(page_size).min(records.len());
    Page {
        items: &records[start..end],
        current_page,
        page_size,
        total_pages: total_pages(records.len(), page_size),
        total_items: records.len(),
    }
}

/// Page index and size for one table view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Paginator {
    current_page: usize,
    page_size: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self {
            current_page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Paginator {
    pub fn new(page_size: usize) -> Result<Self, PageSizeError> {
        let mut paginator = Self::default();
        paginator.set_page_size(page_size)?;
        Ok(paginator)
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Change the page size and go back to page 1.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), PageSizeError> {
        if page_size == 0 {
            return Err(PageSizeError);
        }
        self.page_size = page_size;
        self.current_page = 1;
        Ok(())
    }

    /// Jump to `page`, clamped into `[1, max(total_pages, 1)]` for `len` items.
    pub fn go_to(&mut self, page: usize, len: usize) {
        self.current_page = page;
        self.clamp(len);
    }

    pub fn next(&mut self, len: usize) {
        self.go_to(self.current_page.saturating_add(1), len);
    }

    pub fn prev(&mut self, len: usize) {
        self.go_to(self.current_page.saturating_sub(1), len);
    }

    /// Pull the page index back into range after the collection changed.
    pub fn clamp(&mut self, len: usize) {
        let last = total_pages(len, self.page_size).max(1);
        self.current_page = self.current_page.clamp(1, last);
    }

    /// Clamp against `records`, then slice the visible page.
    pub fn view<'a, T>(&mut self, records: &'a [T]) -> Page<'a, T> {
        self.clamp(records.len());
        paginate(records, self.current_page, self.page_size)
    }
}
