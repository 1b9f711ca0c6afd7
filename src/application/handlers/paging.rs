//! Page-numbered listings.

use crate::application::ApplicationError;
use crate::ports::Page;

/// A 1-based page of `size` rows.
///
/// The number is signed so a negative `?page=` reaches `lookahead` and is
/// reported as a missing page rather than a malformed argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub number: i64,
    pub size: u64,
}

impl PageRequest {
    pub fn new(number: i64, size: u64) -> Self {
        Self { number, size }
    }

    /// The store page to fetch, one row past the end to detect a next page.
    ///
    /// # Errors
    ///
    /// Page numbers below 1 do not exist.
    pub(crate) fn lookahead(&self) -> Result<Page, ApplicationError> {
        if self.number < 1 {
            return Err(ApplicationError::not_found("Page not found"));
        }
        Ok(Page::number(self.number as u64, self.size).with_lookahead())
    }

    /// Trims the lookahead row off a fetched page. `total` is the number of
    /// rows matching the listing across every page.
    ///
    /// # Errors
    ///
    /// An empty page past the first does not exist.
    pub(crate) fn finish<T>(&self, mut rows: Vec<T>, total: u64) -> Result<Paginated<T>, ApplicationError> {
        if rows.is_empty() && self.number > 1 {
            return Err(ApplicationError::not_found("Page not found"));
        }
        let has_next = rows.len() as u64 > self.size;
        rows.truncate(self.size as usize);
        Ok(Paginated {
            items: rows,
            page: self.number.max(1) as u64,
            last_page: self.last_page(total),
            has_next,
        })
    }

    fn last_page(&self, total: u64) -> u64 {
        if self.size == 0 {
            return 1;
        }
        total.div_ceil(self.size).max(1)
    }
}

/// One page of results, plus what is needed to build `next`/`prev`/`last` links.
#[derive(Debug, Clone, PartialEq)]
pub struct Paginated<T> {
    pub items: Vec<T>,

    /// 1-based number of this page. Unpaginated listings report page 1.
    pub page: u64,

    /// Number of the final page; at least 1.
    pub last_page: u64,

    pub has_next: bool,
}

impl<T> Paginated<T> {
    /// Every row on a single page.
    pub fn all(items: Vec<T>) -> Self {
        Self {
            items,
            page: 1,
            last_page: 1,
            has_next: false,
        }
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}
