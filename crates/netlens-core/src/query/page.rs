//! Page position of a paginated view.

use serde::{Deserialize, Serialize};

/// Zero-based page cursor. `offset = current_page * limit` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageState {
    current_page: u64,
    limit: u32,
}

impl PageState {
    /// A zero limit is bumped to 1.
    pub fn new(limit: u32) -> Self {
        Self {
            current_page: 0,
            limit: limit.max(1),
        }
    }

    pub fn current_page(&self) -> u64 {
        self.current_page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn offset(&self) -> u64 {
        self.current_page * u64::from(self.limit)
    }

    /// Changes the page size and goes back to the first page.
    pub fn set_limit(&mut self, limit: u32) {
        self.limit = limit.max(1);
        self.current_page = 0;
    }

    pub fn reset(&mut self) {
        self.current_page = 0;
    }

    /// `ceil(total / limit)`.
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.limit))
    }

    pub fn can_previous(&self, total: u64) -> bool {
        self.total_pages(total) > 1 && self.current_page > 0
    }

    pub fn can_next(&self, total: u64) -> bool {
        let pages = self.total_pages(total);
        pages > 1 && self.current_page < pages - 1
    }

    /// Steps back one page. Returns false (and does nothing) at the first
    /// page or when there is only one page.
    pub fn previous_page(&mut self, total: u64) -> bool {
        if !self.can_previous(total) {
            return false;
        }
        self.current_page -= 1;
        true
    }

    /// Steps forward one page. Returns false (and does nothing) on the last
    /// page or when there is only one page.
    pub fn next_page(&mut self, total: u64) -> bool {
        if !self.can_next(total) {
            return false;
        }
        self.current_page += 1;
        true
    }

    /// Jumps to `page`, clamped to the last page for `total`.
    pub fn go_to(&mut self, page: u64, total: u64) {
        let last = self.total_pages(total).saturating_sub(1);
        self.current_page = page.min(last);
    }
}
