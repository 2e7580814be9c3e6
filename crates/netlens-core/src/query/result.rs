//! What a view displays for a paginated collection.

use serde::{Deserialize, Serialize};

/// One page as returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

/// Observable state of a fetcher.
///
/// While `loading` is set, `items` and `total` still hold the last
/// successful page. A failure clears them and sets `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for FetchResult<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            loading: false,
            error: None,
        }
    }
}

impl<T> FetchResult<T> {
    pub fn is_idle(&self) -> bool {
        !self.loading && self.error.is_none() && self.items.is_empty() && self.total == 0
    }

    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn succeed(&mut self, page: Page<T>) {
        self.items = page.items;
        self.total = page.total;
        self.loading = false;
        self.error = None;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.items = Vec::new();
        self.total = 0;
        self.loading = false;
        self.error = Some(message.into());
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
