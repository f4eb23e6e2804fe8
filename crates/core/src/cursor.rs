//! Infinite-scroll position within one (folder, filter) context.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCursor {
    pub offset: usize,
    /// Always > 0.
    pub page_size: usize,
    /// Set on the first empty page; never cleared except by [`reset`](Self::reset).
    pub exhausted: bool,
    /// Number of non-empty pages merged so far.
    pub pages_loaded: usize,
}

impl PageCursor {
    pub const fn new(page_size: usize) -> Self {
        Self { offset: 0, page_size, exhausted: false, pages_loaded: 0 }
    }

    /// Back to the first page; used whenever the folder or filter changes.
    pub fn reset(&mut self) {
        *self = Self::new(self.page_size);
    }

    pub fn advance(&mut self) {
        self.offset = self.offset.saturating_add(self.page_size);
        self.pages_loaded = self.pages_loaded.saturating_add(1);
    }

    pub fn exhaust(&mut self) {
        self.exhausted = true;
    }
}
