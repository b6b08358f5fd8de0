//! Paged window over the configured video list.
//!
//! Both moves wrap. When the item count is not a multiple of the page size
//! the last page is shorter and the two moves are not inverse of each other
//! from every start. With 5 items and pages of 3:
//!
//! - `advance`: 0 -> 3 -> 0
//! - `retreat`: 0 -> 2 -> 0
//!
//! so `retreat(advance(3)) == 2`, not 3. From page-aligned starts with an
//! evenly dividing count they undo each other. An empty list stays at 0.

use std::any::Any;

use dashboard_states::State;
use ustr::Ustr;

pub const PAGE_SIZE: usize = 3;

/// Start of the next page, or 0 past the end.
pub fn advance(current: usize, len: usize, page: usize) -> usize {
    if current + page >= len {
        0
    } else {
        current + page
    }
}

/// Start of the previous page, or the last page start from 0.
pub fn retreat(current: usize, len: usize, page: usize) -> usize {
    if current == 0 {
        len.saturating_sub(page)
    } else {
        current.saturating_sub(page)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarouselWindow {
    items: Vec<Ustr>,
    page_size: usize,
    start: usize,
}

impl CarouselWindow {
    pub fn new(items: Vec<Ustr>) -> Self {
        Self::with_page_size(items, PAGE_SIZE)
    }

    pub fn with_page_size(items: Vec<Ustr>, page_size: usize) -> Self {
        Self {
            items,
            page_size: page_size.max(1),
            start: 0,
        }
    }

    pub fn items(&self) -> &[Ustr] {
        &self.items
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn advance(&mut self) {
        self.start = advance(self.start, self.items.len(), self.page_size);
    }

    pub fn retreat(&mut self) {
        self.start = retreat(self.start, self.items.len(), self.page_size);
    }

    /// Items of the current page, possibly fewer than a full page.
    pub fn visible(&self) -> &[Ustr] {
        let end = (self.start + self.page_size).min(self.items.len());
        self.items.get(self.start..end).unwrap_or_default()
    }

    /// Horizontal offset of the strip as a fraction of its width.
    pub fn offset_fraction(&self) -> f32 {
        if self.items.is_empty() {
            0.0
        } else {
            -(self.start as f32 / self.items.len() as f32)
        }
    }
}

impl State for CarouselWindow {
    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }
}
