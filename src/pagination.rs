use std::ops::Range;

pub const DEFAULT_PAGE_SIZE: usize = 6;

/// `max(1, ceil(count / page_size))`.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}

pub fn clamp_page(page: usize, total: usize) -> usize {
    page.clamp(1, total.max(1))
}

/// Index range of `page` (1-based) within a collection of `count` items.
pub fn page_range(page: usize, page_size: usize, count: usize) -> Range<usize> {
    let size = page_size.max(1);
    let start = page.saturating_sub(1).saturating_mul(size).min(count);
    let end = start.saturating_add(size).min(count);
    start..end
}

/// Navigation state for one rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub page: usize,
    pub total_pages: usize,
}

impl PageInfo {
    pub fn new(page: usize, count: usize, page_size: usize) -> Self {
        let total_pages = total_pages(count, page_size);
        Self { page: clamp_page(page, total_pages), total_pages }
    }

    pub fn has_prev(&self) -> bool { self.page > 1 }
    pub fn has_next(&self) -> bool { self.page < self.total_pages }
    pub fn prev(&self) -> usize { self.page.saturating_sub(1) }
    pub fn next(&self) -> usize { self.page + 1 }
}
