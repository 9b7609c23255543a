/// Pagination state for the listing index
///
/// The offset only moves forward, by exactly one page per attempt, whether or
/// not that page scraped cleanly. `max_items` is the configured listing bound;
/// it is never learned from the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    offset: usize,
    page_size: usize,
    max_items: usize,
}

impl PageCursor {
    /// Start a cursor at offset 0. A zero page size is treated as one.
    pub fn new(page_size: usize, max_items: usize) -> Self {
        Self {
            offset: 0,
            page_size: page_size.max(1),
            max_items,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    /// Offset one past the last item requested by the current page
    pub fn page_end(&self) -> usize {
        self.offset.saturating_add(self.page_size)
    }

    /// Whether the current offset is still below the bound
    pub fn has_next(&self) -> bool {
        self.offset < self.max_items
    }

    /// Move to the next page
    pub fn advance(&mut self) {
        self.offset = self.offset.saturating_add(self.page_size);
    }

    /// Number of pages a full run visits
    pub fn total_pages(&self) -> usize {
        self.max_items.div_ceil(self.page_size)
    }
}
