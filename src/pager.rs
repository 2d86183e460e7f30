/// Songs shown per page of listening history.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Page position over an already-fetched list.
///
/// The page index stays within `[0, total_pages - 1]` (or at 0 for an empty
/// list). Moving never fetches anything.
///
/// # Examples
///
/// ```rust
/// use antirecommender::Pager;
///
/// let mut pager = Pager::new(12, 5);
/// assert_eq!(pager.total_pages(), 3);
/// pager.next();
/// pager.next();
/// pager.next();
/// assert_eq!(pager.page(), 2);
/// assert_eq!(pager.range(), 10..12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page: usize,
    page_size: usize,
    item_count: usize,
}

impl Pager {
    /// A page size of zero is treated as one.
    pub fn new(item_count: usize, page_size: usize) -> Self {
        Self {
            page: 0,
            page_size: page_size.max(1),
            item_count,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self) -> usize {
        self.item_count.div_ceil(self.page_size)
    }

    fn last_page(&self) -> usize {
        self.total_pages().saturating_sub(1)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.last_page()
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    /// Advance one page, staying on the last page.
    pub fn next(&mut self) -> usize {
        self.page = (self.page + 1).min(self.last_page());
        self.page
    }

    /// Go back one page, staying on the first page.
    pub fn previous(&mut self) -> usize {
        self.page = self.page.saturating_sub(1);
        self.page
    }

    /// Jump to `page`, clamped into range.
    pub fn go_to(&mut self, page: usize) -> usize {
        self.page = page.min(self.last_page());
        self.page
    }

    /// Index range of the current page.
    pub fn range(&self) -> std::ops::Range<usize> {
        let start = (self.page * self.page_size).min(self.item_count);
        let end = (start + self.page_size).min(self.item_count);
        start..end
    }

    /// The current page's window of `items`.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let range = self.range();
        let end = range.end.min(items.len());
        let start = range.start.min(end);
        &items[start..end]
    }
}
