//! Page accumulation for paged catalog results
//!
//! A `ResultSet` only ever grows by appending whole pages. The next offset to
//! request is always the number of items already held, never the `offset`
//! echoed back by the server.

/// One page as returned by the catalog
#[derive(Clone, Debug, PartialEq)]
pub struct ResultPage<T> {
    pub items: Vec<T>,
    /// Server-declared total; may drift between pages
    pub total: usize,
    /// Offset echoed by the server for this page
    pub offset: usize,
}

impl<T> ResultPage<T> {
    pub fn new(items: Vec<T>, total: usize, offset: usize) -> Self {
        Self { items, total, offset }
    }
}

impl<T> Default for ResultPage<T> {
    fn default() -> Self {
        Self { items: Vec::new(), total: 0, offset: 0 }
    }
}

/// Items accumulated across pages for one category
#[derive(Clone, Debug, PartialEq)]
pub struct ResultSet<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub offset: usize,
}

impl<T> Default for ResultSet<T> {
    fn default() -> Self {
        Self { items: Vec::new(), total: 0, offset: 0 }
    }
}

impl<T> ResultSet<T> {
    /// Start a fresh set from the first page of a new search
    pub fn from_page(page: ResultPage<T>) -> Self {
        Self {
            items: page.items,
            total: page.total,
            offset: page.offset,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Offset to request for the next page
    pub fn next_offset(&self) -> usize {
        self.items.len()
    }
}

/// Append `page` to `set`, returning the grown set.
///
/// Items are concatenated in order without de-duplication. The latest
/// server total replaces the previous one verbatim.
pub fn append_page<T>(set: ResultSet<T>, page: ResultPage<T>) -> ResultSet<T> {
    let ResultSet { mut items, total: previous_total, .. } = set;

    if page.total != previous_total {
        tracing::debug!(
            previous_total,
            total = page.total,
            "Server total changed between pages"
        );
    }

    items.extend(page.items);

    ResultSet {
        items,
        total: page.total,
        offset: 0,
    }
}

pub fn has_more<T>(set: &ResultSet<T>) -> bool {
    set.items.len() < set.total
}
