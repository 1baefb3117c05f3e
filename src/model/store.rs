//! Per-category result containers, the single source of truth for rendering

use super::catalog::CategoryPage;
use super::content::{CombinedResults, SearchAlbum, SearchArtist, SearchPlaylist, SearchTrack};
use super::pagination::{append_page, has_more, ResultSet};
use super::types::{Category, FacetFilter, Query};
use crate::error::SearchError;

#[derive(Clone, Debug, Default)]
pub struct ResultStore {
    pub albums: ResultSet<SearchAlbum>,
    pub tracks: ResultSet<SearchTrack>,
    pub artists: ResultSet<SearchArtist>,
    pub playlists: ResultSet<SearchPlaylist>,
    pub combined: Option<CombinedResults>,
    /// Last failure of the current query, shown inline until the next commit
    pub error: Option<SearchError>,
    /// Normalized text and filter the held results belong to
    text: String,
    filter: Option<FacetFilter>,
    /// Categories with a committed first page
    filled: [bool; 4],
    loading_more: [bool; 4],
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the store already holds committed results of `query`'s tab
    pub fn holds(&self, query: &Query) -> bool {
        if self.text != query.text() || self.filter != query.filter() {
            return false;
        }
        match query.tab().category() {
            Some(category) => self.filled[category.slot()],
            None => self.combined.is_some(),
        }
    }

    pub fn len(&self, category: Category) -> usize {
        match category {
            Category::Albums => self.albums.len(),
            Category::Tracks => self.tracks.len(),
            Category::Artists => self.artists.len(),
            Category::Playlists => self.playlists.len(),
        }
    }

    pub fn has_more(&self, category: Category) -> bool {
        match category {
            Category::Albums => has_more(&self.albums),
            Category::Tracks => has_more(&self.tracks),
            Category::Artists => has_more(&self.artists),
            Category::Playlists => has_more(&self.playlists),
        }
    }

    pub fn total(&self, category: Category) -> usize {
        match category {
            Category::Albums => self.albums.total,
            Category::Tracks => self.tracks.total,
            Category::Artists => self.artists.total,
            Category::Playlists => self.playlists.total,
        }
    }

    pub fn next_offset(&self, category: Category) -> usize {
        self.len(category)
    }

    /// Item keys in `range` of `category`, clamped to what is held
    pub fn keys(&self, category: Category, range: std::ops::Range<usize>) -> Vec<String> {
        fn slice_keys<T: super::content::CatalogItem>(
            set: &ResultSet<T>,
            range: std::ops::Range<usize>,
        ) -> Vec<String> {
            let end = range.end.min(set.items.len());
            let start = range.start.min(end);
            set.items[start..end].iter().map(|item| item.key().to_string()).collect()
        }

        match category {
            Category::Albums => slice_keys(&self.albums, range),
            Category::Tracks => slice_keys(&self.tracks, range),
            Category::Artists => slice_keys(&self.artists, range),
            Category::Playlists => slice_keys(&self.playlists, range),
        }
    }

    pub fn is_loading_more(&self, category: Category) -> bool {
        self.loading_more[category.slot()]
    }

    pub(crate) fn set_loading_more(&mut self, category: Category, loading: bool) {
        self.loading_more[category.slot()] = loading;
    }

    pub(crate) fn reset_loading_more(&mut self) {
        self.loading_more = [false; 4];
    }

    /// Drop results held for a different text or filter so two searches
    /// never mix
    fn retarget(&mut self, query: &Query) {
        if self.text != query.text() || self.filter != query.filter() {
            tracing::debug!(
                from = %self.text,
                to = %query.text(),
                from_filter = ?self.filter,
                to_filter = ?query.filter(),
                "Result store switching query"
            );
            let loading_more = self.loading_more;
            *self = Self {
                text: query.text().to_string(),
                filter: query.filter(),
                loading_more,
                ..Self::default()
            };
        }
    }

    /// Replace a category with the first page of a new search
    pub(crate) fn commit_first_page(&mut self, query: &Query, page: CategoryPage) {
        self.retarget(query);
        self.error = None;
        self.filled[page.category().slot()] = true;
        match page {
            CategoryPage::Albums(p) => self.albums = ResultSet::from_page(p),
            CategoryPage::Tracks(p) => self.tracks = ResultSet::from_page(p),
            CategoryPage::Artists(p) => self.artists = ResultSet::from_page(p),
            CategoryPage::Playlists(p) => self.playlists = ResultSet::from_page(p),
        }
    }

    /// Append a load-more page. An empty page marks the category exhausted.
    pub(crate) fn append(&mut self, page: CategoryPage) {
        self.error = None;
        match page {
            CategoryPage::Albums(p) => self.albums = grow(std::mem::take(&mut self.albums), p),
            CategoryPage::Tracks(p) => self.tracks = grow(std::mem::take(&mut self.tracks), p),
            CategoryPage::Artists(p) => self.artists = grow(std::mem::take(&mut self.artists), p),
            CategoryPage::Playlists(p) => {
                self.playlists = grow(std::mem::take(&mut self.playlists), p)
            }
        }
    }

    /// Replace the combined results, keeping the previous most-popular pick
    /// when the new response has none for the same text (ignoring case) and
    /// filter.
    pub(crate) fn commit_combined(&mut self, query: &Query, mut results: CombinedResults) {
        let same_search = self.text.to_lowercase() == query.text().to_lowercase()
            && self.filter == query.filter();
        let previous_pick = match &self.combined {
            Some(previous) if same_search => previous.most_popular.clone(),
            _ => None,
        };

        if results.most_popular.is_none() {
            if let Some(pick) = previous_pick {
                tracing::debug!(pick = %pick.name(), "Keeping previous most-popular pick");
                results.most_popular = Some(pick);
            }
        }

        // Case-only changes keep the pick, so retarget only after reading it
        self.retarget(query);
        self.error = None;
        self.combined = Some(results);
    }
}

fn grow<T>(set: ResultSet<T>, page: super::pagination::ResultPage<T>) -> ResultSet<T> {
    let exhausted = page.items.is_empty();
    let mut set = append_page(set, page);
    if exhausted && has_more(&set) {
        tracing::debug!(
            held = set.items.len(),
            total = set.total,
            "Empty page before declared total, treating as exhausted"
        );
        set.total = set.items.len();
    }
    set
}
