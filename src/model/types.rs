//! Core type definitions: tabs, categories, facet filters and the query value

use std::fmt;

/// Which result tab is active
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SearchTab {
    #[default]
    All,
    Albums,
    Tracks,
    Artists,
    Playlists,
}

impl SearchTab {
    pub const ALL: [SearchTab; 5] = [
        SearchTab::All,
        SearchTab::Albums,
        SearchTab::Tracks,
        SearchTab::Artists,
        SearchTab::Playlists,
    ];

    pub fn next(self) -> Self {
        match self {
            Self::All => Self::Albums,
            Self::Albums => Self::Tracks,
            Self::Tracks => Self::Artists,
            Self::Artists => Self::Playlists,
            Self::Playlists => Self::All,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::All => Self::Playlists,
            Self::Albums => Self::All,
            Self::Tracks => Self::Albums,
            Self::Artists => Self::Tracks,
            Self::Playlists => Self::Artists,
        }
    }

    /// The single category this tab pages through; `None` for the combined tab
    pub fn category(self) -> Option<Category> {
        match self {
            Self::All => None,
            Self::Albums => Some(Category::Albums),
            Self::Tracks => Some(Category::Tracks),
            Self::Artists => Some(Category::Artists),
            Self::Playlists => Some(Category::Playlists),
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Albums => "Albums",
            Self::Tracks => "Tracks",
            Self::Artists => "Artists",
            Self::Playlists => "Playlists",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::All => 0,
            Self::Albums => 1,
            Self::Tracks => 2,
            Self::Artists => 3,
            Self::Playlists => 4,
        }
    }
}

/// A pageable result category
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Albums,
    Tracks,
    Artists,
    Playlists,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Albums => "albums",
            Self::Tracks => "tracks",
            Self::Artists => "artists",
            Self::Playlists => "playlists",
        }
    }

    pub(crate) fn slot(self) -> usize {
        match self {
            Self::Albums => 0,
            Self::Tracks => 1,
            Self::Artists => 2,
            Self::Playlists => 3,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Restricts which metadata field the query text must match
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FacetFilter {
    Artist,
    Performer,
    Composer,
    Label,
    ReleaseName,
}

impl FacetFilter {
    /// Cycle order used by the filter hotkey: none, then each facet in turn
    pub fn cycle(current: Option<Self>) -> Option<Self> {
        match current {
            None => Some(Self::Artist),
            Some(Self::Artist) => Some(Self::Performer),
            Some(Self::Performer) => Some(Self::Composer),
            Some(Self::Composer) => Some(Self::Label),
            Some(Self::Label) => Some(Self::ReleaseName),
            Some(Self::ReleaseName) => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Artist => "artist",
            Self::Performer => "performer",
            Self::Composer => "composer",
            Self::Label => "label",
            Self::ReleaseName => "release name",
        }
    }
}

/// Trim and collapse runs of whitespace into single spaces. Case is kept.
pub fn normalize_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// An immutable search request.
///
/// Two queries are equal when their normalized text, tab and filter match;
/// the raw text is carried only for display.
#[derive(Clone, Debug, Default)]
pub struct Query {
    raw: String,
    normalized: String,
    tab: SearchTab,
    filter: Option<FacetFilter>,
}

impl Query {
    pub fn new(raw: impl Into<String>, tab: SearchTab, filter: Option<FacetFilter>) -> Self {
        let raw = raw.into();
        let normalized = normalize_text(&raw);
        Self { raw, normalized, tab, filter }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn text(&self) -> &str {
        &self.normalized
    }

    pub fn tab(&self) -> SearchTab {
        self.tab
    }

    pub fn filter(&self) -> Option<FacetFilter> {
        self.filter
    }

    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }

    /// Length of the normalized text in characters
    pub fn len(&self) -> usize {
        self.normalized.chars().count()
    }
}

impl PartialEq for Query {
    fn eq(&self, other: &Self) -> bool {
        self.normalized == other.normalized && self.tab == other.tab && self.filter == other.filter
    }
}

impl Eq for Query {}

/// Scroll offset and selected item of one tab
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TabView {
    pub scroll_top: u32,
    pub selected: usize,
}

/// UI state for the search screen
#[derive(Clone, Debug, Default)]
pub struct UiState {
    pub input: String,
    pub tab: SearchTab,
    pub filter: Option<FacetFilter>,
    pub views: [TabView; 5],
    /// A text change is waiting out the debounce period
    pub debouncing: bool,
    /// Scroll so the selected item is on screen at the next render
    pub follow_selection: bool,
    /// Grid columns and items per page of the last render
    pub columns: usize,
    pub page_items: usize,
    pub show_help_popup: bool,
    pub should_quit: bool,
}

impl UiState {
    pub fn query(&self) -> Query {
        Query::new(self.input.clone(), self.tab, self.filter)
    }

    pub fn view(&self) -> &TabView {
        &self.views[self.tab.index()]
    }

    pub fn view_mut(&mut self) -> &mut TabView {
        &mut self.views[self.tab.index()]
    }

    pub fn reset_views(&mut self) {
        self.views = Default::default();
    }

    /// Move the selection of the active tab by `delta`, clamped to `count` items
    pub fn move_selection(&mut self, delta: isize, count: usize) {
        let view = self.view_mut();
        if count == 0 {
            view.selected = 0;
            return;
        }
        let target = view.selected as isize + delta;
        view.selected = target.clamp(0, count as isize - 1) as usize;
        self.follow_selection = true;
    }

    /// Scroll the active tab by `delta` lines without touching the selection
    pub fn scroll_by(&mut self, delta: i64) {
        let view = self.view_mut();
        view.scroll_top = (view.scroll_top as i64 + delta).clamp(0, u32::MAX as i64) as u32;
        self.follow_selection = false;
    }
}
