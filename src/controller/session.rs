//! Versioned search sessions
//!
//! Every search bumps the session version. A fetch remembers the version it
//! was issued under and its result is committed only if that version is still
//! current when it completes; otherwise it is dropped unread. Nothing is ever
//! aborted mid-request.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::model::{
    fetch_category, CatalogApi, Category, CategoryPage, CombinedResults, Query, ResultStore,
};

/// Where the session is in its lifecycle. Debouncing happens before a query
/// reaches the controller, so it is tracked by the front-end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SearchPhase {
    #[default]
    Idle,
    Fetching,
    Settled,
    Errored,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Results were written to the store
    Committed,
    /// An equal query is already in flight
    Duplicate,
    /// A newer search or a clear superseded this one; its result was dropped
    Stale,
    /// The query was empty and the session was cleared instead
    Cleared,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadMoreOutcome {
    Appended(usize),
    /// Every item the server declared is already loaded
    Exhausted,
    AlreadyLoading,
    /// The current query has no committed results to extend yet
    NotReady,
    /// The combined tab, or a category other than the active tab's
    Unsupported,
    Stale,
}

/// Everything needed to resume a search screen exactly where it was left
#[derive(Clone, Debug, Default)]
pub struct SearchSnapshot {
    pub query: Query,
    pub committed: Option<Query>,
    pub store: ResultStore,
}

#[derive(Default)]
struct SessionState {
    query: Query,
    version: u64,
    in_flight: Option<Query>,
    /// Query whose results the store currently holds
    committed: Option<Query>,
    phase: SearchPhase,
    store: ResultStore,
}

enum Fetched {
    Page(CategoryPage),
    Combined(CombinedResults),
}

/// Owns the session and the result store; cheap to clone
#[derive(Clone)]
pub struct SearchController {
    catalog: Arc<dyn CatalogApi>,
    config: SearchConfig,
    state: Arc<Mutex<SessionState>>,
}

impl SearchController {
    pub fn new(catalog: Arc<dyn CatalogApi>, config: SearchConfig) -> Self {
        Self {
            catalog,
            config,
            state: Arc::new(Mutex::new(SessionState::default())),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    #[cfg(test)]
    pub async fn version(&self) -> u64 {
        self.state.lock().await.version
    }

    pub async fn phase(&self) -> SearchPhase {
        self.state.lock().await.phase
    }

    pub async fn current_query(&self) -> Query {
        self.state.lock().await.query.clone()
    }

    #[cfg(test)]
    pub async fn in_flight(&self) -> Option<Query> {
        self.state.lock().await.in_flight.clone()
    }

    /// Run `f` against the result store without cloning it
    pub async fn read<R>(&self, f: impl FnOnce(&ResultStore) -> R) -> R {
        let state = self.state.lock().await;
        f(&state.store)
    }

    /// Search for `query`, committing the result only if no newer search or
    /// clear happened meanwhile.
    pub async fn search(&self, query: Query) -> Result<SearchOutcome, SearchError> {
        if query.is_empty() {
            self.clear().await;
            return Ok(SearchOutcome::Cleared);
        }

        let version = {
            let mut state = self.state.lock().await;
            if state.in_flight.as_ref() == Some(&query) {
                tracing::debug!(query = %query.text(), tab = ?query.tab(), "Equal search already in flight");
                return Ok(SearchOutcome::Duplicate);
            }

            state.version += 1;
            state.query = query.clone();
            state.in_flight = Some(query.clone());
            state.phase = SearchPhase::Fetching;
            // Pending load-mores belong to the superseded query
            state.store.reset_loading_more();
            state.version
        };

        tracing::debug!(
            query = %query.text(),
            tab = ?query.tab(),
            filter = ?query.filter(),
            version,
            "Performing search"
        );

        let result = self.fetch_first(&query).await;

        let mut state = self.state.lock().await;
        if state.version != version {
            match &result {
                Ok(_) => tracing::debug!(query = %query.text(), version, current = state.version, "Dropping stale search result"),
                Err(e) => tracing::debug!(query = %query.text(), version, error = %e, "Dropping stale search failure"),
            }
            return Ok(SearchOutcome::Stale);
        }

        state.in_flight = None;
        match result {
            Ok(Fetched::Page(page)) => {
                tracing::info!(
                    query = %query.text(),
                    category = %page.category(),
                    items = page.len(),
                    total = page.total(),
                    version,
                    "Search completed successfully"
                );
                state.store.commit_first_page(&query, page);
            }
            Ok(Fetched::Combined(results)) => {
                tracing::info!(
                    query = %query.text(),
                    albums = results.albums.items.len(),
                    tracks = results.tracks.items.len(),
                    artists = results.artists.items.len(),
                    playlists = results.playlists.items.len(),
                    version,
                    "Combined search completed successfully"
                );
                state.store.commit_combined(&query, results);
            }
            Err(e) => {
                tracing::error!(query = %query.text(), error = %e, "Search failed");
                let error = SearchError::network(query.text(), &e);
                state.store.error = Some(error.clone());
                state.phase = SearchPhase::Errored;
                return Err(error);
            }
        }

        state.committed = Some(query);
        state.phase = SearchPhase::Settled;
        Ok(SearchOutcome::Committed)
    }

    async fn fetch_first(&self, query: &Query) -> anyhow::Result<Fetched> {
        match query.tab().category() {
            None => {
                crate::log_api_request!("search_all", query = %query.text());
                let result = self.catalog.search_all(query.text()).await;
                crate::log_api_result!("search_all", result);
                result.map(Fetched::Combined)
            }
            Some(category) => fetch_category(
                self.catalog.as_ref(),
                category,
                query.text(),
                self.config.page_size,
                0,
                query.filter(),
            )
            .await
            .map(Fetched::Page),
        }
    }

    /// Fetch the next page of `category` for the current query.
    ///
    /// At most one load-more per category runs at a time. A failure keeps the
    /// items already loaded; calling again retries.
    pub async fn load_more(&self, category: Category) -> Result<LoadMoreOutcome, SearchError> {
        let (version, query, offset) = {
            let mut state = self.state.lock().await;

            if state.query.tab().category() != Some(category) {
                return Ok(LoadMoreOutcome::Unsupported);
            }
            if state.in_flight.is_some() || state.committed.as_ref() != Some(&state.query) {
                return Ok(LoadMoreOutcome::NotReady);
            }
            if state.store.is_loading_more(category) {
                return Ok(LoadMoreOutcome::AlreadyLoading);
            }
            if !state.store.has_more(category) {
                return Ok(LoadMoreOutcome::Exhausted);
            }

            state.store.set_loading_more(category, true);
            (state.version, state.query.clone(), state.store.next_offset(category))
        };

        tracing::debug!(query = %query.text(), category = %category, offset, "Loading more results");

        let result = fetch_category(
            self.catalog.as_ref(),
            category,
            query.text(),
            self.config.page_size,
            offset,
            query.filter(),
        )
        .await;

        let mut state = self.state.lock().await;
        if state.version != version {
            tracing::debug!(query = %query.text(), category = %category, version, "Dropping stale load-more");
            return Ok(LoadMoreOutcome::Stale);
        }
        state.store.set_loading_more(category, false);

        match result {
            Ok(page) => {
                let added = page.len();
                state.store.append(page);
                tracing::info!(
                    category = %category,
                    added,
                    loaded = state.store.len(category),
                    total = state.store.total(category),
                    "Loaded more results"
                );
                Ok(LoadMoreOutcome::Appended(added))
            }
            Err(e) => {
                tracing::error!(category = %category, offset, error = %e, "Failed to load more results");
                let error = SearchError::load_more(category, &e);
                state.store.error = Some(error.clone());
                Err(error)
            }
        }
    }

    /// Make `query` current again without fetching when the store already
    /// holds its first page, e.g. after switching back to a tab. Pages loaded
    /// earlier stay. Returns `false` if a fetch is needed.
    pub async fn resume(&self, query: Query) -> bool {
        let mut state = self.state.lock().await;
        if query.is_empty() || state.store.error.is_some() || !state.store.holds(&query) {
            return false;
        }

        state.version += 1;
        state.in_flight = None;
        state.phase = SearchPhase::Settled;
        state.store.reset_loading_more();
        tracing::debug!(
            query = %query.text(),
            tab = ?query.tab(),
            version = state.version,
            "Resuming held results"
        );
        state.query = query.clone();
        state.committed = Some(query);
        true
    }

    /// Forget the query and all results; anything in flight becomes stale
    pub async fn clear(&self) {
        let mut state = self.state.lock().await;
        state.version += 1;
        state.query = Query::default();
        state.in_flight = None;
        state.committed = None;
        state.phase = SearchPhase::Idle;
        state.store = ResultStore::new();
        tracing::debug!(version = state.version, "Search cleared");
    }

    pub async fn snapshot(&self) -> SearchSnapshot {
        let state = self.state.lock().await;
        SearchSnapshot {
            query: state.query.clone(),
            committed: state.committed.clone(),
            store: state.store.clone(),
        }
    }

    /// Reinstate a snapshot. Searches still in flight can no longer commit.
    pub async fn restore(&self, snapshot: SearchSnapshot) {
        let mut state = self.state.lock().await;
        state.version += 1;
        state.in_flight = None;
        state.phase = if snapshot.committed.is_some() {
            SearchPhase::Settled
        } else {
            SearchPhase::Idle
        };
        state.query = snapshot.query;
        state.committed = snapshot.committed;
        state.store = snapshot.store;
        state.store.reset_loading_more();
        tracing::debug!(query = %state.query.text(), version = state.version, "Search session restored");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::mock::{MockCatalog, Reply};
    use crate::model::{fixtures, MostPopular, ResultPage, SearchTab};

    fn controller(catalog: Arc<MockCatalog>) -> SearchController {
        SearchController::new(catalog, SearchConfig::default())
    }

    fn albums_reply(prefix: &str, count: usize, total: usize) -> Reply {
        Reply::Page(CategoryPage::Albums(ResultPage::new(
            fixtures::albums(prefix, 0..count),
            total,
            0,
        )))
    }

    fn combined(pick: Option<MostPopular>) -> CombinedResults {
        CombinedResults {
            artists: ResultPage::new(vec![fixtures::artist("ar1", "X")], 1, 0),
            most_popular: pick,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_radiohead_albums_load_more() {
        let catalog = Arc::new(MockCatalog::new(137));
        let search = controller(catalog.clone());

        let outcome = search
            .search(Query::new("radiohead", SearchTab::Albums, None))
            .await
            .unwrap();
        assert_eq!(outcome, SearchOutcome::Committed);
        assert_eq!(search.phase().await, SearchPhase::Settled);
        assert_eq!(search.read(|s| s.len(Category::Albums)).await, 20);
        assert!(search.read(|s| s.has_more(Category::Albums)).await);

        let outcome = search.load_more(Category::Albums).await.unwrap();
        assert_eq!(outcome, LoadMoreOutcome::Appended(20));
        assert_eq!(search.read(|s| s.len(Category::Albums)).await, 40);
        assert_eq!(search.read(|s| s.next_offset(Category::Albums)).await, 40);

        let calls = catalog.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!((calls[0].offset, calls[0].limit), (0, 20));
        assert_eq!(calls[1].offset, 20);
    }

    #[tokio::test]
    async fn test_load_more_until_exhausted_then_noop() {
        let catalog = Arc::new(MockCatalog::new(45));
        let search = controller(catalog.clone());
        search.search(Query::new("ab", SearchTab::Tracks, None)).await.unwrap();

        assert_eq!(search.load_more(Category::Tracks).await.unwrap(), LoadMoreOutcome::Appended(20));
        assert_eq!(search.load_more(Category::Tracks).await.unwrap(), LoadMoreOutcome::Appended(5));
        assert!(!search.read(|s| s.has_more(Category::Tracks)).await);

        for _ in 0..3 {
            assert_eq!(search.load_more(Category::Tracks).await.unwrap(), LoadMoreOutcome::Exhausted);
        }
        assert_eq!(catalog.calls().len(), 3);
        assert_eq!(search.read(|s| s.len(Category::Tracks)).await, 45);
    }

    #[tokio::test]
    async fn test_late_older_result_does_not_overwrite_newer() {
        let catalog = Arc::new(MockCatalog::new(0));
        let release_first = catalog.push_gated(albums_reply("old", 3, 3));
        catalog.push(albums_reply("new", 5, 5));
        let search = controller(catalog.clone());

        let first = tokio::spawn({
            let search = search.clone();
            async move { search.search(Query::new("radio", SearchTab::Albums, None)).await }
        });
        // Let the first search reach its network await
        while catalog.calls().is_empty() {
            tokio::task::yield_now().await;
        }

        let second = search
            .search(Query::new("radiohead", SearchTab::Albums, None))
            .await
            .unwrap();
        assert_eq!(second, SearchOutcome::Committed);

        release_first.send(()).unwrap();
        assert_eq!(first.await.unwrap().unwrap(), SearchOutcome::Stale);

        let names: Vec<String> = search
            .read(|s| s.albums.items.iter().map(|a| a.id.clone()).collect())
            .await;
        assert_eq!(names, vec!["new0", "new1", "new2", "new3", "new4"]);
        assert_eq!(search.read(|s| s.text().to_string()).await, "radiohead");
    }

    #[tokio::test]
    async fn test_equal_query_in_flight_is_not_refetched() {
        let catalog = Arc::new(MockCatalog::new(0));
        let release = catalog.push_gated(albums_reply("a", 2, 2));
        let search = controller(catalog.clone());

        let first = tokio::spawn({
            let search = search.clone();
            async move { search.search(Query::new("abc", SearchTab::Albums, None)).await }
        });
        while catalog.calls().is_empty() {
            tokio::task::yield_now().await;
        }

        let duplicate = search
            .search(Query::new(" abc ", SearchTab::Albums, None))
            .await
            .unwrap();
        assert_eq!(duplicate, SearchOutcome::Duplicate);
        assert_eq!(search.version().await, 1);

        release.send(()).unwrap();
        assert_eq!(first.await.unwrap().unwrap(), SearchOutcome::Committed);
        assert_eq!(catalog.calls().len(), 1);
        assert!(search.in_flight().await.is_none());
    }

    #[tokio::test]
    async fn test_current_failure_surfaces_and_keeps_results() {
        let catalog = Arc::new(MockCatalog::new(0));
        catalog.push(albums_reply("a", 4, 4));
        catalog.push(Reply::Fail("503 Service Unavailable".to_string()));
        let search = controller(catalog);

        search.search(Query::new("abc", SearchTab::Albums, None)).await.unwrap();
        let error = search
            .search(Query::new("abc", SearchTab::Albums, None))
            .await
            .unwrap_err();
        assert!(matches!(error, SearchError::NetworkFailure { .. }));
        assert_eq!(search.phase().await, SearchPhase::Errored);
        assert_eq!(search.read(|s| s.len(Category::Albums)).await, 4);
        assert!(search.read(|s| s.error.is_some()).await);
    }

    #[tokio::test]
    async fn test_stale_failure_is_swallowed() {
        let catalog = Arc::new(MockCatalog::new(10));
        let release = catalog.push_gated(Reply::Fail("timeout".to_string()));
        let search = controller(catalog.clone());

        let first = tokio::spawn({
            let search = search.clone();
            async move { search.search(Query::new("abc", SearchTab::Tracks, None)).await }
        });
        while catalog.calls().is_empty() {
            tokio::task::yield_now().await;
        }
        search.search(Query::new("abcd", SearchTab::Tracks, None)).await.unwrap();

        release.send(()).unwrap();
        assert_eq!(first.await.unwrap().unwrap(), SearchOutcome::Stale);
        assert!(search.read(|s| s.error.is_none()).await);
        assert_eq!(search.phase().await, SearchPhase::Settled);
    }

    #[tokio::test]
    async fn test_failed_load_more_keeps_items_and_retries() {
        let catalog = Arc::new(MockCatalog::new(0));
        catalog.push(albums_reply("a", 20, 60));
        catalog.push(Reply::Fail("connection reset".to_string()));
        let search = controller(catalog.clone());
        search.search(Query::new("abc", SearchTab::Albums, None)).await.unwrap();

        let error = search.load_more(Category::Albums).await.unwrap_err();
        assert!(matches!(error, SearchError::LoadMoreFailure { category: Category::Albums, .. }));
        assert_eq!(search.read(|s| s.len(Category::Albums)).await, 20);
        assert!(!search.read(|s| s.is_loading_more(Category::Albums)).await);

        // Script is empty now, so the retry gets generated items at offset 20
        let retry = search.load_more(Category::Albums).await;
        assert!(matches!(retry, Ok(LoadMoreOutcome::Appended(_))));
        assert_eq!(catalog.calls()[2].offset, 20);
        assert!(search.read(|s| s.error.is_none()).await);
    }

    #[tokio::test]
    async fn test_second_load_more_while_pending_is_rejected() {
        let catalog = Arc::new(MockCatalog::new(0));
        catalog.push(albums_reply("a", 20, 60));
        let release = catalog.push_gated(Reply::Page(CategoryPage::Albums(ResultPage::new(
            fixtures::albums("b", 20..40),
            60,
            20,
        ))));
        let search = controller(catalog.clone());
        search.search(Query::new("abc", SearchTab::Albums, None)).await.unwrap();

        let pending = tokio::spawn({
            let search = search.clone();
            async move { search.load_more(Category::Albums).await }
        });
        while catalog.calls().len() < 2 {
            tokio::task::yield_now().await;
        }

        assert_eq!(search.load_more(Category::Albums).await.unwrap(), LoadMoreOutcome::AlreadyLoading);
        release.send(()).unwrap();
        assert_eq!(pending.await.unwrap().unwrap(), LoadMoreOutcome::Appended(20));
        assert_eq!(catalog.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_load_more_rules() {
        let catalog = Arc::new(MockCatalog::new(100));
        let search = controller(catalog);

        // Nothing searched yet
        assert_eq!(search.load_more(Category::Albums).await.unwrap(), LoadMoreOutcome::Unsupported);

        search.search(Query::new("abc", SearchTab::All, None)).await.unwrap();
        assert_eq!(search.load_more(Category::Albums).await.unwrap(), LoadMoreOutcome::Unsupported);

        search.search(Query::new("abc", SearchTab::Albums, None)).await.unwrap();
        assert_eq!(search.load_more(Category::Tracks).await.unwrap(), LoadMoreOutcome::Unsupported);
    }

    #[tokio::test]
    async fn test_clear_discards_in_flight_and_results() {
        let catalog = Arc::new(MockCatalog::new(0));
        catalog.push(albums_reply("a", 3, 3));
        let release = catalog.push_gated(albums_reply("b", 3, 3));
        let search = controller(catalog.clone());
        search.search(Query::new("abc", SearchTab::Albums, None)).await.unwrap();

        let pending = tokio::spawn({
            let search = search.clone();
            async move { search.search(Query::new("abcd", SearchTab::Albums, None)).await }
        });
        while catalog.calls().len() < 2 {
            tokio::task::yield_now().await;
        }

        search.clear().await;
        release.send(()).unwrap();
        assert_eq!(pending.await.unwrap().unwrap(), SearchOutcome::Stale);
        assert_eq!(search.read(|s| s.len(Category::Albums)).await, 0);
        assert!(search.current_query().await.is_empty());
        assert_eq!(search.phase().await, SearchPhase::Idle);
    }

    #[tokio::test]
    async fn test_empty_query_clears() {
        let catalog = Arc::new(MockCatalog::new(10));
        let search = controller(catalog.clone());
        let outcome = search.search(Query::new("   ", SearchTab::Albums, None)).await.unwrap();
        assert_eq!(outcome, SearchOutcome::Cleared);
        assert!(catalog.calls().is_empty());
    }

    #[tokio::test]
    async fn test_combined_search_keeps_previous_pick() {
        let pick = MostPopular::Artist(fixtures::artist("ar1", "X"));
        let catalog = Arc::new(MockCatalog::new(0));
        catalog.push(Reply::All(combined(Some(pick.clone()))));
        catalog.push(Reply::All(combined(None)));
        let search = controller(catalog.clone());

        search.search(Query::new("x", SearchTab::All, None)).await.unwrap();
        search.search(Query::new("X", SearchTab::All, None)).await.unwrap();

        let kept = search
            .read(|s| s.combined.as_ref().and_then(|c| c.most_popular.clone()))
            .await;
        assert_eq!(kept, Some(pick));
        assert_eq!(catalog.calls().len(), 2);
        assert!(catalog.calls().iter().all(|c| c.category.is_none()));
    }

    #[tokio::test]
    async fn test_filter_is_forwarded() {
        let catalog = Arc::new(MockCatalog::new(5));
        let search = controller(catalog.clone());
        let query = Query::new("bach", SearchTab::Tracks, Some(crate::model::FacetFilter::Composer));
        search.search(query).await.unwrap();
        assert_eq!(catalog.calls()[0].filter, Some(crate::model::FacetFilter::Composer));
    }

    #[tokio::test]
    async fn test_snapshot_restore_resumes_and_invalidates() {
        let catalog = Arc::new(MockCatalog::new(50));
        let search = controller(catalog.clone());
        search.search(Query::new("abc", SearchTab::Albums, None)).await.unwrap();
        search.load_more(Category::Albums).await.unwrap();
        let snapshot = search.snapshot().await;

        search.clear().await;
        assert_eq!(search.read(|s| s.len(Category::Albums)).await, 0);

        let version_before = search.version().await;
        search.restore(snapshot).await;
        assert!(search.version().await > version_before);
        assert_eq!(search.read(|s| s.len(Category::Albums)).await, 40);
        assert_eq!(search.current_query().await.text(), "abc");
        assert_eq!(search.load_more(Category::Albums).await.unwrap(), LoadMoreOutcome::Appended(10));
    }

    #[tokio::test]
    async fn test_filter_change_drops_unfiltered_results() {
        let catalog = Arc::new(MockCatalog::new(137));
        let search = controller(catalog);
        search.search(Query::new("bach", SearchTab::Albums, None)).await.unwrap();

        let composer = Query::new("bach", SearchTab::Tracks, Some(crate::model::FacetFilter::Composer));
        search.search(composer).await.unwrap();

        let albums = search
            .read(|s| (s.len(Category::Albums), s.total(Category::Albums)))
            .await;
        assert_eq!(albums, (0, 0));
        assert_eq!(search.read(|s| s.len(Category::Tracks)).await, 20);
    }

    #[tokio::test]
    async fn test_resume_keeps_loaded_pages() {
        let catalog = Arc::new(MockCatalog::new(137));
        let search = controller(catalog.clone());
        let albums = Query::new("radiohead", SearchTab::Albums, None);
        search.search(albums.clone()).await.unwrap();
        search.load_more(Category::Albums).await.unwrap();
        search.search(Query::new("radiohead", SearchTab::Tracks, None)).await.unwrap();

        assert!(search.resume(albums.clone()).await);
        assert_eq!(search.current_query().await, albums);
        assert_eq!(search.read(|s| s.len(Category::Albums)).await, 40);
        assert_eq!(search.load_more(Category::Albums).await.unwrap(), LoadMoreOutcome::Appended(20));
        assert_eq!(catalog.calls().last().unwrap().offset, 40);

        // Never fetched for this tab, or fetched under another filter
        assert!(!search.resume(Query::new("radiohead", SearchTab::Artists, None)).await);
        let filtered = Query::new("radiohead", SearchTab::Albums, Some(crate::model::FacetFilter::Label));
        assert!(!search.resume(filtered).await);
    }

    #[tokio::test]
    async fn test_resume_makes_in_flight_search_stale() {
        let catalog = Arc::new(MockCatalog::new(0));
        catalog.push(albums_reply("a", 3, 3));
        let release = catalog.push_gated(Reply::Page(CategoryPage::Tracks(ResultPage::new(
            vec![fixtures::track("t1", "Creep", "Radiohead")],
            1,
            0,
        ))));
        let search = controller(catalog.clone());
        let albums = Query::new("abc", SearchTab::Albums, None);
        search.search(albums.clone()).await.unwrap();

        let pending = tokio::spawn({
            let search = search.clone();
            async move { search.search(Query::new("abc", SearchTab::Tracks, None)).await }
        });
        while catalog.calls().len() < 2 {
            tokio::task::yield_now().await;
        }

        assert!(search.resume(albums).await);
        release.send(()).unwrap();
        assert_eq!(pending.await.unwrap().unwrap(), SearchOutcome::Stale);
        assert_eq!(search.phase().await, SearchPhase::Settled);
        assert_eq!(search.read(|s| s.len(Category::Tracks)).await, 0);
    }
}
