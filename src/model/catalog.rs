//! The remote catalog as seen by the search engine

use anyhow::Result;
use async_trait::async_trait;

use super::content::{CombinedResults, SearchAlbum, SearchArtist, SearchPlaylist, SearchTrack};
use super::pagination::ResultPage;
use super::types::{Category, FacetFilter};

/// Remote catalog search operations.
///
/// Totals are server-declared and may be approximate.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn search_albums(
        &self,
        query: &str,
        limit: u32,
        offset: u32,
        filter: Option<FacetFilter>,
    ) -> Result<ResultPage<SearchAlbum>>;

    async fn search_tracks(
        &self,
        query: &str,
        limit: u32,
        offset: u32,
        filter: Option<FacetFilter>,
    ) -> Result<ResultPage<SearchTrack>>;

    async fn search_artists(
        &self,
        query: &str,
        limit: u32,
        offset: u32,
        filter: Option<FacetFilter>,
    ) -> Result<ResultPage<SearchArtist>>;

    async fn search_playlists(
        &self,
        query: &str,
        limit: u32,
        offset: u32,
        filter: Option<FacetFilter>,
    ) -> Result<ResultPage<SearchPlaylist>>;

    /// One round trip covering every category plus the most-popular pick
    async fn search_all(&self, query: &str) -> Result<CombinedResults>;
}

/// A page for one category, so callers can route it without generics
#[derive(Clone, Debug)]
pub enum CategoryPage {
    Albums(ResultPage<SearchAlbum>),
    Tracks(ResultPage<SearchTrack>),
    Artists(ResultPage<SearchArtist>),
    Playlists(ResultPage<SearchPlaylist>),
}

impl CategoryPage {
    pub fn category(&self) -> Category {
        match self {
            Self::Albums(_) => Category::Albums,
            Self::Tracks(_) => Category::Tracks,
            Self::Artists(_) => Category::Artists,
            Self::Playlists(_) => Category::Playlists,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Albums(p) => p.items.len(),
            Self::Tracks(p) => p.items.len(),
            Self::Artists(p) => p.items.len(),
            Self::Playlists(p) => p.items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn total(&self) -> usize {
        match self {
            Self::Albums(p) => p.total,
            Self::Tracks(p) => p.total,
            Self::Artists(p) => p.total,
            Self::Playlists(p) => p.total,
        }
    }
}

/// Fetch one page of `category` through the matching catalog operation
pub async fn fetch_category(
    api: &dyn CatalogApi,
    category: Category,
    query: &str,
    limit: u32,
    offset: usize,
    filter: Option<FacetFilter>,
) -> Result<CategoryPage> {
    let offset = u32::try_from(offset)?;
    crate::log_api_request!("fetch_category", category = %category, query, limit, offset);

    let result = match category {
        Category::Albums => api
            .search_albums(query, limit, offset, filter)
            .await
            .map(CategoryPage::Albums),
        Category::Tracks => api
            .search_tracks(query, limit, offset, filter)
            .await
            .map(CategoryPage::Tracks),
        Category::Artists => api
            .search_artists(query, limit, offset, filter)
            .await
            .map(CategoryPage::Artists),
        Category::Playlists => api
            .search_playlists(query, limit, offset, filter)
            .await
            .map(CategoryPage::Playlists),
    };

    crate::log_api_result!("fetch_category", result);
    result
}

#[cfg(test)]
pub(crate) mod mock {
    //! Scriptable in-memory catalog for controller tests

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use tokio::sync::oneshot;

    use super::*;
    use crate::model::content::fixtures;

    #[derive(Clone, Debug, PartialEq)]
    pub struct MockCall {
        /// `None` for the combined search
        pub category: Option<Category>,
        pub query: String,
        pub limit: u32,
        pub offset: u32,
        pub filter: Option<FacetFilter>,
    }

    pub enum Reply {
        Page(CategoryPage),
        All(CombinedResults),
        Fail(String),
    }

    struct Scripted {
        reply: Reply,
        gate: Option<oneshot::Receiver<()>>,
    }

    /// Replies are consumed in call order. With no script left, category
    /// searches get generated items up to `default_total`.
    pub struct MockCatalog {
        calls: Mutex<Vec<MockCall>>,
        script: Mutex<VecDeque<Scripted>>,
        default_total: usize,
    }

    impl MockCatalog {
        pub fn new(default_total: usize) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                script: Mutex::new(VecDeque::new()),
                default_total,
            }
        }

        pub fn push(&self, reply: Reply) {
            self.script.lock().unwrap().push_back(Scripted { reply, gate: None });
        }

        /// Queue a reply that is held back until the returned sender fires
        pub fn push_gated(&self, reply: Reply) -> oneshot::Sender<()> {
            let (tx, rx) = oneshot::channel();
            self.script
                .lock()
                .unwrap()
                .push_back(Scripted { reply, gate: Some(rx) });
            tx
        }

        pub fn calls(&self) -> Vec<MockCall> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: MockCall) -> Option<Scripted> {
            self.calls.lock().unwrap().push(call);
            self.script.lock().unwrap().pop_front()
        }

        async fn resolve(scripted: Scripted) -> Reply {
            if let Some(gate) = scripted.gate {
                let _ = gate.await;
            }
            scripted.reply
        }

        fn generated(&self, category: Category, query: &str, limit: u32, offset: u32) -> CategoryPage {
            let start = offset as usize;
            let end = (start + limit as usize).min(self.default_total).max(start);
            let ids = start..end;
            let total = self.default_total;
            match category {
                Category::Albums => CategoryPage::Albums(ResultPage::new(
                    ids.map(|i| fixtures::album(&format!("al{i}"), &format!("{query} album {i}")))
                        .collect(),
                    total,
                    start,
                )),
                Category::Tracks => CategoryPage::Tracks(ResultPage::new(
                    ids.map(|i| fixtures::track(&format!("t{i}"), &format!("{query} track {i}"), "Artist"))
                        .collect(),
                    total,
                    start,
                )),
                Category::Artists => CategoryPage::Artists(ResultPage::new(
                    ids.map(|i| fixtures::artist(&format!("ar{i}"), &format!("{query} artist {i}")))
                        .collect(),
                    total,
                    start,
                )),
                Category::Playlists => CategoryPage::Playlists(ResultPage::new(
                    ids.map(|i| fixtures::playlist(&format!("p{i}"), &format!("{query} playlist {i}")))
                        .collect(),
                    total,
                    start,
                )),
            }
        }

        async fn category_page(
            &self,
            category: Category,
            query: &str,
            limit: u32,
            offset: u32,
            filter: Option<FacetFilter>,
        ) -> Result<CategoryPage> {
            let call = MockCall {
                category: Some(category),
                query: query.to_string(),
                limit,
                offset,
                filter,
            };
            match self.record(call) {
                None => Ok(self.generated(category, query, limit, offset)),
                Some(scripted) => match Self::resolve(scripted).await {
                    Reply::Page(page) if page.category() == category => Ok(page),
                    Reply::Fail(message) => Err(anyhow!(message)),
                    _ => Err(anyhow!("scripted reply does not match {category} search")),
                },
            }
        }
    }

    #[async_trait]
    impl CatalogApi for MockCatalog {
        async fn search_albums(
            &self,
            query: &str,
            limit: u32,
            offset: u32,
            filter: Option<FacetFilter>,
        ) -> Result<ResultPage<SearchAlbum>> {
            match self.category_page(Category::Albums, query, limit, offset, filter).await? {
                CategoryPage::Albums(page) => Ok(page),
                _ => unreachable!(),
            }
        }

        async fn search_tracks(
            &self,
            query: &str,
            limit: u32,
            offset: u32,
            filter: Option<FacetFilter>,
        ) -> Result<ResultPage<SearchTrack>> {
            match self.category_page(Category::Tracks, query, limit, offset, filter).await? {
                CategoryPage::Tracks(page) => Ok(page),
                _ => unreachable!(),
            }
        }

        async fn search_artists(
            &self,
            query: &str,
            limit: u32,
            offset: u32,
            filter: Option<FacetFilter>,
        ) -> Result<ResultPage<SearchArtist>> {
            match self.category_page(Category::Artists, query, limit, offset, filter).await? {
                CategoryPage::Artists(page) => Ok(page),
                _ => unreachable!(),
            }
        }

        async fn search_playlists(
            &self,
            query: &str,
            limit: u32,
            offset: u32,
            filter: Option<FacetFilter>,
        ) -> Result<ResultPage<SearchPlaylist>> {
            match self.category_page(Category::Playlists, query, limit, offset, filter).await? {
                CategoryPage::Playlists(page) => Ok(page),
                _ => unreachable!(),
            }
        }

        async fn search_all(&self, query: &str) -> Result<CombinedResults> {
            let call = MockCall {
                category: None,
                query: query.to_string(),
                limit: 0,
                offset: 0,
                filter: None,
            };
            match self.record(call) {
                None => Ok(CombinedResults::default()),
                Some(scripted) => match Self::resolve(scripted).await {
                    Reply::All(results) => Ok(results),
                    Reply::Fail(message) => Err(anyhow!(message)),
                    Reply::Page(_) => Err(anyhow!("scripted reply does not match combined search")),
                },
            }
        }
    }
}
