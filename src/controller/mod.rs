//! Controller module - search orchestration and event handling
//!
//! - `debounce`: Debounce gate between keystrokes and searches
//! - `session`: Versioned search sessions and pagination
//! - `enrich`: Status side-channel for visible items
//! - `input`: Key event handling

mod debounce;
mod enrich;
mod input;
mod session;

pub use debounce::{DebounceGate, GateEvent};
pub use enrich::StatusSideChannel;
pub use session::{LoadMoreOutcome, SearchController, SearchOutcome, SearchPhase, SearchSnapshot};

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::model::{
    CatalogApi, CatalogItem, Category, DownloadIndex, Query, ResultStore, SearchTab, StatusMap,
    TabView, UiState,
};
use crate::view::RenderReport;

#[derive(Clone)]
pub struct AppController {
    pub(crate) search: SearchController,
    pub(crate) ui: Arc<Mutex<UiState>>,
    gate: Arc<Mutex<DebounceGate>>,
    downloads: StatusSideChannel<DownloadIndex>,
    last_enriched: Arc<Mutex<Vec<String>>>,
    /// Session and tab views from before the last Esc-clear
    undo: Arc<Mutex<Option<(SearchSnapshot, [TabView; 5])>>>,
}

impl AppController {
    /// Returns the controller and the receiver of debounced text changes,
    /// which the event loop feeds back through `handle_gate_event`.
    pub fn new(
        catalog: Arc<dyn CatalogApi>,
        downloads: Arc<DownloadIndex>,
        config: SearchConfig,
    ) -> (Self, mpsc::UnboundedReceiver<GateEvent>) {
        let (gate, rx) = DebounceGate::new(config.debounce, config.min_query_len);
        let controller = Self {
            downloads: StatusSideChannel::new(downloads, config.enrich_concurrency),
            search: SearchController::new(catalog, config),
            ui: Arc::new(Mutex::new(UiState::default())),
            gate: Arc::new(Mutex::new(gate)),
            last_enriched: Arc::new(Mutex::new(Vec::new())),
            undo: Arc::new(Mutex::new(None)),
        };
        (controller, rx)
    }

    pub fn config(&self) -> &SearchConfig {
        self.search.config()
    }

    pub async fn ui_state(&self) -> UiState {
        self.ui.lock().await.clone()
    }

    pub async fn should_quit(&self) -> bool {
        self.ui.lock().await.should_quit
    }

    pub async fn search_phase(&self) -> SearchPhase {
        self.search.phase().await
    }

    pub async fn statuses(&self) -> StatusMap<String, bool> {
        self.downloads.snapshot().await
    }

    /// Render against the result store without cloning it
    pub async fn with_store<R>(&self, f: impl FnOnce(&ResultStore) -> R) -> R {
        self.search.read(f).await
    }

    /// Push the current input text through the debounce gate
    pub(crate) async fn input_changed(&self) {
        let text = {
            let mut ui = self.ui.lock().await;
            ui.debouncing = true;
            ui.input.clone()
        };
        self.gate.lock().await.on_text_changed(&text);
    }

    pub async fn handle_gate_event(&self, event: GateEvent) -> Option<JoinHandle<()>> {
        match event {
            GateEvent::Search(text) => {
                let query = {
                    let mut ui = self.ui.lock().await;
                    ui.debouncing = false;
                    Query::new(text, ui.tab, ui.filter)
                };
                Some(self.spawn_search(query))
            }
            GateEvent::Clear => {
                {
                    let mut ui = self.ui.lock().await;
                    ui.debouncing = false;
                    ui.reset_views();
                }
                self.search.clear().await;
                self.last_enriched.lock().await.clear();
                None
            }
        }
    }

    /// Search right away with the current input, tab and filter
    pub(crate) async fn search_now(&self) -> Option<JoinHandle<()>> {
        self.gate.lock().await.cancel();
        let query = {
            let mut ui = self.ui.lock().await;
            ui.debouncing = false;
            ui.query()
        };
        if query.len() < self.config().min_query_len {
            return None;
        }
        Some(self.spawn_search(query))
    }

    pub(crate) fn spawn_search(&self, query: Query) -> JoinHandle<()> {
        let controller = self.clone();
        tokio::spawn(async move {
            controller.run_search(query).await;
        })
    }

    async fn run_search(&self, query: Query) {
        let previous = self.search.current_query().await;
        if previous.text() != query.text() || previous.filter() != query.filter() {
            let mut ui = self.ui.lock().await;
            let view = ui.view_mut();
            view.scroll_top = 0;
            view.selected = 0;
        }

        match self.search.search(query).await {
            Ok(outcome) => tracing::debug!(outcome = ?outcome, "Search finished"),
            // Already held by the store and shown inline
            Err(e) => tracing::debug!(error = %e, "Search failed"),
        }
    }

    pub(crate) fn spawn_load_more(&self, category: Category) -> JoinHandle<()> {
        let controller = self.clone();
        tokio::spawn(async move {
            match controller.search.load_more(category).await {
                Ok(outcome) => tracing::debug!(category = %category, outcome = ?outcome, "Load more finished"),
                Err(e) => tracing::debug!(category = %category, error = %e, "Load more failed"),
            }
        })
    }

    pub(crate) async fn switch_tab(&self, tab: SearchTab) {
        let query = {
            let mut ui = self.ui.lock().await;
            if ui.tab == tab {
                return;
            }
            ui.tab = tab;
            ui.follow_selection = false;
            ui.query()
        };

        // Coming back to a tab keeps the pages and scroll position it had
        if self.search.resume(query).await {
            self.gate.lock().await.cancel();
            self.ui.lock().await.debouncing = false;
            return;
        }
        self.search_now().await;
    }

    pub(crate) async fn cycle_filter(&self) {
        {
            let mut ui = self.ui.lock().await;
            ui.filter = crate::model::FacetFilter::cycle(ui.filter);
            tracing::debug!(filter = ?ui.filter, "Filter changed");
        }
        self.search_now().await;
    }

    /// Re-issue whatever failed last: the load-more, or the search itself
    pub(crate) async fn retry(&self) -> Option<JoinHandle<()>> {
        let error = self.search.read(|store| store.error.clone()).await?;
        tracing::info!(error = %error, "Retrying after failure");
        match error {
            SearchError::LoadMoreFailure { category, .. } => Some(self.spawn_load_more(category)),
            SearchError::NetworkFailure { .. } => self.search_now().await,
        }
    }

    /// Number of selectable items on the active tab
    pub(crate) async fn item_count(&self, tab: SearchTab) -> usize {
        match tab.category() {
            Some(category) => self.search.read(|store| store.len(category)).await,
            None => 0,
        }
    }

    /// Feed back what the last frame showed: scroll position, load-more
    /// trigger and the keys worth enriching.
    pub async fn after_render(&self, report: &RenderReport) {
        {
            let mut ui = self.ui.lock().await;
            if ui.tab != report.tab {
                return;
            }
            ui.view_mut().scroll_top = report.scroll_top;
            ui.follow_selection = false;
            ui.columns = report.columns;
            ui.page_items = report.page_items;
        }

        if report.sentinel_visible {
            if let Some(category) = report.tab.category() {
                let ready = self
                    .search
                    .read(|store| {
                        store.error.is_none()
                            && store.has_more(category)
                            && !store.is_loading_more(category)
                    })
                    .await;
                if ready {
                    self.spawn_load_more(category);
                }
            }
        }

        self.enrich_visible(report).await;
    }

    async fn enrich_visible(&self, report: &RenderReport) -> Option<JoinHandle<()>> {
        let prefetch = self.config().prefetch_rows * report.columns.max(1);
        let range = report.visible_items.start..report.visible_items.end + prefetch;

        let keys = match report.tab {
            SearchTab::Albums => self.search.read(|store| store.keys(Category::Albums, range)).await,
            SearchTab::All => {
                self.search
                    .read(|store| {
                        store
                            .combined
                            .as_ref()
                            .map(|c| c.albums.items.iter().map(|a| a.key().to_string()).collect::<Vec<_>>())
                            .unwrap_or_default()
                    })
                    .await
            }
            _ => return None,
        };

        {
            let mut last = self.last_enriched.lock().await;
            if keys.is_empty() || *last == keys {
                return None;
            }
            *last = keys.clone();
        }
        Some(self.downloads.spawn_enrich(keys))
    }

    /// Re-read the download index and probe the visible albums again.
    /// A broken index is logged and only costs the badges.
    pub async fn reload_downloads(&self) {
        match self.downloads.probe().load_from_disk().await {
            Ok(()) => {
                self.downloads.invalidate().await;
                self.last_enriched.lock().await.clear();
                tracing::info!("Download index reloaded");
            }
            Err(e) => tracing::warn!(error = %e, "Download index unavailable"),
        }
    }

    /// Remember the session before the input is cleared with Esc
    pub(crate) async fn stash_for_undo(&self) {
        let snapshot = self.search.snapshot().await;
        if snapshot.committed.is_none() {
            return;
        }
        let views = self.ui.lock().await.views;
        *self.undo.lock().await = Some((snapshot, views));
    }

    /// Bring back the session cleared by the last Esc, if the input is
    /// still empty
    pub(crate) async fn undo_clear(&self) -> bool {
        if !self.ui.lock().await.input.is_empty() {
            return false;
        }
        let Some((snapshot, views)) = self.undo.lock().await.take() else {
            return false;
        };

        self.gate.lock().await.cancel();
        {
            let mut ui = self.ui.lock().await;
            ui.input = snapshot.query.raw().to_string();
            ui.tab = snapshot.query.tab();
            ui.filter = snapshot.query.filter();
            ui.views = views;
            ui.debouncing = false;
        }
        tracing::debug!(query = %snapshot.query.text(), "Restoring cleared search");
        self.search.restore(snapshot).await;
        self.last_enriched.lock().await.clear();
        true
    }
}
