//! Tunables for the search engine, with environment overrides

use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_MIN_QUERY_LEN: usize = 2;
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const DEFAULT_COMBINED_PAGE_SIZE: u32 = 8;
pub const DEFAULT_OVERSCAN_ROWS: usize = 5;
pub const DEFAULT_ENRICH_CONCURRENCY: usize = 10;
pub const DEFAULT_PREFETCH_ROWS: usize = 2;

const ENV_PREFIX: &str = "CATALOG_SEARCH_";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    /// Quiet period before a text change turns into a search
    pub debounce: Duration,
    /// Normalized queries shorter than this clear results instead of searching
    pub min_query_len: usize,
    /// Page size for single-category searches and load-more
    pub page_size: u32,
    /// Page size of each category inside the combined "all" response
    pub combined_page_size: u32,
    pub overscan_rows: usize,
    pub enrich_concurrency: usize,
    /// Extra rows past the overscan whose items are enriched ahead of time
    pub prefetch_rows: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            min_query_len: DEFAULT_MIN_QUERY_LEN,
            page_size: DEFAULT_PAGE_SIZE,
            combined_page_size: DEFAULT_COMBINED_PAGE_SIZE,
            overscan_rows: DEFAULT_OVERSCAN_ROWS,
            enrich_concurrency: DEFAULT_ENRICH_CONCURRENCY,
            prefetch_rows: DEFAULT_PREFETCH_ROWS,
        }
    }
}

impl SearchConfig {
    /// Build a config from defaults overridden by `CATALOG_SEARCH_*` variables.
    ///
    /// Recognized: `DEBOUNCE_MS`, `MIN_QUERY_LEN`, `PAGE_SIZE`,
    /// `COMBINED_PAGE_SIZE`, `OVERSCAN_ROWS`, `ENRICH_CONCURRENCY`,
    /// `PREFETCH_ROWS`. Unparseable values are logged and skipped.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(ms) = parse_var::<u64, _>(&lookup, "DEBOUNCE_MS") {
            config.debounce = Duration::from_millis(ms);
        }
        if let Some(len) = parse_var(&lookup, "MIN_QUERY_LEN") {
            config.min_query_len = len;
        }
        if let Some(size) = parse_var::<u32, _>(&lookup, "PAGE_SIZE") {
            config.page_size = size.max(1);
        }
        if let Some(size) = parse_var::<u32, _>(&lookup, "COMBINED_PAGE_SIZE") {
            config.combined_page_size = size.max(1);
        }
        if let Some(rows) = parse_var(&lookup, "OVERSCAN_ROWS") {
            config.overscan_rows = rows;
        }
        if let Some(n) = parse_var::<usize, _>(&lookup, "ENRICH_CONCURRENCY") {
            config.enrich_concurrency = n.max(1);
        }
        if let Some(rows) = parse_var(&lookup, "PREFETCH_ROWS") {
            config.prefetch_rows = rows;
        }

        tracing::debug!(config = ?config, "Search config loaded");
        config
    }
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let key = format!("{ENV_PREFIX}{name}");
    let raw = lookup(&key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key = %key, value = %raw, "Ignoring invalid config value");
            None
        }
    }
}
