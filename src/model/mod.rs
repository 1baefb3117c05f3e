//! Model module - search data types and state containers
//!
//! - `types`: Tabs, categories, facet filters, the query value, UI state
//! - `content`: Catalog item types and the combined "all" payload
//! - `pagination`: Page accumulation (`ResultPage`, `ResultSet`)
//! - `store`: Per-category result store consumed by rendering
//! - `status`: Status probes and the best-effort status map
//! - `downloads`: File-backed download index probe
//! - `catalog`: The remote catalog trait
//! - `spotify_client`: Spotify implementation of the catalog

mod types;
mod content;
mod pagination;
mod store;
mod status;
mod downloads;
mod catalog;
mod spotify_client;

pub use types::{normalize_text, Category, FacetFilter, Query, SearchTab, TabView, UiState};

pub use content::{
    CatalogItem, CombinedResults, MostPopular, SearchAlbum, SearchArtist, SearchPlaylist,
    SearchTrack,
};

pub use pagination::{append_page, has_more, ResultPage, ResultSet};

pub use store::ResultStore;

pub use status::{StatusMap, StatusProbe};

pub use downloads::{DownloadIndex, DOWNLOAD_INDEX_FILE};

pub use catalog::{fetch_category, CatalogApi, CategoryPage};

pub use spotify_client::{filtered_query, SpotifyCatalog};

#[cfg(test)]
pub(crate) use catalog::mock;
#[cfg(test)]
pub(crate) use content::fixtures;
