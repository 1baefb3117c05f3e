//! The user-visible failure class of the search engine
//!
//! Stale results, drifting totals and failed status lookups are absorbed
//! internally and never become a `SearchError`.

use crate::model::Category;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// The search for the current query could not be fetched
    #[error("search for \"{query}\" failed: {message}")]
    NetworkFailure { query: String, message: String },

    /// A load-more for the current query failed; earlier pages are kept
    #[error("loading more {category} failed: {message}")]
    LoadMoreFailure { category: Category, message: String },
}

impl SearchError {
    pub fn network(query: &str, error: &anyhow::Error) -> Self {
        Self::NetworkFailure {
            query: query.to_string(),
            message: format!("{error:#}"),
        }
    }

    pub fn load_more(category: Category, error: &anyhow::Error) -> Self {
        Self::LoadMoreFailure {
            category,
            message: format!("{error:#}"),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::NetworkFailure { message, .. } | Self::LoadMoreFailure { message, .. } => message,
        }
    }
}
