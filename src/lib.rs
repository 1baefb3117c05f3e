//! Search-as-you-type over a remote music catalog, with versioned sessions,
//! accumulated pagination, virtualized result rendering and best-effort
//! per-item status enrichment.

pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod model;
pub mod view;
