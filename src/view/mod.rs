//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! It is organized into submodules by component type:
//!
//! - `virtual_list`: Row tables and visible-range queries for long result sets
//! - `utils`: Shared formatting and clipped drawing helpers
//! - `layout`: Search bar, tab bar and status line
//! - `content`: Result area (track list, card grids, combined view)
//! - `overlays`: Help overlay

pub mod virtual_list;
mod utils;
mod layout;
mod content;
mod overlays;

use std::ops::Range;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::model::{ResultStore, SearchTab, StatusMap, UiState};
use virtual_list::VirtualList;

pub use utils::format_error;

/// Borrowed state a frame is drawn from
pub struct RenderContext<'a> {
    pub ui: &'a UiState,
    pub store: &'a ResultStore,
    pub statuses: &'a StatusMap<String, bool>,
    /// A first-page fetch is in flight
    pub searching: bool,
    pub overscan: usize,
}

/// What the last frame actually showed, fed back to the controller
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderReport {
    pub tab: SearchTab,
    /// Scroll offset after clamping and following the selection
    pub scroll_top: u32,
    /// Items materialized, overscan included
    pub visible_items: Range<usize>,
    pub sentinel_visible: bool,
    pub columns: usize,
    pub page_items: usize,
    pub viewport_height: u32,
}

/// Per-tab virtual lists kept across frames so layout passes only run when
/// the inputs change
pub struct ViewCache {
    lists: [VirtualList; 5],
    overscan: usize,
}

impl ViewCache {
    pub fn new(overscan: usize) -> Self {
        Self {
            lists: std::array::from_fn(|_| VirtualList::new(overscan)),
            overscan,
        }
    }

    pub fn overscan(&self) -> usize {
        self.overscan
    }

    pub fn list(&self, tab: SearchTab) -> &VirtualList {
        &self.lists[tab.index()]
    }
}

pub struct AppView;

impl AppView {
    pub fn render(frame: &mut Frame, ctx: &RenderContext, cache: &mut ViewCache) -> RenderReport {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Search bar + filter
                Constraint::Length(1), // Tabs
                Constraint::Min(0),    // Results
                Constraint::Length(1), // Status line
            ])
            .split(frame.area());

        layout::render_top_bar(frame, chunks[0], ctx.ui);
        layout::render_tab_bar(frame, chunks[1], ctx.ui, ctx.store);
        let report = content::render_results(frame, chunks[2], ctx, &mut cache.lists);
        layout::render_status_line(frame, chunks[3], ctx.ui, ctx.store, ctx.searching);

        if ctx.ui.show_help_popup {
            overlays::render_help_popup(frame);
        }

        report
    }
}
