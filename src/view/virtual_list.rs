//! Virtualized list and grid layout
//!
//! A layout pass turns an item count plus layout parameters into a row table:
//! parallel `tops` / `heights` arrays with an optional trailing load-more
//! sentinel row. Scrolling only runs two binary searches over that table, so
//! the cost of a scroll event does not depend on how many items are loaded.
//!
//! Units are whatever the renderer measures in (terminal cells here).

use std::ops::Range;

/// Default number of rows materialized beyond each edge of the viewport
pub const DEFAULT_OVERSCAN: usize = 5;

/// How items are arranged into rows
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutMode {
    /// One item per row
    List { row_height: u32 },
    /// Cards wrapped into as many columns as fit the container width
    Grid {
        card_width: u32,
        card_height: u32,
        gap: u32,
    },
}

/// Everything a layout pass depends on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutParams {
    pub mode: LayoutMode,
    pub item_count: usize,
    pub container_width: u32,
    /// Append a load-more sentinel row after the last item row
    pub has_more: bool,
    pub sentinel_height: u32,
}

impl LayoutParams {
    pub fn columns(&self) -> usize {
        match self.mode {
            LayoutMode::List { .. } => 1,
            LayoutMode::Grid { card_width, gap, .. } => {
                column_count(self.container_width, card_width, gap)
            }
        }
    }

    fn row_height(&self) -> u32 {
        match self.mode {
            LayoutMode::List { row_height } => row_height,
            LayoutMode::Grid { card_height, gap, .. } => card_height + gap,
        }
    }

    /// The parts of the params that actually change the row table
    fn key(&self) -> LayoutKey {
        LayoutKey {
            mode: self.mode,
            item_count: self.item_count,
            columns: self.columns(),
            has_more: self.has_more,
            sentinel_height: self.sentinel_height,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct LayoutKey {
    mode: LayoutMode,
    item_count: usize,
    columns: usize,
    has_more: bool,
    sentinel_height: u32,
}

/// `max(1, floor((container_width + gap) / (card_width + gap)))`
pub fn column_count(container_width: u32, card_width: u32, gap: u32) -> usize {
    let slot = card_width.saturating_add(gap).max(1);
    let fit = container_width.saturating_add(gap) / slot;
    (fit as usize).max(1)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VirtualKind {
    Row,
    LoadMoreSentinel,
}

/// One renderable row: which items it holds and where it sits
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VirtualItem {
    pub kind: VirtualKind,
    pub start_index: usize,
    pub count: usize,
    pub top: u32,
    pub height: u32,
}

impl VirtualItem {
    pub fn bottom(&self) -> u32 {
        self.top + self.height
    }

    pub fn items(&self) -> Range<usize> {
        self.start_index..self.start_index + self.count
    }
}

/// Output of a layout pass
#[derive(Clone, Debug, Default)]
pub struct RowTable {
    rows: Vec<VirtualItem>,
    tops: Vec<u32>,
    heights: Vec<u32>,
    total_height: u32,
    columns: usize,
}

impl RowTable {
    pub fn build(params: &LayoutParams) -> Self {
        let columns = params.columns();
        let row_height = params.row_height();
        let item_rows = params.item_count.div_ceil(columns);

        let mut rows = Vec::with_capacity(item_rows + usize::from(params.has_more));
        let mut top = 0u32;
        for row in 0..item_rows {
            let start_index = row * columns;
            let count = columns.min(params.item_count - start_index);
            rows.push(VirtualItem {
                kind: VirtualKind::Row,
                start_index,
                count,
                top,
                height: row_height,
            });
            top += row_height;
        }

        if params.has_more {
            rows.push(VirtualItem {
                kind: VirtualKind::LoadMoreSentinel,
                start_index: params.item_count,
                count: 0,
                top,
                height: params.sentinel_height,
            });
        }

        Self::from_rows(rows, columns)
    }

    fn from_rows(rows: Vec<VirtualItem>, columns: usize) -> Self {
        let tops: Vec<u32> = rows.iter().map(|r| r.top).collect();
        let heights: Vec<u32> = rows.iter().map(|r| r.height).collect();
        let total_height = rows.last().map(|r| r.bottom()).unwrap_or(0);
        Self {
            rows,
            tops,
            heights,
            total_height,
            columns,
        }
    }

    /// Rows with arbitrary heights stacked in order; used for mixed layouts
    pub fn from_heights(heights: &[u32]) -> Self {
        let mut top = 0;
        let rows = heights
            .iter()
            .enumerate()
            .map(|(i, &height)| {
                let row = VirtualItem {
                    kind: VirtualKind::Row,
                    start_index: i,
                    count: 1,
                    top,
                    height,
                };
                top += height;
                row
            })
            .collect();
        Self::from_rows(rows, 1)
    }

    pub fn rows(&self) -> &[VirtualItem] {
        &self.rows
    }

    pub fn tops(&self) -> &[u32] {
        &self.tops
    }

    pub fn heights(&self) -> &[u32] {
        &self.heights
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total_height(&self) -> u32 {
        self.total_height
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// First row whose bottom edge lies below `scroll_top`; `len()` if none
    pub fn lower_bound(&self, scroll_top: u32) -> usize {
        let (mut lo, mut hi) = (0, self.tops.len());
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.tops[mid] + self.heights[mid] <= scroll_top {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        lo
    }

    /// One past the last row at or after `from` whose top is `<= limit`
    pub fn upper_bound(&self, from: usize, limit: u32) -> usize {
        let (mut lo, mut hi) = (from.min(self.tops.len()), self.tops.len());
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.tops[mid] <= limit {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        lo
    }

    /// Rows overlapping `[scroll_top, scroll_top + viewport_height]`, widened
    /// by `overscan` rows on both sides and clamped to the table.
    pub fn visible_range(&self, scroll_top: u32, viewport_height: u32, overscan: usize) -> Range<usize> {
        let len = self.rows.len();
        if len == 0 {
            return 0..0;
        }

        // Scrolled past the end (e.g. the table shrank): anchor on the last row
        let first = self.lower_bound(scroll_top).min(len - 1);
        let end = self
            .upper_bound(first, scroll_top.saturating_add(viewport_height))
            .max(first + 1);

        first.saturating_sub(overscan)..(end + overscan).min(len)
    }

    /// Row holding item `index`, if it is laid out
    pub fn row_of_item(&self, index: usize) -> Option<usize> {
        if self.columns == 0 {
            return None;
        }
        let row = index / self.columns;
        match self.rows.get(row) {
            Some(r) if r.kind == VirtualKind::Row && r.items().contains(&index) => Some(row),
            _ => None,
        }
    }
}

/// A row table cached across scroll events, rebuilt only when the layout
/// inputs change
#[derive(Clone, Debug)]
pub struct VirtualList {
    key: Option<LayoutKey>,
    table: RowTable,
    overscan: usize,
    layout_passes: usize,
}

impl Default for VirtualList {
    fn default() -> Self {
        Self::new(DEFAULT_OVERSCAN)
    }
}

impl VirtualList {
    pub fn new(overscan: usize) -> Self {
        Self {
            key: None,
            table: RowTable::default(),
            overscan,
            layout_passes: 0,
        }
    }

    /// Feed the current layout inputs; returns true if a layout pass ran
    pub fn update(&mut self, params: &LayoutParams) -> bool {
        let key = params.key();
        if self.key == Some(key) {
            return false;
        }

        self.table = RowTable::build(params);
        self.key = Some(key);
        self.layout_passes += 1;
        tracing::trace!(
            items = params.item_count,
            columns = self.table.columns(),
            rows = self.table.len(),
            total_height = self.table.total_height(),
            "Layout pass"
        );
        true
    }

    pub fn table(&self) -> &RowTable {
        &self.table
    }

    pub fn layout_passes(&self) -> usize {
        self.layout_passes
    }

    pub fn total_height(&self) -> u32 {
        self.table.total_height()
    }

    pub fn columns(&self) -> usize {
        self.table.columns()
    }

    /// Row range to materialize for the viewport
    pub fn visible(&self, scroll_top: u32, viewport_height: u32) -> Range<usize> {
        self.table.visible_range(scroll_top, viewport_height, self.overscan)
    }

    pub fn rows(&self, range: Range<usize>) -> &[VirtualItem] {
        &self.table.rows()[range]
    }

    /// Item indices covered by a row range
    pub fn item_range(&self, rows: Range<usize>) -> Range<usize> {
        let slice = self.rows(rows);
        match (slice.first(), slice.iter().rev().find(|r| r.kind == VirtualKind::Row)) {
            (Some(first), Some(last)) => first.start_index..last.start_index + last.count,
            _ => 0..0,
        }
    }

    pub fn sentinel_visible(&self, rows: Range<usize>) -> bool {
        self.rows(rows)
            .iter()
            .any(|r| r.kind == VirtualKind::LoadMoreSentinel)
    }

    /// Largest meaningful scroll offset for the viewport
    pub fn clamp_scroll(&self, scroll_top: u32, viewport_height: u32) -> u32 {
        scroll_top.min(self.total_height().saturating_sub(viewport_height))
    }

    /// Scroll offset that brings item `index` fully into view, moving as
    /// little as possible
    pub fn ensure_visible(&self, index: usize, scroll_top: u32, viewport_height: u32) -> u32 {
        let Some(row) = self.table.row_of_item(index) else {
            return scroll_top;
        };
        let row = self.table.rows()[row];

        if row.top < scroll_top {
            row.top
        } else if row.bottom() > scroll_top + viewport_height {
            row.bottom().saturating_sub(viewport_height)
        } else {
            scroll_top
        }
    }
}
