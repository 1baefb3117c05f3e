//! Utility functions for rendering UI components

use ratatui::{
    layout::Rect,
    text::Line,
    widgets::Paragraph,
    Frame,
};

use crate::error::SearchError;

pub fn format_duration(ms: u32) -> String {
    let total_seconds = ms / 1000;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{}:{:02}", minutes, seconds)
}

/// Calculate width needed for index column (log10(n) + padding)
pub fn calculate_num_width(item_count: usize) -> usize {
    if item_count == 0 {
        2
    } else {
        let digits = (item_count as f64).log10().floor() as usize + 1;
        digits + 1
    }
}

pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.chars().count() > max_width {
        let truncated: String = s.chars().take(max_width.saturating_sub(3)).collect();
        format!("{:<width$}", format!("{}...", truncated), width = max_width)
    } else {
        format!("{:<width$}", s, width = max_width)
    }
}

/// Column widths for track rows.
/// Returns (num_width, title_width, artist_width, duration_width)
pub fn track_column_widths(content_width: usize, item_count: usize) -> (usize, usize, usize, usize) {
    // Format: " {num}   {title}   {artist}   {duration}"
    let num_width = calculate_num_width(item_count);
    let duration_width = 6;
    let fixed_width = 1 + num_width + 3 + 3 + 3 + duration_width;
    let remaining_width = content_width.saturating_sub(fixed_width);
    let title_width = (remaining_width * 55) / 100;
    let artist_width = remaining_width.saturating_sub(title_width);

    (num_width, title_width, artist_width, duration_width)
}

/// Short inline message for a search failure
pub fn format_error(error: &SearchError) -> String {
    let detail = error.message();

    // Handle common Spotify API errors
    let reason = if detail.contains("429") {
        "Rate limited. Please wait a moment.".to_string()
    } else if detail.contains("401") {
        "Authentication expired. Please restart the app.".to_string()
    } else if detail.contains("403") {
        "Request forbidden by the catalog.".to_string()
    } else {
        detail.to_string()
    };

    match error {
        SearchError::NetworkFailure { .. } => format!("Search failed: {reason}"),
        SearchError::LoadMoreFailure { category, .. } => {
            format!("Loading more {category} failed: {reason}")
        }
    }
}

/// Draw the part of a block of `lines` that falls inside the viewport.
///
/// `top` is the block's offset in content coordinates; `scroll_top` is the
/// content offset shown at `viewport.y`. Lines above or below are skipped.
pub fn render_clipped_lines(
    frame: &mut Frame,
    viewport: Rect,
    scroll_top: u32,
    top: u32,
    x: u16,
    width: u16,
    lines: Vec<Line<'static>>,
) {
    let bottom = top + lines.len() as u32;
    let view_bottom = scroll_top + viewport.height as u32;
    if bottom <= scroll_top || top >= view_bottom {
        return;
    }

    let skip = scroll_top.saturating_sub(top) as usize;
    let first_y = top.max(scroll_top) - scroll_top;
    let take = (bottom.min(view_bottom) - top.max(scroll_top)) as usize;

    let right = viewport.x + viewport.width;
    let width = width.min(right.saturating_sub(x));
    if width == 0 {
        return;
    }

    let visible: Vec<Line> = lines.into_iter().skip(skip).take(take).collect();
    let area = Rect {
        x,
        y: viewport.y + first_y as u16,
        width,
        height: take as u16,
    };
    frame.render_widget(Paragraph::new(visible), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(3 * 60_000 + 7_000), "3:07");
    }

    #[test]
    fn test_truncate_string_pads_and_cuts() {
        assert_eq!(truncate_string("abc", 5), "abc  ");
        assert_eq!(truncate_string("abcdefgh", 6), "abc...");
    }

    #[test]
    fn test_num_width_grows_with_digits() {
        assert_eq!(calculate_num_width(0), 2);
        assert_eq!(calculate_num_width(9), 2);
        assert_eq!(calculate_num_width(137), 4);
    }

    #[test]
    fn test_format_error_maps_rate_limit() {
        let error = SearchError::NetworkFailure {
            query: "x".to_string(),
            message: "http status: 429".to_string(),
        };
        assert_eq!(format_error(&error), "Search failed: Rate limited. Please wait a moment.");

        let error = SearchError::LoadMoreFailure {
            category: crate::model::Category::Albums,
            message: "connection reset".to_string(),
        };
        assert_eq!(format_error(&error), "Loading more albums failed: connection reset");
    }

    #[test]
    fn test_track_columns_fill_width() {
        let (num, title, artist, duration) = track_column_widths(80, 40);
        assert_eq!(1 + num + 3 + title + 3 + artist + 3 + duration, 80);
    }
}
