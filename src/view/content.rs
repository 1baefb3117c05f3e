//! Result area rendering: virtualized track list, card grids and the
//! combined "all" view

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap},
    Frame,
};

use super::utils::{format_duration, format_error, render_clipped_lines, track_column_widths, truncate_string};
use super::virtual_list::{LayoutMode, LayoutParams, RowTable, VirtualKind, VirtualList};
use super::{RenderContext, RenderReport};
use crate::error::SearchError;
use crate::model::{
    Category, CombinedResults, MostPopular, SearchAlbum, SearchArtist, SearchPlaylist, SearchTrack,
};

const TRACK_ROW_HEIGHT: u32 = 1;
const CARD_WIDTH: u32 = 28;
const CARD_HEIGHT: u32 = 3;
const CARD_GAP: u32 = 1;
const SENTINEL_HEIGHT: u32 = 1;

fn layout_mode(category: Category) -> LayoutMode {
    match category {
        Category::Tracks => LayoutMode::List { row_height: TRACK_ROW_HEIGHT },
        _ => LayoutMode::Grid {
            card_width: CARD_WIDTH,
            card_height: CARD_HEIGHT,
            gap: CARD_GAP,
        },
    }
}

pub fn render_results(
    frame: &mut Frame,
    area: Rect,
    ctx: &RenderContext,
    lists: &mut [VirtualList],
) -> RenderReport {
    let tab = ctx.ui.tab;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", tab.title()))
        .padding(Padding::horizontal(1))
        .border_style(Style::default().fg(Color::Green));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),    // Results
            Constraint::Length(1), // Scrollbar
        ])
        .split(inner);

    let report = RenderReport {
        tab,
        scroll_top: ctx.ui.view().scroll_top,
        viewport_height: chunks[0].height as u32,
        columns: 1,
        page_items: chunks[0].height.max(1) as usize,
        ..Default::default()
    };

    if let Some(error @ SearchError::NetworkFailure { .. }) = &ctx.store.error {
        render_inline_error(frame, chunks[0], error);
        return report;
    }

    match tab.category() {
        None => render_combined(frame, chunks[0], chunks[1], ctx, report),
        Some(category) => {
            let list = &mut lists[tab.index()];
            render_category(frame, chunks[0], chunks[1], ctx, list, category, report)
        }
    }
}

fn render_inline_error(frame: &mut Frame, area: Rect, error: &SearchError) {
    let lines = vec![
        Line::from(Span::styled(format_error(error), Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from(Span::styled("Press Ctrl+R to retry", Style::default().fg(Color::DarkGray))),
    ];
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn render_message(frame: &mut Frame, area: Rect, message: String) {
    let empty = Paragraph::new(message).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(empty, area);
}

fn empty_message(ctx: &RenderContext, what: &str) -> String {
    if ctx.searching || ctx.ui.debouncing {
        "Searching...".to_string()
    } else if ctx.store.text().is_empty() {
        "Type to search...".to_string()
    } else {
        format!("No {} found for \"{}\"", what, ctx.store.text())
    }
}

fn render_scrollbar(frame: &mut Frame, area: Rect, total_height: u32, scroll_top: u32, viewport: u32) {
    if total_height <= viewport {
        return;
    }
    let mut state = ScrollbarState::new(total_height.saturating_sub(viewport) as usize)
        .position(scroll_top as usize)
        .viewport_content_length(viewport as usize);
    frame.render_stateful_widget(
        Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .style(Style::default().fg(Color::DarkGray)),
        area,
        &mut state,
    );
}

fn render_category(
    frame: &mut Frame,
    area: Rect,
    bar_area: Rect,
    ctx: &RenderContext,
    list: &mut VirtualList,
    category: Category,
    mut report: RenderReport,
) -> RenderReport {
    let store = ctx.store;
    let count = store.len(category);
    if count == 0 {
        render_message(frame, area, empty_message(ctx, category.as_str()));
        report.scroll_top = 0;
        return report;
    }

    let mode = layout_mode(category);
    list.update(&LayoutParams {
        mode,
        item_count: count,
        container_width: area.width as u32,
        has_more: store.has_more(category),
        sentinel_height: SENTINEL_HEIGHT,
    });

    let viewport = area.height as u32;
    let view = ctx.ui.view();
    let selected = view.selected.min(count - 1);
    let mut scroll_top = view.scroll_top;
    if ctx.ui.follow_selection {
        scroll_top = list.ensure_visible(selected, scroll_top, viewport);
    }
    let scroll_top = list.clamp_scroll(scroll_top, viewport);
    let rows = list.visible(scroll_top, viewport);

    let track_widths = track_column_widths(area.width as usize, count);
    for row in list.rows(rows.clone()) {
        match row.kind {
            VirtualKind::Row => {
                for index in row.items() {
                    let column = (index - row.start_index) as u32;
                    let is_selected = index == selected;
                    let (x, width, lines) = match category {
                        Category::Tracks => (
                            area.x,
                            area.width,
                            vec![track_line(&store.tracks.items[index], index, is_selected, track_widths)],
                        ),
                        _ => {
                            let x = area.x + (column * (CARD_WIDTH + CARD_GAP)) as u16;
                            let lines = match category {
                                Category::Albums => {
                                    let album = &store.albums.items[index];
                                    album_card(album, is_selected, ctx.statuses.is_set(&album.id))
                                }
                                Category::Artists => artist_card(&store.artists.items[index], is_selected),
                                _ => playlist_card(&store.playlists.items[index], is_selected),
                            };
                            (x, CARD_WIDTH as u16, lines)
                        }
                    };
                    render_clipped_lines(frame, area, scroll_top, row.top, x, width, lines);
                }
            }
            VirtualKind::LoadMoreSentinel => {
                let line = sentinel_line(ctx, category);
                render_clipped_lines(frame, area, scroll_top, row.top, area.x, area.width, vec![line]);
            }
        }
    }

    render_scrollbar(frame, bar_area, list.total_height(), scroll_top, viewport);

    let row_height = match mode {
        LayoutMode::List { row_height } => row_height,
        LayoutMode::Grid { card_height, gap, .. } => card_height + gap,
    };
    report.scroll_top = scroll_top;
    report.visible_items = list.item_range(rows.clone());
    report.sentinel_visible = list.sentinel_visible(rows);
    report.columns = list.columns();
    report.page_items = (viewport / row_height).max(1) as usize * list.columns();
    report
}

fn sentinel_line(ctx: &RenderContext, category: Category) -> Line<'static> {
    if ctx.store.is_loading_more(category) {
        Line::from(Span::styled("  Loading more...", Style::default().fg(Color::Yellow)))
    } else if let Some(error @ SearchError::LoadMoreFailure { .. }) = &ctx.store.error {
        Line::from(Span::styled(
            format!("  {} (Ctrl+R to retry)", format_error(error)),
            Style::default().fg(Color::Red),
        ))
    } else {
        Line::from(Span::styled(
            format!(
                "  {} of {} loaded, more below",
                ctx.store.len(category),
                ctx.store.total(category)
            ),
            Style::default().fg(Color::DarkGray),
        ))
    }
}

fn item_style(is_selected: bool) -> Style {
    if is_selected {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    }
}

fn track_line(
    track: &SearchTrack,
    index: usize,
    is_selected: bool,
    (num_width, title_width, artist_width, duration_width): (usize, usize, usize, usize),
) -> Line<'static> {
    let style = if is_selected {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    Line::from(Span::styled(
        format!(
            " {:>num_width$}   {}   {}   {:>duration_width$}",
            index + 1,
            truncate_string(&track.name, title_width),
            truncate_string(&track.artists.join(", "), artist_width),
            format_duration(track.duration_ms),
        ),
        style,
    ))
}

fn card_text(text: &str) -> String {
    truncate_string(text, CARD_WIDTH as usize - 1)
}

fn album_card(album: &SearchAlbum, is_selected: bool, downloaded: bool) -> Vec<Line<'static>> {
    let mut meta = vec![Span::styled(card_text(&album.year), Style::default().fg(Color::DarkGray))];
    if downloaded {
        meta = vec![
            Span::styled(
                truncate_string(&album.year, 6),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled("✔ downloaded", Style::default().fg(Color::Green)),
        ];
    }
    vec![
        Line::from(Span::styled(card_text(&album.name), item_style(is_selected))),
        Line::from(Span::styled(card_text(&album.artist), Style::default().fg(Color::Gray))),
        Line::from(meta),
    ]
}

fn artist_card(artist: &SearchArtist, is_selected: bool) -> Vec<Line<'static>> {
    let genres = if artist.genres.is_empty() {
        "Artist".to_string()
    } else {
        artist.genres.join(", ")
    };
    vec![
        Line::from(Span::styled(card_text(&artist.name), item_style(is_selected))),
        Line::from(Span::styled(card_text(&genres), Style::default().fg(Color::Gray))),
        Line::from(""),
    ]
}

fn playlist_card(playlist: &SearchPlaylist, is_selected: bool) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(card_text(&playlist.name), item_style(is_selected))),
        Line::from(Span::styled(
            card_text(&format!("by {}", playlist.owner)),
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            card_text(&format!("{} tracks", playlist.total_tracks)),
            Style::default().fg(Color::DarkGray),
        )),
    ]
}

fn section_header(title: &str, shown: usize, total: usize) -> Line<'static> {
    Line::from(Span::styled(
        format!("{} ({} of {})", title, shown, total),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))
}

fn most_popular_block(pick: &MostPopular) -> Vec<Line<'static>> {
    let (kind, detail) = match pick {
        MostPopular::Album(a) => ("Album", format!("{} · {}", a.artist, a.year)),
        MostPopular::Track(t) => ("Track", format!("{} · {}", t.artist, format_duration(t.duration_ms))),
        MostPopular::Artist(a) => ("Artist", a.genres.join(", ")),
        MostPopular::Playlist(p) => ("Playlist", format!("by {}", p.owner)),
    };
    vec![
        Line::from(Span::styled(
            "Most popular",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(pick.name().to_string(), Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::styled(format!("  {kind}"), Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(Span::styled(detail, Style::default().fg(Color::Gray))),
        Line::from(""),
    ]
}

/// Sections of the combined view, one block of lines each
fn combined_blocks(combined: &CombinedResults, ctx: &RenderContext, width: usize) -> Vec<Vec<Line<'static>>> {
    let mut blocks = Vec::new();
    if let Some(pick) = &combined.most_popular {
        blocks.push(most_popular_block(pick));
    }

    fn section<T>(
        blocks: &mut Vec<Vec<Line<'static>>>,
        title: &str,
        items: &[T],
        total: usize,
        line: impl Fn(&T) -> Line<'static>,
    ) {
        if items.is_empty() {
            return;
        }
        let mut lines = vec![section_header(title, items.len(), total)];
        lines.extend(items.iter().map(line));
        lines.push(Line::from(""));
        blocks.push(lines);
    }

    let text_width = width.saturating_sub(4);
    section(&mut blocks, "Albums", combined.albums.items.as_slice(), combined.albums.total, |a| {
        let mut spans = vec![Span::raw(format!(
            "  {}",
            truncate_string(&format!("{} - {}", a.name, a.artist), text_width.saturating_sub(14))
        ))];
        if ctx.statuses.is_set(&a.id) {
            spans.push(Span::styled(" ✔", Style::default().fg(Color::Green)));
        }
        Line::from(spans)
    });
    section(&mut blocks, "Tracks", combined.tracks.items.as_slice(), combined.tracks.total, |t| {
        Line::from(format!(
            "  {}  {}",
            truncate_string(&format!("{} - {}", t.name, t.artist), text_width.saturating_sub(8)),
            format_duration(t.duration_ms)
        ))
    });
    section(&mut blocks, "Artists", combined.artists.items.as_slice(), combined.artists.total, |a| {
        Line::from(format!("  {}", truncate_string(&a.name, text_width)))
    });
    section(&mut blocks, "Playlists", combined.playlists.items.as_slice(), combined.playlists.total, |p| {
        Line::from(format!(
            "  {}",
            truncate_string(&format!("{} (by {})", p.name, p.owner), text_width)
        ))
    });
    blocks
}

fn render_combined(
    frame: &mut Frame,
    area: Rect,
    bar_area: Rect,
    ctx: &RenderContext,
    mut report: RenderReport,
) -> RenderReport {
    let Some(combined) = ctx.store.combined.as_ref().filter(|c| !c.is_empty()) else {
        render_message(frame, area, empty_message(ctx, "results"));
        report.scroll_top = 0;
        return report;
    };

    let blocks = combined_blocks(combined, ctx, area.width as usize);
    let heights: Vec<u32> = blocks.iter().map(|b| b.len() as u32).collect();
    let table = RowTable::from_heights(&heights);

    let viewport = area.height as u32;
    let scroll_top = ctx
        .ui
        .view()
        .scroll_top
        .min(table.total_height().saturating_sub(viewport));
    let rows = table.visible_range(scroll_top, viewport, ctx.overscan);

    for (i, lines) in blocks.into_iter().enumerate() {
        if rows.contains(&i) {
            let top = table.rows()[i].top;
            render_clipped_lines(frame, area, scroll_top, top, area.x, area.width, lines);
        }
    }

    render_scrollbar(frame, bar_area, table.total_height(), scroll_top, viewport);

    report.scroll_top = scroll_top;
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        fixtures, CategoryPage, Query, ResultPage, ResultStore, SearchTab, StatusMap, UiState,
    };
    use crate::view::{AppView, ViewCache};
    use ratatui::{backend::TestBackend, Terminal};

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn albums_store(loaded: usize, total: usize) -> ResultStore {
        let mut store = ResultStore::new();
        store.commit_first_page(
            &Query::new("radiohead", SearchTab::Albums, None),
            CategoryPage::Albums(ResultPage::new(fixtures::albums("al", 0..loaded), total, 0)),
        );
        store
    }

    fn draw(
        terminal: &mut Terminal<TestBackend>,
        ui: &UiState,
        store: &ResultStore,
        statuses: &StatusMap<String, bool>,
        cache: &mut ViewCache,
    ) -> RenderReport {
        let mut report = RenderReport::default();
        terminal
            .draw(|frame| {
                let ctx = RenderContext { ui, store, statuses, searching: false, overscan: 0 };
                report = AppView::render(frame, &ctx, cache);
            })
            .unwrap();
        report
    }

    #[test]
    fn test_album_grid_reports_columns_and_visible_items() {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        let ui = UiState { tab: SearchTab::Albums, input: "radiohead".to_string(), ..Default::default() };
        let store = albums_store(20, 137);
        let mut cache = ViewCache::new(0);

        let report = draw(&mut terminal, &ui, &store, &StatusMap::new(), &mut cache);
        assert_eq!(report.tab, SearchTab::Albums);
        assert_eq!(report.columns, 3);
        assert_eq!(report.visible_items.start, 0);
        assert!(report.visible_items.end >= 3);
        assert!(!report.sentinel_visible);
        assert!(screen(&terminal).contains("al album 0"));
    }

    #[test]
    fn test_scrolled_to_bottom_shows_sentinel() {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        let mut ui = UiState { tab: SearchTab::Albums, input: "radiohead".to_string(), ..Default::default() };
        ui.view_mut().scroll_top = u32::MAX;
        let store = albums_store(20, 137);
        let mut cache = ViewCache::new(0);

        let report = draw(&mut terminal, &ui, &store, &StatusMap::new(), &mut cache);
        assert!(report.sentinel_visible);
        assert!(report.visible_items.end == 20);
        assert!(screen(&terminal).contains("20 of 137 loaded"));
    }

    #[test]
    fn test_unchanged_inputs_skip_layout_pass() {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        let mut ui = UiState { tab: SearchTab::Albums, ..Default::default() };
        let store = albums_store(20, 137);
        let mut cache = ViewCache::new(0);

        draw(&mut terminal, &ui, &store, &StatusMap::new(), &mut cache);
        ui.view_mut().scroll_top = 8;
        draw(&mut terminal, &ui, &store, &StatusMap::new(), &mut cache);
        assert_eq!(cache.list(SearchTab::Albums).layout_passes(), 1);
    }

    #[test]
    fn test_download_badge_on_album_card() {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        let ui = UiState { tab: SearchTab::Albums, ..Default::default() };
        let store = albums_store(2, 2);
        let mut statuses = StatusMap::new();
        statuses.insert("al1".to_string(), true);
        let mut cache = ViewCache::new(0);

        draw(&mut terminal, &ui, &store, &statuses, &mut cache);
        assert_eq!(screen(&terminal).matches("downloaded").count(), 1);
    }

    #[test]
    fn test_network_failure_renders_inline_error() {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        let ui = UiState { tab: SearchTab::Tracks, ..Default::default() };
        let mut store = ResultStore::new();
        store.error = Some(SearchError::NetworkFailure {
            query: "x".to_string(),
            message: "timed out".to_string(),
        });
        let mut cache = ViewCache::new(0);

        let report = draw(&mut terminal, &ui, &store, &StatusMap::new(), &mut cache);
        let text = screen(&terminal);
        assert!(text.contains("Search failed: timed out"));
        assert!(text.contains("Ctrl+R"));
        assert!(!report.sentinel_visible);
    }

    #[test]
    fn test_combined_view_shows_most_popular_and_sections() {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let ui = UiState::default();
        let mut store = ResultStore::new();
        store.commit_combined(
            &Query::new("radiohead", SearchTab::All, None),
            CombinedResults {
                albums: ResultPage::new(fixtures::albums("al", 0..2), 50, 0),
                tracks: ResultPage::new(vec![fixtures::track("t1", "Creep", "Radiohead")], 300, 0),
                most_popular: Some(MostPopular::Track(fixtures::track("t1", "Creep", "Radiohead"))),
                ..Default::default()
            },
        );
        let mut cache = ViewCache::new(0);

        draw(&mut terminal, &ui, &store, &StatusMap::new(), &mut cache);
        let text = screen(&terminal);
        assert!(text.contains("Most popular"));
        assert!(text.contains("Albums (2 of 50)"));
        assert!(text.contains("Tracks (1 of 300)"));
        assert!(!text.contains("Artists ("));
    }

    #[test]
    fn test_empty_tab_prompts_for_input() {
        let mut terminal = Terminal::new(TestBackend::new(80, 12)).unwrap();
        let ui = UiState { tab: SearchTab::Playlists, ..Default::default() };
        let mut cache = ViewCache::new(0);
        let report = draw(&mut terminal, &ui, &ResultStore::new(), &StatusMap::new(), &mut cache);
        assert!(screen(&terminal).contains("Type to search..."));
        assert_eq!(report.visible_items, 0..0);
    }

    #[test]
    fn test_track_list_follows_selection() {
        let mut terminal = Terminal::new(TestBackend::new(80, 12)).unwrap();
        let mut store = ResultStore::new();
        let tracks = (0..40)
            .map(|i| fixtures::track(&format!("t{i}"), &format!("Song {i}"), "Artist"))
            .collect();
        store.commit_first_page(
            &Query::new("song", SearchTab::Tracks, None),
            CategoryPage::Tracks(ResultPage::new(tracks, 40, 0)),
        );
        let mut ui = UiState { tab: SearchTab::Tracks, follow_selection: true, ..Default::default() };
        ui.view_mut().selected = 30;
        let mut cache = ViewCache::new(0);

        let report = draw(&mut terminal, &ui, &store, &StatusMap::new(), &mut cache);
        assert!(report.scroll_top > 0);
        assert!(report.visible_items.contains(&30));
        assert!(screen(&terminal).contains("Song 30"));
    }
}
