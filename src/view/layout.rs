//! Layout rendering (search bar, tab bar, status line)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};

use crate::model::{ResultStore, SearchTab, UiState};

pub fn render_top_bar(frame: &mut Frame, area: Rect, ui_state: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Search input
            Constraint::Length(24), // Facet filter
        ])
        .split(area);

    let (search_text, search_style) = if ui_state.input.is_empty() {
        ("Type to search...", Style::default().fg(Color::DarkGray))
    } else {
        (ui_state.input.as_str(), Style::default().fg(Color::Green))
    };

    let title = if ui_state.debouncing { " Search … " } else { " Search " };

    let search = Paragraph::new(search_text).style(search_style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .padding(Padding::horizontal(1))
            .border_style(Style::default().fg(Color::Green)),
    );
    frame.render_widget(search, chunks[0]);

    // Cursor after the typed text
    let cursor_x = chunks[0].x + 2 + ui_state.input.chars().count() as u16;
    if cursor_x < chunks[0].x + chunks[0].width.saturating_sub(1) {
        frame.set_cursor_position((cursor_x, chunks[0].y + 1));
    }

    let (filter_text, filter_style) = match ui_state.filter {
        Some(filter) => (filter.label().to_string(), Style::default().fg(Color::Yellow)),
        None => ("any field".to_string(), Style::default().fg(Color::DarkGray)),
    };
    let filter = Paragraph::new(filter_text).style(filter_style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Filter (^F) ")
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(filter, chunks[1]);
}

fn tab_title(tab: SearchTab, store: &ResultStore) -> String {
    match tab.category() {
        None => format!(" {} ", tab.title()),
        Some(category) if store.total(category) > 0 => format!(
            " {} ({}/{}) ",
            tab.title(),
            store.len(category),
            store.total(category)
        ),
        Some(_) => format!(" {} ", tab.title()),
    }
}

pub fn render_tab_bar(frame: &mut Frame, area: Rect, ui_state: &UiState, store: &ResultStore) {
    let spans: Vec<Span> = SearchTab::ALL
        .iter()
        .flat_map(|&tab| {
            let style = if tab == ui_state.tab {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            vec![Span::styled(tab_title(tab, store), style), Span::raw(" ")]
        })
        .collect();

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

pub fn render_status_line(
    frame: &mut Frame,
    area: Rect,
    ui_state: &UiState,
    store: &ResultStore,
    searching: bool,
) {
    let loading_more = ui_state
        .tab
        .category()
        .is_some_and(|category| store.is_loading_more(category));

    let status = if ui_state.debouncing {
        Span::styled("Waiting for typing to pause", Style::default().fg(Color::DarkGray))
    } else if searching {
        Span::styled("Searching...", Style::default().fg(Color::Yellow))
    } else if loading_more {
        Span::styled("Loading more...", Style::default().fg(Color::Yellow))
    } else if store.error.is_some() {
        Span::styled("Failed. Ctrl+R to retry", Style::default().fg(Color::Red))
    } else {
        Span::styled("Ready", Style::default().fg(Color::DarkGray))
    };

    let line = Line::from(vec![
        Span::raw(" "),
        status,
        Span::styled(
            "   Tab: switch  ^F: filter  F1: help  ^Q: quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
