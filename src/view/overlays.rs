//! Overlay rendering (help popup)

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub fn render_help_popup(frame: &mut Frame) {
    let area = frame.area();

    // Keybindings grouped by what they act on
    let keybindings = [
        ("", "── Search ──"),
        ("type", "Search as you type"),
        ("Enter", "Search now"),
        ("Esc", "Clear search"),
        ("Ctrl+Z", "Bring back a cleared search"),
        ("Ctrl+F", "Cycle field filter"),
        ("Ctrl+R", "Retry after a failure"),
        ("", ""),
        ("", "── Results ──"),
        ("Tab / Shift+Tab", "Switch result tab"),
        ("↑ / ↓", "Move by row"),
        ("← / →", "Move within a row"),
        ("PgUp / PgDn", "Move by page"),
        ("Home / End", "First / last loaded item"),
        ("Ctrl+D", "Reload download badges"),
        ("", ""),
        ("", "── General ──"),
        ("F1", "Toggle this help"),
        ("Ctrl+Q", "Quit"),
    ];

    // Centered, shrunk to fit small terminals
    let popup_width = 56.min(area.width);
    let popup_height = (keybindings.len() as u16 + 2).min(area.height.saturating_sub(2));

    let popup_area = Rect {
        x: area.width.saturating_sub(popup_width) / 2,
        y: area.height.saturating_sub(popup_height) / 2,
        width: popup_width,
        height: popup_height,
    };

    // Clear whatever the results area drew underneath
    frame.render_widget(Clear, popup_area);

    // One line per binding
    let lines: Vec<Line> = keybindings
        .iter()
        .map(|(key, desc)| {
            if key.is_empty() {
                // Group header or spacer
                Line::from(Span::styled(
                    format!("{:^50}", desc),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ))
            } else {
                // Right-aligned key, then its description
                Line::from(vec![
                    Span::styled(
                        format!("{:>18}", key),
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(desc.to_string(), Style::default().fg(Color::White)),
                ])
            }
        })
        .collect();

    let help_text = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Help (F1 or Esc to close) ")
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .style(Style::default().bg(Color::Black)),
    );

    frame.render_widget(help_text, popup_area);
}
