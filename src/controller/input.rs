//! Key event handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::AppController;

impl AppController {
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        // Q with Ctrl quits from anywhere
        if ctrl && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q')) {
            self.ui.lock().await.should_quit = true;
            return Ok(());
        }

        {
            let mut ui = self.ui.lock().await;

            // Help popup blocks all other interactions
            if ui.show_help_popup {
                if matches!(key.code, KeyCode::Esc | KeyCode::F(1)) {
                    ui.show_help_popup = false;
                }
                return Ok(());
            }
        }

        match key.code {
            KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => self.previous_tab().await,
            KeyCode::Tab => self.next_tab().await,
            KeyCode::BackTab => self.previous_tab().await,
            KeyCode::Char('f') | KeyCode::Char('F') if ctrl => self.cycle_filter().await,
            KeyCode::Char('r') | KeyCode::Char('R') if ctrl => {
                self.retry().await;
            }
            KeyCode::Char('z') | KeyCode::Char('Z') if ctrl => {
                self.undo_clear().await;
            }
            KeyCode::Char('d') | KeyCode::Char('D') if ctrl => {
                let controller = self.clone();
                tokio::spawn(async move { controller.reload_downloads().await });
            }
            KeyCode::F(1) => {
                self.ui.lock().await.show_help_popup = true;
            }
            KeyCode::Enter => {
                self.search_now().await;
            }
            KeyCode::Esc => {
                if self.ui.lock().await.input.is_empty() {
                    return Ok(());
                }
                self.stash_for_undo().await;
                self.ui.lock().await.input.clear();
                self.input_changed().await;
            }
            KeyCode::Backspace => {
                let changed = self.ui.lock().await.input.pop().is_some();
                if changed {
                    self.input_changed().await;
                }
            }
            KeyCode::Char(c) if !ctrl => {
                self.ui.lock().await.input.push(c);
                self.input_changed().await;
            }
            KeyCode::Up => self.move_vertical(-1).await,
            KeyCode::Down => self.move_vertical(1).await,
            KeyCode::Left => self.move_horizontal(-1).await,
            KeyCode::Right => self.move_horizontal(1).await,
            KeyCode::PageUp => self.move_page(-1).await,
            KeyCode::PageDown => self.move_page(1).await,
            KeyCode::Home => self.jump(false).await,
            KeyCode::End => self.jump(true).await,
            _ => {}
        }
        Ok(())
    }

    async fn next_tab(&self) {
        let tab = self.ui.lock().await.tab.next();
        self.switch_tab(tab).await;
    }

    async fn previous_tab(&self) {
        let tab = self.ui.lock().await.tab.prev();
        self.switch_tab(tab).await;
    }

    /// One row: a whole grid row of cards, or a line on the combined tab
    async fn move_vertical(&self, direction: isize) {
        let tab = self.ui.lock().await.tab;
        let count = self.item_count(tab).await;
        let mut ui = self.ui.lock().await;
        if tab.category().is_none() {
            ui.scroll_by(direction as i64);
            return;
        }
        let columns = ui.columns.max(1) as isize;
        ui.move_selection(direction * columns, count);
    }

    async fn move_horizontal(&self, direction: isize) {
        let tab = self.ui.lock().await.tab;
        if tab.category().is_none() {
            return;
        }
        let count = self.item_count(tab).await;
        let mut ui = self.ui.lock().await;
        if ui.columns > 1 {
            ui.move_selection(direction, count);
        }
    }

    async fn move_page(&self, direction: isize) {
        let tab = self.ui.lock().await.tab;
        let count = self.item_count(tab).await;
        let mut ui = self.ui.lock().await;
        let page = ui.page_items.max(1) as isize;
        if tab.category().is_none() {
            ui.scroll_by(direction as i64 * page as i64);
            return;
        }
        ui.move_selection(direction * page, count);
    }

    async fn jump(&self, to_end: bool) {
        let tab = self.ui.lock().await.tab;
        let count = self.item_count(tab).await;
        let mut ui = self.ui.lock().await;
        if tab.category().is_none() {
            ui.scroll_by(if to_end { i64::from(u32::MAX) } else { i64::MIN / 2 });
            return;
        }
        let delta = if to_end { count as isize } else { -(count as isize) };
        ui.move_selection(delta, count);
    }
}
