use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use catalog_search::config::SearchConfig;
use catalog_search::controller::{AppController, GateEvent, SearchPhase};
use catalog_search::logging;
use catalog_search::model::{DownloadIndex, SpotifyCatalog, DOWNLOAD_INDEX_FILE};
use catalog_search::view::{AppView, RenderContext, RenderReport, ViewCache};

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = logging::init_logging() {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== Catalog Search Starting ===");

    let config = SearchConfig::from_env();
    tracing::debug!(config = ?config, "Configuration loaded");

    let catalog = match SpotifyCatalog::from_env(config.combined_page_size).await {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::error!(error = %e, "Catalog authentication failed");
            return Err(e);
        }
    };

    let downloads = Arc::new(DownloadIndex::new(DOWNLOAD_INDEX_FILE));
    let (controller, gate_events) = AppController::new(Arc::new(catalog), downloads, config);

    // Load the download index in the background; failures only cost the badges
    let controller_for_index = controller.clone();
    tokio::spawn(async move {
        controller_for_index.reload_downloads().await;
    });

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, controller, gate_events).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("Catalog Search shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    controller: AppController,
    mut gate_events: mpsc::UnboundedReceiver<GateEvent>,
) -> io::Result<()> {
    let mut cache = ViewCache::new(controller.config().overscan_rows);

    loop {
        while let Ok(event) = gate_events.try_recv() {
            controller.handle_gate_event(event).await;
        }

        let ui_state = controller.ui_state().await;
        let statuses = controller.statuses().await;
        let searching = controller.search_phase().await == SearchPhase::Fetching;

        let mut report = RenderReport::default();
        let drawn = controller
            .with_store(|store| {
                terminal.draw(|frame| {
                    let ctx = RenderContext {
                        ui: &ui_state,
                        store,
                        statuses: &statuses,
                        searching,
                        overscan: cache.overscan(),
                    };
                    report = AppView::render(frame, &ctx, &mut cache);
                })
                .map(|_| ())
            })
            .await;
        drawn?;

        controller.after_render(&report).await;

        if ui_state.should_quit {
            break;
        }

        // Handle input with shorter poll time for smoother UI updates
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                let _ = controller.handle_key_event(key).await;
            }
        }
    }

    Ok(())
}
