//! SectorBoard TUI — four-panel terminal dashboard for S&P 500 sector
//! exploration.
//!
//! Panels:
//! 1. Sectors — GICS sector multiselect and custom ticker picks
//! 2. Table — the filtered constituent table, with CSV export
//! 3. Charts — YTD close-price line charts, up to five tickers
//! 4. Help — keyboard shortcuts

mod app;
mod input;
mod theme;
mod ui;
mod worker;

use std::io::{self, stdout};
use std::sync::mpsc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::app::{AppState, ErrorCategory};
use crate::worker::{WorkerCommand, WorkerResponse};

fn main() -> Result<()> {
    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    // Worker channels
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    let worker_handle = worker::spawn(cmd_rx, resp_tx);

    let mut app = AppState::new(cmd_tx.clone(), resp_rx);
    app.request_table_load(false);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    // Shutdown worker
    let _ = cmd_tx.send(WorkerCommand::Shutdown);
    let _ = worker_handle.join();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Drain worker responses (non-blocking)
        while let Ok(resp) = app.worker_rx.try_recv() {
            handle_worker_response(app, resp);
        }

        // 3. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        // 4. Check quit
        if !app.running {
            break;
        }
    }
    Ok(())
}

fn handle_worker_response(app: &mut AppState, resp: WorkerResponse) {
    match resp {
        WorkerResponse::TableLoaded { table } => {
            app.apply_table(table);
        }
        WorkerResponse::TableFailed { error } => {
            app.table_loading = false;
            app.push_error(
                ErrorCategory::Network,
                format!("Constituent table load failed: {error}"),
                "wikipedia scrape".into(),
            );
        }
        WorkerResponse::FetchProgress {
            symbol,
            index,
            total,
            generation,
        } => {
            if generation != app.fetch.generation {
                return;
            }
            app.fetch.current_symbol = Some(symbol);
            app.fetch.done = index;
            app.fetch.total = total;
        }
        WorkerResponse::FetchSymbolDone {
            symbol,
            error,
            generation,
        } => {
            if generation != app.fetch.generation {
                return;
            }
            if let Some(err) = error {
                app.record_error(
                    ErrorCategory::Network,
                    format!("Price fetch failed: {err}"),
                    symbol,
                );
            }
            app.fetch.done += 1;
        }
        WorkerResponse::FetchDone {
            history,
            generation,
        } => {
            // A stale generation means the selection changed mid-fetch;
            // the newer fetch's results win.
            if generation != app.fetch.generation {
                return;
            }
            app.fetch.in_progress = false;
            app.fetch.current_symbol = None;
            let failed = history.errors.len();
            if failed == 0 {
                app.set_status(format!("Loaded prices for {} tickers", history.len()));
            } else {
                app.set_warning(format!(
                    "Prices loaded: {} ok, {failed} failed",
                    history.len()
                ));
            }
            app.history = Some(history);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn table() -> Arc<sectorboard_core::CompanyTable> {
        Arc::new(
            sectorboard_core::CompanyTable::new(
                vec!["Symbol".into(), "Security".into(), "GICS Sector".into()],
                vec![vec!["AAPL".into(), "Apple Inc.".into(), "Tech".into()]],
            )
            .unwrap(),
        )
    }

    fn app() -> AppState {
        let (cmd_tx, _cmd_rx) = mpsc::channel();
        let (_resp_tx, resp_rx) = mpsc::channel();
        AppState::new(cmd_tx, resp_rx)
    }

    #[test]
    fn table_loaded_clears_loading_flag() {
        let mut app = app();
        app.table_loading = true;
        handle_worker_response(&mut app, WorkerResponse::TableLoaded { table: table() });
        assert!(!app.table_loading);
        assert!(app.table.is_some());
    }

    #[test]
    fn stale_fetch_done_is_discarded() {
        let mut app = app();
        app.table = Some(table());
        app.fetch.generation = 5;
        app.fetch.in_progress = true;

        handle_worker_response(
            &mut app,
            WorkerResponse::FetchDone {
                history: sectorboard_core::data::PriceHistory::default(),
                generation: 4,
            },
        );
        assert!(app.fetch.in_progress);
        assert!(app.history.is_none());

        handle_worker_response(
            &mut app,
            WorkerResponse::FetchDone {
                history: sectorboard_core::data::PriceHistory::default(),
                generation: 5,
            },
        );
        assert!(!app.fetch.in_progress);
        assert!(app.history.is_some());
    }

    #[test]
    fn failed_symbol_lands_in_error_history() {
        let mut app = app();
        app.fetch.generation = 1;
        handle_worker_response(
            &mut app,
            WorkerResponse::FetchSymbolDone {
                symbol: "ZZZZ".into(),
                error: Some(sectorboard_core::data::DataError::SymbolNotFound {
                    symbol: "ZZZZ".into(),
                }),
                generation: 1,
            },
        );
        assert_eq!(app.error_history.len(), 1);
        assert_eq!(app.fetch.done, 1);
    }
}
