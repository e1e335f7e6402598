//! Keyboard input dispatch — global keys → overlays → panel-specific handlers.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use sectorboard_core::export::{self, EXPORT_FILENAME};

use crate::app::{AppState, ErrorCategory, Overlay, Panel, SectorRow};

/// Handle a key event.
pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Overlays consume input first.
    match &app.overlay {
        Overlay::ErrorHistory => {
            handle_error_overlay(app, key);
            return;
        }
        Overlay::None => {}
    }

    // 2. Global keys (always available).
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char('1') => { app.active_panel = Panel::Sectors; return; }
        KeyCode::Char('2') => { app.active_panel = Panel::Table; return; }
        KeyCode::Char('3') => { app.active_panel = Panel::Charts; return; }
        KeyCode::Char('4') => { app.active_panel = Panel::Help; return; }
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.active_panel = app.active_panel.prev();
            } else {
                app.active_panel = app.active_panel.next();
            }
            return;
        }
        KeyCode::BackTab => {
            app.active_panel = app.active_panel.prev();
            return;
        }
        KeyCode::Char('r') => {
            if !app.table_loading {
                app.request_table_load(true);
            }
            return;
        }
        _ => {}
    }

    // 3. Panel-specific keys.
    match app.active_panel {
        Panel::Sectors => handle_sectors_key(app, key),
        Panel::Table => handle_table_key(app, key),
        Panel::Charts => handle_charts_key(app, key),
        Panel::Help => handle_help_key(app, key),
    }
}

fn handle_error_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('e') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

fn handle_sectors_key(app: &mut AppState, key: KeyEvent) {
    let row_count = app.sector_rows().len();

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if row_count > 0 && app.sectors.cursor + 1 < row_count {
                app.sectors.cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.sectors.cursor = app.sectors.cursor.saturating_sub(1);
        }
        KeyCode::Char(' ') | KeyCode::Enter => match app.cursor_row() {
            Some(SectorRow::Sector(name)) => app.toggle_sector(&name),
            Some(SectorRow::CustomToggle) => app.toggle_custom(),
            Some(SectorRow::Ticker(ticker)) => app.toggle_ticker(&ticker),
            None => {}
        },
        KeyCode::Char('a') => app.select_all_sectors(),
        KeyCode::Char('d') => app.deselect_all_sectors(),
        KeyCode::Char('t') => app.toggle_custom(),
        _ => {}
    }
}

fn handle_table_key(app: &mut AppState, key: KeyEvent) {
    let row_count = app.filtered.row_count();

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if row_count > 0 && app.table_scroll + 1 < row_count {
                app.table_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.table_scroll = app.table_scroll.saturating_sub(1);
        }
        KeyCode::Char('g') => {
            app.table_scroll = 0;
        }
        KeyCode::Char('G') => {
            app.table_scroll = row_count.saturating_sub(1);
        }
        KeyCode::Char('x') => export_csv(app),
        _ => {}
    }
}

/// Export the filtered view: write `SP500.csv` to the working directory and
/// report the size of the equivalent base64 download link.
fn export_csv(app: &mut AppState) {
    let path = std::path::Path::new(EXPORT_FILENAME);
    match export::write_csv(&app.filtered, path) {
        Ok(()) => match export::download_payload(&app.filtered) {
            Ok(payload) => {
                app.set_status(format!(
                    "Exported {} rows to {} ({} byte data link)",
                    app.filtered.row_count(),
                    EXPORT_FILENAME,
                    payload.href.len()
                ));
            }
            Err(err) => {
                app.push_error(ErrorCategory::Data, err.to_string(), "csv export".into());
            }
        },
        Err(err) => {
            app.push_error(ErrorCategory::Data, err.to_string(), "csv export".into());
        }
    }
}

fn handle_charts_key(app: &mut AppState, key: KeyEvent) {
    let chart_count = app.charts.outcomes.len();

    match key.code {
        KeyCode::Enter => app.show_plots(),
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Char(']') => {
            if chart_count > 0 {
                app.charts.index = (app.charts.index + 1) % chart_count;
            }
        }
        KeyCode::Char('h') | KeyCode::Left | KeyCode::Char('[') => {
            if chart_count > 0 {
                app.charts.index = (app.charts.index + chart_count - 1) % chart_count;
            }
        }
        _ => {}
    }
}

fn handle_help_key(app: &mut AppState, key: KeyEvent) {
    if let KeyCode::Char('e') = key.code {
        app.overlay = Overlay::ErrorHistory;
        app.error_scroll = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;
    use std::sync::mpsc;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn app() -> AppState {
        let (cmd_tx, _cmd_rx) = mpsc::channel();
        let (_resp_tx, resp_rx) = mpsc::channel();
        AppState::new(cmd_tx, resp_rx)
    }

    #[test]
    fn q_quits() {
        let mut app = app();
        handle_key(&mut app, press(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[test]
    fn number_keys_switch_panels() {
        let mut app = app();
        handle_key(&mut app, press(KeyCode::Char('3')));
        assert_eq!(app.active_panel, Panel::Charts);
        handle_key(&mut app, press(KeyCode::Char('1')));
        assert_eq!(app.active_panel, Panel::Sectors);
    }

    #[test]
    fn tab_cycles_panels() {
        let mut app = app();
        handle_key(&mut app, press(KeyCode::Tab));
        assert_eq!(app.active_panel, Panel::Table);
        handle_key(&mut app, press(KeyCode::BackTab));
        assert_eq!(app.active_panel, Panel::Sectors);
    }

    #[test]
    fn release_events_are_ignored() {
        let mut app = app();
        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        handle_key(&mut app, key);
        assert!(app.running);
    }

    #[test]
    fn error_overlay_consumes_input() {
        let mut app = app();
        app.overlay = Overlay::ErrorHistory;
        handle_key(&mut app, press(KeyCode::Char('1')));
        assert_eq!(app.active_panel, Panel::Sectors);
        assert_eq!(app.overlay, Overlay::ErrorHistory);
        handle_key(&mut app, press(KeyCode::Esc));
        assert_eq!(app.overlay, Overlay::None);
    }

    #[test]
    fn help_e_opens_error_history() {
        let mut app = app();
        app.active_panel = Panel::Help;
        handle_key(&mut app, press(KeyCode::Char('e')));
        assert_eq!(app.overlay, Overlay::ErrorHistory);
    }
}
