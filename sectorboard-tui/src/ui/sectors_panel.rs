//! Panel 1 — Sectors: GICS sector multiselect, custom-ticker toggle,
//! fetch progress.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use sectorboard_core::filter::MAX_PLOT_TICKERS;

use crate::app::{AppState, SectorRow};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();

    if app.table_loading {
        lines.push(Line::from(Span::styled(
            "Loading S&P 500 constituents from Wikipedia...",
            theme::warning(),
        )));
        f.render_widget(Paragraph::new(lines), area);
        return;
    }

    if app.table.is_none() {
        lines.push(Line::from(Span::styled(
            "No constituent table loaded. Press r to retry.",
            theme::negative(),
        )));
        f.render_widget(Paragraph::new(lines), area);
        return;
    }

    // Header
    lines.push(Line::from(vec![
        Span::styled("Sectors: ", theme::muted()),
        Span::styled(
            format!(
                "{}/{}",
                app.sectors.selected.len(),
                app.sector_names().len()
            ),
            theme::accent(),
        ),
        Span::styled("  Companies: ", theme::muted()),
        Span::styled(format!("{}", app.filtered.row_count()), theme::accent()),
        Span::styled(
            "  [Space]toggle [a]ll [d]eselect [r]eload",
            theme::muted(),
        ),
    ]));
    lines.push(Line::from(""));

    // Fetch progress
    if app.fetch.in_progress {
        let sym = app.fetch.current_symbol.as_deref().unwrap_or("...");
        lines.push(Line::from(vec![
            Span::styled("Fetching YTD prices: ", theme::warning()),
            Span::styled(sym, theme::accent()),
            Span::styled(
                format!(" [{}/{}]", app.fetch.done, app.fetch.total),
                theme::muted(),
            ),
        ]));
        lines.push(Line::from(""));
    }

    // Sector list, custom toggle, and (when enabled) the ticker multiselect.
    let scroll = scroll_offset(app.sectors.cursor, area.height as usize, 4);
    for (row, item) in app.sector_rows().into_iter().enumerate().skip(scroll) {
        let is_cursor = row == app.sectors.cursor;
        match item {
            SectorRow::Sector(name) => {
                let is_selected = app.sectors.selected.contains(&name);
                let check = if is_selected { "[x]" } else { "[ ]" };
                let label = format!(
                    "{check} {name} ({} companies)",
                    app.sector_company_count(&name)
                );
                let style = if is_cursor {
                    theme::accent().add_modifier(Modifier::REVERSED)
                } else if is_selected {
                    theme::accent()
                } else {
                    theme::neutral()
                };
                lines.push(Line::from(Span::styled(label, style)));
            }
            SectorRow::CustomToggle => {
                let mark = if app.sectors.custom_enabled { "[x]" } else { "[ ]" };
                let label = format!("{mark} Choose specific tickers to plot");
                let style = if is_cursor {
                    theme::warning().add_modifier(Modifier::REVERSED)
                } else {
                    theme::warning()
                };
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(label, style)));
                if app.sectors.custom_enabled {
                    lines.push(Line::from(Span::styled(
                        format!(
                            "    chosen {}/{MAX_PLOT_TICKERS}",
                            app.sectors.chosen_tickers.len()
                        ),
                        theme::muted(),
                    )));
                }
            }
            SectorRow::Ticker(ticker) => {
                let is_chosen = app.sectors.chosen_tickers.contains(&ticker);
                let check = if is_chosen { "[x]" } else { "[ ]" };
                let style = if is_cursor {
                    theme::accent().add_modifier(Modifier::REVERSED)
                } else if is_chosen {
                    theme::accent()
                } else {
                    theme::muted()
                };
                lines.push(Line::from(vec![
                    Span::raw("    "),
                    Span::raw(check),
                    Span::raw(" "),
                    Span::styled(ticker, style),
                ]));
            }
        }
    }

    f.render_widget(Paragraph::new(lines), area);
}

/// Keep the cursor on screen: skip rows once it moves past the visible
/// window, leaving room for the header lines.
fn scroll_offset(cursor: usize, height: usize, header_rows: usize) -> usize {
    let visible = height.saturating_sub(header_rows).max(1);
    cursor.saturating_sub(visible.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_within_window_needs_no_scroll() {
        assert_eq!(scroll_offset(0, 20, 4), 0);
        assert_eq!(scroll_offset(15, 20, 4), 0);
    }

    #[test]
    fn cursor_past_window_scrolls() {
        assert_eq!(scroll_offset(16, 20, 4), 1);
        assert_eq!(scroll_offset(30, 20, 4), 15);
    }
}
