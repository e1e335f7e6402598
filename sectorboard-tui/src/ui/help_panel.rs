//! Panel 4 — Help: keyboard shortcuts.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, _app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, "Global Navigation");
    key(&mut lines, "1-4", "Switch to panel by number");
    key(&mut lines, "Tab / Shift+Tab", "Cycle panels forward / back");
    key(&mut lines, "r", "Reload the constituent table from Wikipedia");
    key(&mut lines, "q", "Quit");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 1 — Sectors");
    key(&mut lines, "j / k", "Move cursor down / up");
    key(&mut lines, "Space / Enter", "Toggle sector, custom mode, or ticker");
    key(&mut lines, "a", "Select all sectors");
    key(&mut lines, "d", "Deselect all sectors");
    key(&mut lines, "t", "Toggle the custom ticker picker");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 2 — Table");
    key(&mut lines, "j / k", "Scroll rows");
    key(&mut lines, "g / G", "Jump to top / bottom");
    key(&mut lines, "x", "Export the filtered table to SP500.csv");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 3 — Charts");
    key(&mut lines, "Enter", "Show plots for the current selection");
    key(&mut lines, "h / l", "Previous / next chart");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 4 — Help (this panel)");
    key(&mut lines, "e", "Open error history overlay");
    lines.push(Line::from(""));

    section(&mut lines, "Plotting");
    key(
        &mut lines,
        "default",
        "First five companies of the filtered table",
    );
    key(
        &mut lines,
        "custom",
        "Up to five tickers chosen in Panel 1's ticker list",
    );

    let para = Paragraph::new(lines);
    f.render_widget(para, area);
}

fn section<'a>(lines: &mut Vec<Line<'a>>, title: &str) {
    lines.push(Line::from(Span::styled(
        title.to_string(),
        theme::accent_bold(),
    )));
}

fn key<'a>(lines: &mut Vec<Line<'a>>, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {:>16}  ", keys), theme::accent()),
        Span::styled(desc.to_string(), theme::muted()),
    ]));
}
