//! Panel 2 — Table: the filtered constituent rows with a scrolling cursor.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use sectorboard_core::CompanyTable;

use crate::app::AppState;
use crate::theme;

/// Column widths for the scrolling text table.
const COL_WIDTHS: [usize; 3] = [8, 32, 24];

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let table = &app.filtered;
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(vec![
        Span::styled(
            format!("{} rows and {} columns", table.row_count(), table.column_count()),
            theme::accent(),
        ),
        Span::styled("  [j/k]scroll [g/G]top/bottom [x]export CSV", theme::muted()),
    ]));
    lines.push(Line::from(""));

    if table.is_empty() {
        lines.push(Line::from(Span::styled(
            "No rows. Select one or more sectors in Panel 1.",
            theme::muted(),
        )));
        f.render_widget(Paragraph::new(lines), area);
        return;
    }

    lines.push(Line::from(Span::styled(
        header_line(table),
        theme::accent_bold(),
    )));

    let visible = (area.height as usize).saturating_sub(3).max(1);
    let start = app.table_scroll.min(table.row_count().saturating_sub(1));
    let end = (start + visible).min(table.row_count());

    for i in start..end {
        let style = if i == app.table_scroll {
            theme::accent().add_modifier(Modifier::REVERSED)
        } else {
            theme::neutral()
        };
        lines.push(Line::from(Span::styled(row_line(table, i), style)));
    }

    f.render_widget(Paragraph::new(lines), area);
}

fn header_line(table: &CompanyTable) -> String {
    format_cells(table.header())
}

fn row_line(table: &CompanyTable, row: usize) -> String {
    format_cells(&table.rows()[row])
}

/// Fixed-width first columns, remaining cells joined as-is.
fn format_cells(cells: &[String]) -> String {
    let mut out = String::new();
    for (i, cell) in cells.iter().enumerate() {
        match COL_WIDTHS.get(i) {
            Some(&w) => {
                let truncated: String = cell.chars().take(w).collect();
                out.push_str(&format!("{truncated:<w$}  "));
            }
            None => {
                out.push_str(cell);
                out.push_str("  ");
            }
        }
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_are_padded_and_truncated() {
        let line = format_cells(&[
            "AAPL".to_string(),
            "A very long security name that exceeds the column".to_string(),
        ]);
        assert!(line.starts_with("AAPL    "));
        assert!(line.len() <= 8 + 2 + 32 + 2);
    }

    #[test]
    fn extra_columns_pass_through() {
        let line = format_cells(&[
            "MMM".to_string(),
            "3M".to_string(),
            "Industrials".to_string(),
            "Saint Paul, Minnesota".to_string(),
        ]);
        assert!(line.ends_with("Saint Paul, Minnesota"));
    }
}
