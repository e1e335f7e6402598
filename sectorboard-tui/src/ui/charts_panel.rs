//! Panel 3 — Charts: YTD close-price line chart, one ticker at a time.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Chart, Dataset, GraphType, Paragraph};
use ratatui::Frame;

use sectorboard_core::chart::{ChartOutcome, PriceChart};

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    if app.charts.outcomes.is_empty() {
        render_empty(f, area, app);
        return;
    }

    // One line of chart navigation on top, the chart (or warning) below.
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(3)])
        .split(area);

    render_nav(f, chunks[0], app);

    match &app.charts.outcomes[app.charts.index] {
        ChartOutcome::Rendered(chart) => render_chart(f, chunks[1], chart),
        outcome @ ChartOutcome::Missing { .. } => render_missing(f, chunks[1], outcome),
    }
}

fn render_empty(f: &mut Frame, area: Rect, app: &AppState) {
    let hint = if app.fetch.in_progress {
        "Price history is still loading..."
    } else if app.sectors.selected.is_empty() {
        "Select sectors in Panel 1, then press Enter here to show plots."
    } else {
        "Press Enter to show plots for the current selection."
    };
    let lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(hint, theme::muted())),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

fn render_nav(f: &mut Frame, area: Rect, app: &AppState) {
    let mut spans: Vec<Span> = vec![Span::styled("Charts: ", theme::muted())];
    for (i, outcome) in app.charts.outcomes.iter().enumerate() {
        let style = if i == app.charts.index {
            theme::accent_bold()
        } else {
            match outcome {
                ChartOutcome::Rendered(_) => theme::neutral(),
                ChartOutcome::Missing { .. } => theme::warning(),
            }
        };
        spans.push(Span::styled(format!(" {} ", outcome.ticker()), style));
    }
    spans.push(Span::styled("  [h/l]cycle [Enter]refresh", theme::muted()));
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_missing(f: &mut Frame, area: Rect, outcome: &ChartOutcome) {
    let msg = outcome
        .warning()
        .unwrap_or_else(|| "No data for this ticker".to_string());
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(msg, theme::warning())),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

fn render_chart(f: &mut Frame, area: Rect, chart: &PriceChart) {
    let (Some((min_close, max_close)), Some((first, last))) =
        (chart.close_bounds(), chart.date_span())
    else {
        let lines = vec![Line::from(Span::styled(
            format!("No price points for {}", chart.ticker),
            theme::warning(),
        ))];
        f.render_widget(Paragraph::new(lines), area);
        return;
    };

    let padding = (max_close - min_close).abs() * 0.05;
    let y_min = min_close - padding;
    let y_max = max_close + padding;
    let x_max = chart.points.len().saturating_sub(1) as f64;

    let data: Vec<(f64, f64)> = chart
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.close))
        .collect();

    let dataset = Dataset::default()
        .name(chart.title.as_str())
        .marker(symbols::Marker::Braille)
        .style(Style::default().fg(theme::ACCENT))
        .graph_type(GraphType::Line)
        .data(&data);

    let widget = Chart::new(vec![dataset])
        .x_axis(
            Axis::default()
                .title(Span::styled(chart.x_title, theme::muted()))
                .style(theme::muted())
                .bounds([0.0, x_max.max(1.0)])
                .labels(vec![
                    Span::styled(first.format("%Y-%m-%d").to_string(), theme::muted()),
                    Span::styled(last.format("%Y-%m-%d").to_string(), theme::muted()),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled(chart.y_title, theme::muted()))
                .style(theme::muted())
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::styled(format!("{y_min:.2}"), theme::muted()),
                    Span::styled(format!("{y_max:.2}"), theme::muted()),
                ]),
        );

    f.render_widget(widget, area);
}
