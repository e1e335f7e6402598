//! Chart construction.
//!
//! A chart is an explicit value built per call: title, axis titles, and the
//! ordered (date, close) points. The display layer decides how to draw it;
//! there is no shared canvas or implicit figure state between renders.

use chrono::NaiveDate;

use crate::data::history::PriceHistory;
use crate::data::provider::PricePoint;
use crate::model::CompanyTable;

/// A close-price chart for one ticker.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceChart {
    pub ticker: String,
    /// `"{ticker} ({security name})"`.
    pub title: String,
    pub x_title: &'static str,
    pub y_title: &'static str,
    /// Plotted points in date order, exactly as fetched.
    pub points: Vec<PricePoint>,
}

impl PriceChart {
    /// Smallest and largest close, for y-axis bounds.
    pub fn close_bounds(&self) -> Option<(f64, f64)> {
        let mut points = self.points.iter();
        let first = points.next()?.close;
        Some(points.fold((first, first), |(lo, hi), p| {
            (lo.min(p.close), hi.max(p.close))
        }))
    }

    /// First and last plotted date, for x-axis labels.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.points.first()?.date, self.points.last()?.date))
    }
}

/// Outcome of one render request.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartOutcome {
    Rendered(PriceChart),
    /// The ticker has no series in the fetched history. Non-fatal: the
    /// render pass continues with the remaining tickers.
    Missing { ticker: String },
}

impl ChartOutcome {
    /// User-visible warning text for the `Missing` case.
    pub fn warning(&self) -> Option<String> {
        match self {
            ChartOutcome::Rendered(_) => None,
            ChartOutcome::Missing { ticker } => {
                Some(format!("Data for symbol {ticker} not found"))
            }
        }
    }

    pub fn ticker(&self) -> &str {
        match self {
            ChartOutcome::Rendered(chart) => &chart.ticker,
            ChartOutcome::Missing { ticker } => ticker,
        }
    }
}

/// Build the chart for one ticker, or a `Missing` outcome when the fetched
/// history has no series for it.
///
/// The title's security name comes from the reference table; a ticker the
/// table does not know falls back to the bare ticker rather than failing
/// the whole render pass.
pub fn price_chart(ticker: &str, history: &PriceHistory, table: &CompanyTable) -> ChartOutcome {
    let Some(series) = history.get(ticker) else {
        return ChartOutcome::Missing {
            ticker: ticker.to_string(),
        };
    };

    let title = match table.security_for(ticker) {
        Some(security) => format!("{ticker} ({security})"),
        None => ticker.to_string(),
    };

    ChartOutcome::Rendered(PriceChart {
        ticker: ticker.to_string(),
        title,
        x_title: "Date",
        y_title: "Close Price",
        points: series.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::sample_table;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn history_with(ticker: &str, closes: &[(u32, f64)]) -> PriceHistory {
        let mut history = PriceHistory::default();
        history.series.insert(
            ticker.to_string(),
            closes
                .iter()
                .map(|&(d, close)| PricePoint { date: day(d), close })
                .collect(),
        );
        history
    }

    #[test]
    fn missing_ticker_yields_warning_and_no_chart() {
        let history = history_with("AAPL", &[(2, 100.0)]);
        let outcome = price_chart("ZZZZ", &history, &sample_table());
        assert_eq!(
            outcome.warning().as_deref(),
            Some("Data for symbol ZZZZ not found")
        );
        assert!(matches!(outcome, ChartOutcome::Missing { .. }));
    }

    #[test]
    fn chart_points_match_series_in_order() {
        // Scenario D: dates [D1,D2,D3], closes [100,105,103].
        let history = history_with("AAPL", &[(2, 100.0), (3, 105.0), (4, 103.0)]);
        let ChartOutcome::Rendered(chart) = price_chart("AAPL", &history, &sample_table()) else {
            panic!("expected a rendered chart");
        };
        let pairs: Vec<(NaiveDate, f64)> = chart.points.iter().map(|p| (p.date, p.close)).collect();
        assert_eq!(
            pairs,
            vec![(day(2), 100.0), (day(3), 105.0), (day(4), 103.0)]
        );
    }

    #[test]
    fn title_includes_security_name() {
        let history = history_with("AAPL", &[(2, 100.0)]);
        let ChartOutcome::Rendered(chart) = price_chart("AAPL", &history, &sample_table()) else {
            panic!("expected a rendered chart");
        };
        assert_eq!(chart.title, "AAPL (Apple Inc.)");
        assert_eq!(chart.x_title, "Date");
        assert_eq!(chart.y_title, "Close Price");
    }

    #[test]
    fn unknown_security_falls_back_to_ticker() {
        let history = history_with("QQQ", &[(2, 400.0)]);
        let ChartOutcome::Rendered(chart) = price_chart("QQQ", &history, &sample_table()) else {
            panic!("expected a rendered chart");
        };
        assert_eq!(chart.title, "QQQ");
    }

    #[test]
    fn close_bounds_and_date_span() {
        let history = history_with("AAPL", &[(2, 100.0), (3, 105.0), (4, 103.0)]);
        let ChartOutcome::Rendered(chart) = price_chart("AAPL", &history, &sample_table()) else {
            panic!("expected a rendered chart");
        };
        assert_eq!(chart.close_bounds(), Some((100.0, 105.0)));
        assert_eq!(chart.date_span(), Some((day(2), day(4))));
    }
}
