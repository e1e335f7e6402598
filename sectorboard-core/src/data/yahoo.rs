//! Yahoo Finance price provider.
//!
//! Fetches daily closes from Yahoo's v8 chart API, adjusted for splits and
//! dividends, including pre/post-market data. Yahoo has no official API and
//! is subject to unannounced format changes; format surprises surface as
//! `DataError::ResponseFormat`.
//!
//! One attempt per request, no proxy, no configured timeout.

use chrono::NaiveDate;
use serde::Deserialize;

use super::provider::{DataError, PricePoint, PriceProvider, PriceSeries};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    adjclose: Vec<Option<f64>>,
}

/// Yahoo Finance data provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
}

impl YahooProvider {
    pub fn new() -> Self {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .expect("failed to build HTTP client");
        Self { client }
    }

    /// Build the chart API URL for a symbol and date range.
    fn chart_url(symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let start_ts = start
            .and_hms_opt(0, 0, 0)
            .expect("midnight is valid")
            .and_utc()
            .timestamp();
        let end_ts = end
            .and_hms_opt(23, 59, 59)
            .expect("end of day is valid")
            .and_utc()
            .timestamp();
        format!(
            "https://query2.finance.yahoo.com/v8/finance/chart/{symbol}\
             ?period1={start_ts}&period2={end_ts}&interval=1d\
             &includeAdjustedClose=true&includePrePost=true"
        )
    }

    /// Parse the chart API response into a close-price series.
    ///
    /// Uses the adjusted close where present (split/dividend adjustment),
    /// falling back to the raw close. Null bars (holidays, non-trading days)
    /// are skipped.
    fn parse_response(symbol: &str, resp: ChartResponse) -> Result<PriceSeries, DataError> {
        let result = resp.chart.result.ok_or_else(|| {
            if let Some(err) = resp.chart.error {
                if err.code == "Not Found" {
                    DataError::SymbolNotFound {
                        symbol: symbol.to_string(),
                    }
                } else {
                    DataError::ResponseFormat(format!("{}: {}", err.code, err.description))
                }
            } else {
                DataError::ResponseFormat("empty result with no error".into())
            }
        })?;

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormat("result array is empty".into()))?;

        let timestamps = data
            .timestamp
            .ok_or_else(|| DataError::ResponseFormat("no timestamps".into()))?;

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormat("no quote data".into()))?;

        let adj_closes = data
            .indicators
            .adjclose
            .and_then(|v| v.into_iter().next())
            .map(|a| a.adjclose);

        let mut series = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let date = chrono::DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.naive_utc().date())
                .ok_or_else(|| DataError::ResponseFormat(format!("invalid timestamp: {ts}")))?;

            let raw = quote.close.get(i).copied().flatten();
            let adj = adj_closes.as_ref().and_then(|v| v.get(i).copied().flatten());

            if let Some(close) = adj.or(raw) {
                series.push(PricePoint { date, close });
            }
        }

        if series.is_empty() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }

        Ok(series)
    }
}

impl Default for YahooProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataError> {
        let url = Self::chart_url(symbol, start, end);

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| DataError::Network(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        if !status.is_success() {
            return Err(DataError::Network(format!("HTTP {status} for {symbol}")));
        }

        let chart: ChartResponse = resp
            .json()
            .map_err(|e| DataError::ResponseFormat(format!("parse response for {symbol}: {e}")))?;

        Self::parse_response(symbol, chart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(body: &str) -> ChartResponse {
        serde_json::from_str(body).unwrap()
    }

    // Timestamps: 2024-01-02, 2024-01-03, 2024-01-04 (00:00 UTC).
    const OK_BODY: &str = r#"{
        "chart": {
            "result": [{
                "timestamp": [1704153600, 1704240000, 1704326400],
                "indicators": {
                    "quote": [{"close": [100.0, null, 103.0]}],
                    "adjclose": [{"adjclose": [99.5, null, 102.5]}]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn parses_adjusted_closes_and_skips_null_bars() {
        let series = YahooProvider::parse_response("AAPL", fixture(OK_BODY)).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(
            series[0].date,
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
        assert_eq!(series[0].close, 99.5);
        assert_eq!(series[1].close, 102.5);
    }

    #[test]
    fn falls_back_to_raw_close_without_adjclose() {
        let body = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1704153600],
                    "indicators": {"quote": [{"close": [100.0]}]}
                }],
                "error": null
            }
        }"#;
        let series = YahooProvider::parse_response("AAPL", fixture(body)).unwrap();
        assert_eq!(series[0].close, 100.0);
    }

    #[test]
    fn not_found_error_maps_to_symbol_not_found() {
        let body = r#"{
            "chart": {
                "result": null,
                "error": {"code": "Not Found", "description": "No data found"}
            }
        }"#;
        let err = YahooProvider::parse_response("ZZZZ", fixture(body)).unwrap_err();
        assert!(matches!(err, DataError::SymbolNotFound { .. }));
    }

    #[test]
    fn all_null_bars_is_symbol_not_found() {
        let body = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1704153600],
                    "indicators": {"quote": [{"close": [null]}]}
                }],
                "error": null
            }
        }"#;
        let err = YahooProvider::parse_response("HALT", fixture(body)).unwrap_err();
        assert!(matches!(err, DataError::SymbolNotFound { .. }));
    }

    #[test]
    fn chart_url_spans_whole_days() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let url = YahooProvider::chart_url("SPY", start, end);
        assert!(url.contains("/v8/finance/chart/SPY?"));
        assert!(url.contains("interval=1d"));
        assert!(url.contains("includeAdjustedClose=true"));
        assert!(url.contains("includePrePost=true"));
    }
}
