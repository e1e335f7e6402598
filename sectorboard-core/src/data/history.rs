//! Year-to-date price history fan-out.
//!
//! One logical request per ticker, run concurrently on the rayon pool (this
//! program does not size or otherwise configure the pool). Per-ticker
//! failures are dropped from the result map and recorded separately; a
//! ticker absent from the map reads downstream as "not found", never as a
//! fatal error.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rayon::prelude::*;

use super::provider::{DataError, FetchProgress, PriceProvider, PriceSeries};

/// Result of a batch fetch: series keyed by ticker plus the failures that
/// were dropped from the map.
#[derive(Debug, Default)]
pub struct PriceHistory {
    pub series: BTreeMap<String, PriceSeries>,
    pub errors: Vec<(String, DataError)>,
}

impl PriceHistory {
    pub fn get(&self, ticker: &str) -> Option<&PriceSeries> {
        self.series.get(ticker)
    }

    pub fn contains(&self, ticker: &str) -> bool {
        self.series.contains_key(ticker)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// The year-to-date window: January 1 of `today`'s year through `today`.
pub fn ytd_range(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let jan1 = NaiveDate::from_ymd_opt(today.year(), 1, 1).expect("January 1 is valid");
    (jan1, today)
}

/// Fetch YTD daily closes for every ticker, concurrently.
///
/// Total over its input: an empty ticker list yields an empty history
/// without touching the provider.
pub fn fetch_ytd(
    provider: &dyn PriceProvider,
    tickers: &[String],
    today: NaiveDate,
    progress: &dyn FetchProgress,
) -> PriceHistory {
    let (start, end) = ytd_range(today);
    let total = tickers.len();

    let results: Vec<(String, Result<PriceSeries, DataError>)> = tickers
        .par_iter()
        .enumerate()
        .map(|(i, ticker)| {
            progress.on_start(ticker, i, total);
            let result = provider.fetch(ticker, start, end);
            let status = result.as_ref().map(|_| ()).map_err(|e| e.clone());
            progress.on_complete(ticker, i, total, &status);
            (ticker.clone(), result)
        })
        .collect();

    let mut history = PriceHistory::default();
    for (ticker, result) in results {
        match result {
            Ok(series) => {
                history.series.insert(ticker, series);
            }
            Err(e) => history.errors.push((ticker, e)),
        }
    }

    progress.on_batch_complete(history.len(), history.errors.len(), total);
    history
}
