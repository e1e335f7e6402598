//! Price provider trait and structured error types.
//!
//! The `PriceProvider` trait abstracts over the market-data source so the
//! fan-out and the UI can be tested against a mock.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One daily observation: date and (adjusted) closing price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Ordered daily closes for one ticker, year-to-date.
pub type PriceSeries = Vec<PricePoint>;

/// Error taxonomy for data operations.
///
/// Variants carry strings so errors can cross the TUI worker channel and be
/// recorded in the error history without holding source-library types.
#[derive(Debug, Clone, Error)]
pub enum DataError {
    #[error("network error: {0}")]
    Network(String),

    #[error("reference page has no parsable table: {0}")]
    ScrapeFailed(String),

    #[error("response format changed: {0}")]
    ResponseFormat(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("csv error: {0}")]
    Csv(String),
}

/// Trait for daily-close providers.
///
/// `Sync` because the fan-out hits one provider from many rayon workers.
pub trait PriceProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily closes for a symbol over a date range (inclusive).
    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate)
        -> Result<PriceSeries, DataError>;
}

/// Progress callbacks for multi-symbol fetches. Implementations must be
/// callable from parallel workers.
pub trait FetchProgress: Send + Sync {
    /// Called when starting to fetch a symbol.
    fn on_start(&self, symbol: &str, index: usize, total: usize);

    /// Called when a symbol fetch completes.
    fn on_complete(&self, symbol: &str, index: usize, total: usize, result: &Result<(), DataError>);

    /// Called when the entire batch is done.
    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize);
}

/// Progress reporter that prints to stdout (CLI use).
pub struct StdoutProgress;

impl FetchProgress for StdoutProgress {
    fn on_start(&self, symbol: &str, index: usize, total: usize) {
        println!("[{}/{}] Fetching {symbol}...", index + 1, total);
    }

    fn on_complete(
        &self,
        symbol: &str,
        _index: usize,
        _total: usize,
        result: &Result<(), DataError>,
    ) {
        match result {
            Ok(()) => println!("  OK: {symbol}"),
            Err(e) => println!("  FAIL: {symbol}: {e}"),
        }
    }

    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize) {
        println!("\nFetch complete: {succeeded}/{total} succeeded, {failed} failed");
    }
}

/// No-op progress reporter.
pub struct SilentProgress;

impl FetchProgress for SilentProgress {
    fn on_start(&self, _symbol: &str, _index: usize, _total: usize) {}
    fn on_complete(&self, _s: &str, _i: usize, _t: usize, _r: &Result<(), DataError>) {}
    fn on_batch_complete(&self, _succeeded: usize, _failed: usize, _total: usize) {}
}
