//! Pure in-memory filtering of the constituent table.

use std::collections::BTreeSet;

use crate::model::CompanyTable;

/// Hard cap on tickers plotted per render pass.
pub const MAX_PLOT_TICKERS: usize = 5;

/// Rows whose sector is in the selection, in original relative order.
///
/// An empty selection yields an empty table (header kept), not the full
/// table: nothing is shown until at least one sector is picked.
pub fn by_sector(table: &CompanyTable, sectors: &BTreeSet<String>) -> CompanyTable {
    table.subset(
        (0..table.row_count()).filter(|&i| sectors.contains(table.sector(i))),
    )
}

/// Re-validate the custom ticker selection: at most `MAX_PLOT_TICKERS`
/// entries, order preserved. The UI enforces the same cap at selection time.
pub fn restrict_tickers(mut tickers: Vec<String>) -> Vec<String> {
    tickers.truncate(MAX_PLOT_TICKERS);
    tickers
}

/// The tickers a plot pass iterates: the custom selection when one is
/// active, otherwise the first `MAX_PLOT_TICKERS` of the filtered table in
/// its current order.
pub fn plot_selection(filtered: &CompanyTable, custom: Option<&[String]>) -> Vec<String> {
    match custom {
        Some(chosen) => restrict_tickers(chosen.to_vec()),
        None => filtered
            .symbols()
            .take(MAX_PLOT_TICKERS)
            .map(String::from)
            .collect(),
    }
}
