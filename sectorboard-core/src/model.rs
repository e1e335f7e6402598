//! Constituent table model.
//!
//! One `CompanyTable` holds the scraped reference table: the header row in
//! scrape order plus one row of cells per company. Three columns are
//! interpreted (Symbol, Security, GICS Sector); any further columns pass
//! through untouched so the scraper tolerates layout changes on the source
//! page.

use std::collections::BTreeSet;

use crate::data::provider::DataError;

/// The scraped constituent table. Rows keep scrape order; ticker symbols are
/// assumed unique within the table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyTable {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    symbol_col: usize,
    security_col: usize,
    sector_col: usize,
}

impl CompanyTable {
    /// Build a table from a header row and data rows.
    ///
    /// Locates the three required columns by (case-insensitive) header name
    /// and normalizes every row to the header's width.
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, DataError> {
        let find = |name: &str| {
            header
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let symbol_col = find("Symbol")
            .ok_or_else(|| DataError::ScrapeFailed("no Symbol column in header".into()))?;
        let security_col = find("Security")
            .ok_or_else(|| DataError::ScrapeFailed("no Security column in header".into()))?;
        let sector_col = find("GICS Sector")
            .ok_or_else(|| DataError::ScrapeFailed("no GICS Sector column in header".into()))?;

        let width = header.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();

        Ok(Self {
            header,
            rows,
            symbol_col,
            security_col,
            sector_col,
        })
    }

    /// An empty table with no columns. Filtering an empty selection and the
    /// TUI's pre-load state both use this.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Ticker symbol of a row.
    pub fn symbol(&self, row: usize) -> &str {
        &self.rows[row][self.symbol_col]
    }

    /// Security name of a row.
    pub fn security(&self, row: usize) -> &str {
        &self.rows[row][self.security_col]
    }

    /// GICS sector of a row.
    pub fn sector(&self, row: usize) -> &str {
        &self.rows[row][self.sector_col]
    }

    /// Ticker symbols in table (scrape) order.
    pub fn symbols(&self) -> impl Iterator<Item = &str> + '_ {
        self.rows.iter().map(|row| row[self.symbol_col].as_str())
    }

    /// Unique sector values, sorted. Drives the sector multiselect.
    pub fn sorted_sectors(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self.rows.iter().map(|r| r[self.sector_col].as_str()).collect();
        set.into_iter().map(String::from).collect()
    }

    /// Ticker symbols, sorted. Drives the custom-ticker multiselect.
    pub fn sorted_symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self.symbols().map(String::from).collect();
        symbols.sort();
        symbols
    }

    /// Security name for a ticker, if the ticker is in the table.
    pub fn security_for(&self, symbol: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row[self.symbol_col] == symbol)
            .map(|row| row[self.security_col].as_str())
    }

    /// A new table with the same header and column mapping, keeping only the
    /// given rows (in the order given).
    pub(crate) fn subset(&self, indices: impl Iterator<Item = usize>) -> Self {
        Self {
            header: self.header.clone(),
            rows: indices.map(|i| self.rows[i].clone()).collect(),
            symbol_col: self.symbol_col,
            security_col: self.security_col,
            sector_col: self.sector_col,
        }
    }
}

/// Small fixture table shared by tests across the crate.
#[cfg(test)]
pub(crate) fn sample_table() -> CompanyTable {
    CompanyTable::new(
        vec![
            "Symbol".into(),
            "Security".into(),
            "GICS Sector".into(),
            "Headquarters".into(),
        ],
        vec![
            vec!["MMM".into(), "3M".into(), "Industrials".into(), "Saint Paul".into()],
            vec!["AAPL".into(), "Apple Inc.".into(), "Information Technology".into(), "Cupertino".into()],
            vec!["ABT".into(), "Abbott".into(), "Health Care".into(), "North Chicago".into()],
        ],
    )
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CompanyTable {
        sample_table()
    }

    #[test]
    fn required_columns_located() {
        let t = sample();
        assert_eq!(t.symbol(0), "MMM");
        assert_eq!(t.security(1), "Apple Inc.");
        assert_eq!(t.sector(2), "Health Care");
    }

    #[test]
    fn missing_required_column_rejected() {
        let err = CompanyTable::new(
            vec!["Symbol".into(), "Security".into()],
            vec![],
        )
        .unwrap_err();
        assert!(err.to_string().contains("GICS Sector"));
    }

    #[test]
    fn required_columns_found_anywhere_in_header() {
        // Column order is not assumed — only header names are.
        let t = CompanyTable::new(
            vec!["Founded".into(), "GICS Sector".into(), "Symbol".into(), "Security".into()],
            vec![vec!["1998".into(), "Energy".into(), "XOM".into(), "Exxon".into()]],
        )
        .unwrap();
        assert_eq!(t.symbol(0), "XOM");
        assert_eq!(t.sector(0), "Energy");
    }

    #[test]
    fn short_rows_padded_to_header_width() {
        let t = CompanyTable::new(
            vec!["Symbol".into(), "Security".into(), "GICS Sector".into(), "CIK".into()],
            vec![vec!["T".into(), "AT&T".into(), "Communication Services".into()]],
        )
        .unwrap();
        assert_eq!(t.rows()[0].len(), 4);
        assert_eq!(t.rows()[0][3], "");
    }

    #[test]
    fn sorted_sectors_unique_and_sorted() {
        let t = sample();
        assert_eq!(
            t.sorted_sectors(),
            vec!["Health Care", "Industrials", "Information Technology"]
        );
    }

    #[test]
    fn security_lookup() {
        let t = sample();
        assert_eq!(t.security_for("AAPL"), Some("Apple Inc."));
        assert_eq!(t.security_for("ZZZZ"), None);
    }

    #[test]
    fn subset_preserves_order_and_header() {
        let t = sample();
        let s = t.subset([2usize, 0].into_iter());
        assert_eq!(s.header(), t.header());
        assert_eq!(s.symbol(0), "ABT");
        assert_eq!(s.symbol(1), "MMM");
    }
}
