//! Wikipedia constituent loader.
//!
//! Fetches the S&P 500 constituent page and parses the first well-formed
//! HTML table: first row is the header, every later row one company. The
//! page carries more tables (selected changes, index facts); only the first
//! one with a usable header is taken, matching how the source page has been
//! laid out for years. No retry logic; failures propagate to the caller.

use reqwest::blocking::Client;

use super::html;
use super::provider::DataError;
use crate::model::CompanyTable;

/// Fixed source page for the constituent table.
pub const CONSTITUENTS_URL: &str = "https://en.wikipedia.org/wiki/List_of_S%26P_500_companies";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Constituent source backed by the Wikipedia page.
pub struct WikiSource {
    client: Client,
}

impl WikiSource {
    pub fn new() -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .expect("failed to build HTTP client");
        Self { client }
    }

    /// Fetch and parse the constituent table.
    pub fn fetch(&self) -> Result<CompanyTable, DataError> {
        let resp = self
            .client
            .get(CONSTITUENTS_URL)
            .send()
            .map_err(|e| DataError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DataError::Network(format!(
                "HTTP {status} for {CONSTITUENTS_URL}"
            )));
        }

        let body = resp.text().map_err(|e| DataError::Network(e.to_string()))?;
        parse_constituents(&body)
    }
}

impl Default for WikiSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse the first well-formed table out of a page.
///
/// Well-formed means: a header row naming the required columns and at least
/// one data row. Tables earlier in the document that fail that bar are
/// skipped rather than treated as fatal.
pub fn parse_constituents(page: &str) -> Result<CompanyTable, DataError> {
    let mut at = 0;
    let mut last_err = None;

    while let Some((start, end)) = html::next_block(page, "table", at) {
        at = end;
        match parse_table(&page[start..end]) {
            Ok(table) if !table.is_empty() => return Ok(table),
            Ok(_) => last_err = Some(DataError::ScrapeFailed("table has no data rows".into())),
            Err(e) => last_err = Some(e),
        }
    }

    Err(last_err.unwrap_or_else(|| DataError::ScrapeFailed("no <table> in page".into())))
}

fn parse_table(table: &str) -> Result<CompanyTable, DataError> {
    let mut header: Option<Vec<String>> = None;
    let mut rows: Vec<Vec<String>> = Vec::new();

    let mut at = 0;
    while let Some((start, end)) = html::next_block(table, "tr", at) {
        at = end;
        let cells = row_cells(html::inner(&table[start..end]));
        if cells.is_empty() {
            continue;
        }
        match header {
            None => header = Some(cells),
            Some(_) => rows.push(cells),
        }
    }

    let header = header.ok_or_else(|| DataError::ScrapeFailed("table has no rows".into()))?;
    CompanyTable::new(header, rows)
}

/// Extract the cell texts of one row, `<th>` and `<td>` in document order.
fn row_cells(row: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut at = 0;
    loop {
        let th = html::next_block(row, "th", at);
        let td = html::next_block(row, "td", at);
        let block = match (th, td) {
            (Some(a), Some(b)) => {
                if a.0 < b.0 {
                    a
                } else {
                    b
                }
            }
            (Some(a), None) => a,
            (None, Some(b)) => b,
            (None, None) => break,
        };
        cells.push(html::text(html::inner(&row[block.0..block.1])));
        at = block.1;
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
    <html><body>
    <p>Intro prose with a stray &lt;table&gt; mention.</p>
    <table class="wikitable sortable" id="constituents">
      <tbody>
        <tr>
          <th>Symbol</th><th>Security</th><th>GICS Sector</th><th>GICS Sub-Industry</th>
        </tr>
        <tr>
          <td><a href="/q?s=MMM">MMM</a></td>
          <td><a href="/wiki/3M">3M</a></td>
          <td>Industrials</td>
          <td>Industrial Conglomerates</td>
        </tr>
        <tr>
          <td>AAPL</td>
          <td>Apple Inc.</td>
          <td>Information Technology</td>
          <td>Technology Hardware, Storage &amp; Peripherals</td>
        </tr>
      </tbody>
    </table>
    <table><tr><th>Date</th><th>Added</th></tr><tr><td>2024</td><td>X</td></tr></table>
    </body></html>"#;

    #[test]
    fn parses_first_well_formed_table() {
        let t = parse_constituents(PAGE).unwrap();
        assert_eq!(t.row_count(), 2);
        assert_eq!(t.column_count(), 4);
        assert_eq!(t.symbol(0), "MMM");
        assert_eq!(t.security(0), "3M");
        assert_eq!(t.sector(1), "Information Technology");
        // Passthrough column survives with entities decoded.
        assert_eq!(t.rows()[1][3], "Technology Hardware, Storage & Peripherals");
    }

    #[test]
    fn header_taken_from_first_row() {
        let t = parse_constituents(PAGE).unwrap();
        assert_eq!(
            t.header(),
            &["Symbol", "Security", "GICS Sector", "GICS Sub-Industry"]
        );
    }

    #[test]
    fn skips_leading_tables_without_required_columns() {
        let page = r#"
        <table><tr><th>Nav</th></tr><tr><td>links</td></tr></table>
        <table>
          <tr><th>Symbol</th><th>Security</th><th>GICS Sector</th></tr>
          <tr><td>XOM</td><td>Exxon Mobil</td><td>Energy</td></tr>
        </table>"#;
        let t = parse_constituents(page).unwrap();
        assert_eq!(t.symbol(0), "XOM");
    }

    #[test]
    fn page_without_tables_fails() {
        let err = parse_constituents("<html><p>nothing</p></html>").unwrap_err();
        assert!(matches!(err, DataError::ScrapeFailed(_)));
    }

    #[test]
    fn table_with_header_only_fails() {
        let page = "<table><tr><th>Symbol</th><th>Security</th><th>GICS Sector</th></tr></table>";
        let err = parse_constituents(page).unwrap_err();
        assert!(matches!(err, DataError::ScrapeFailed(_)));
    }

    #[test]
    fn mixed_th_td_rows_keep_document_order() {
        // Some wikitables mark the first data cell as <th scope="row">.
        let page = r#"<table>
          <tr><th>Symbol</th><th>Security</th><th>GICS Sector</th></tr>
          <tr><th scope="row">JNJ</th><td>Johnson &amp; Johnson</td><td>Health Care</td></tr>
        </table>"#;
        let t = parse_constituents(page).unwrap();
        assert_eq!(t.symbol(0), "JNJ");
        assert_eq!(t.security(0), "Johnson & Johnson");
    }
}
