//! CSV export of the (filtered) constituent table.
//!
//! The table serializes to CSV text in its own column order, header first,
//! and from there to a base64 `data:` URL suitable for a download link with
//! the fixed filename `SP500.csv`. An empty table still produces the header
//! row, so an empty sector selection exports a valid, header-only file.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::data::provider::DataError;
use crate::model::CompanyTable;

/// Fixed download filename.
pub const EXPORT_FILENAME: &str = "SP500.csv";

/// An encoded download link payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadPayload {
    pub filename: &'static str,
    /// `data:file/csv;base64,...`
    pub href: String,
}

/// Serialize the table to CSV text: header row, then rows in table order.
pub fn csv_text(table: &CompanyTable) -> Result<String, DataError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(table.header())
        .map_err(|e| DataError::Csv(e.to_string()))?;
    for row in table.rows() {
        writer
            .write_record(row)
            .map_err(|e| DataError::Csv(e.to_string()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| DataError::Csv(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| DataError::Csv(e.to_string()))
}

/// Encode the table as a clickable download payload.
pub fn download_payload(table: &CompanyTable) -> Result<DownloadPayload, DataError> {
    let csv = csv_text(table)?;
    let b64 = STANDARD.encode(csv.as_bytes());
    Ok(DownloadPayload {
        filename: EXPORT_FILENAME,
        href: format!("data:file/csv;base64,{b64}"),
    })
}

/// Write the CSV to a file (the TUI's export action).
pub fn write_csv(table: &CompanyTable, path: &Path) -> Result<(), DataError> {
    let csv = csv_text(table)?;
    std::fs::write(path, csv).map_err(|e| DataError::Csv(e.to_string()))
}
