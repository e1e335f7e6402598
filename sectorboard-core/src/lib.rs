//! Sectorboard core — S&P 500 constituent data and year-to-date price history.
//!
//! This crate holds everything the interactive shell and the CLI share:
//! - The constituent table model (header + rows in scrape order)
//! - The Wikipedia loader and its session-lifetime memo cache
//! - Pure sector/ticker filtering
//! - CSV export encoding (text, data-URL payload, file write)
//! - The Yahoo Finance price provider and the concurrent YTD fan-out
//! - Chart construction (explicit chart values, no shared canvas)

pub mod chart;
pub mod data;
pub mod export;
pub mod filter;
pub mod model;

pub use model::CompanyTable;
