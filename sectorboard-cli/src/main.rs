//! SectorBoard CLI — headless access to the same pipeline as the TUI.
//!
//! Commands:
//! - `table` — scrape the S&P 500 constituent table, optionally filtered by sector
//! - `export` — write the (filtered) table to SP500.csv, or print a data link
//! - `prices` — fetch YTD daily closes for tickers and print a summary
//! - `chart` — print an ASCII close-price sparkline for up to five tickers

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use sectorboard_core::chart::{price_chart, ChartOutcome};
use sectorboard_core::data::{fetch_ytd, ytd_range, StdoutProgress, WikiSource, YahooProvider};
use sectorboard_core::export::{self, EXPORT_FILENAME};
use sectorboard_core::filter::{self, MAX_PLOT_TICKERS};
use sectorboard_core::CompanyTable;

#[derive(Parser)]
#[command(
    name = "sectorboard",
    about = "SectorBoard CLI — S&P 500 sector explorer"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the constituent table from Wikipedia and print it.
    Table {
        /// Restrict to these GICS sectors (repeatable).
        #[arg(long = "sector")]
        sectors: Vec<String>,

        /// Print only the sorted list of sectors.
        #[arg(long, default_value_t = false)]
        list_sectors: bool,

        /// Print raw CSV instead of the tab-separated view.
        #[arg(long, default_value_t = false)]
        csv: bool,
    },
    /// Export the (filtered) constituent table as CSV.
    Export {
        /// Restrict to these GICS sectors (repeatable).
        #[arg(long = "sector")]
        sectors: Vec<String>,

        /// Output file. Defaults to SP500.csv in the working directory.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Print a base64 data URL instead of writing a file.
        #[arg(long, default_value_t = false)]
        data_url: bool,
    },
    /// Fetch year-to-date daily closes and print a per-ticker summary.
    Prices {
        /// Tickers to fetch (e.g., AAPL MSFT).
        #[arg(required = true)]
        tickers: Vec<String>,
    },
    /// Print ASCII close-price sparklines for up to five tickers.
    Chart {
        /// Tickers to chart (at most five).
        #[arg(required = true)]
        tickers: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Table {
            sectors,
            list_sectors,
            csv,
        } => run_table(sectors, list_sectors, csv),
        Commands::Export {
            sectors,
            out,
            data_url,
        } => run_export(sectors, out, data_url),
        Commands::Prices { tickers } => run_prices(tickers),
        Commands::Chart { tickers } => run_chart(tickers),
    }
}

fn load_table() -> Result<CompanyTable> {
    let source = WikiSource::new();
    Ok(source.fetch()?)
}

/// Apply --sector filters, validating names against the scraped table.
fn filtered_view(table: &CompanyTable, sectors: &[String]) -> Result<CompanyTable> {
    if sectors.is_empty() {
        return Ok(table.clone());
    }
    let known: BTreeSet<String> = table.sorted_sectors().into_iter().collect();
    for sector in sectors {
        if !known.contains(sector) {
            bail!(
                "unknown sector '{sector}'. Valid: {}",
                known.iter().cloned().collect::<Vec<_>>().join(", ")
            );
        }
    }
    let selected: BTreeSet<String> = sectors.iter().cloned().collect();
    Ok(filter::by_sector(table, &selected))
}

fn run_table(sectors: Vec<String>, list_sectors: bool, csv: bool) -> Result<()> {
    let table = load_table()?;

    if list_sectors {
        for sector in table.sorted_sectors() {
            println!("{sector}");
        }
        return Ok(());
    }

    let view = filtered_view(&table, &sectors)?;
    if csv {
        print!("{}", export::csv_text(&view)?);
    } else {
        println!("{}", view.header().join("\t"));
        for row in view.rows() {
            println!("{}", row.join("\t"));
        }
        eprintln!("{} rows and {} columns", view.row_count(), view.column_count());
    }
    Ok(())
}

fn run_export(sectors: Vec<String>, out: Option<PathBuf>, data_url: bool) -> Result<()> {
    let table = load_table()?;
    let view = filtered_view(&table, &sectors)?;

    if data_url {
        let payload = export::download_payload(&view)?;
        println!("{}", payload.href);
        return Ok(());
    }

    let path = out.unwrap_or_else(|| PathBuf::from(EXPORT_FILENAME));
    export::write_csv(&view, &path)?;
    println!("Wrote {} rows to {}", view.row_count(), path.display());
    Ok(())
}

fn run_prices(tickers: Vec<String>) -> Result<()> {
    let provider = YahooProvider::new();
    let today = chrono::Local::now().date_naive();
    let progress = StdoutProgress;

    let history = fetch_ytd(&provider, &tickers, today, &progress);

    let (start, end) = ytd_range(today);
    println!();
    println!("YTD window: {start} to {end}");
    for ticker in &tickers {
        match history.get(ticker) {
            Some(series) if !series.is_empty() => {
                let first = &series[0];
                let last = &series[series.len() - 1];
                let change = (last.close - first.close) / first.close * 100.0;
                println!(
                    "{:<8} {:>4} days  {:>10.2} -> {:>10.2}  ({change:+.2}%)",
                    ticker,
                    series.len(),
                    first.close,
                    last.close,
                );
            }
            _ => println!("{ticker:<8} no data"),
        }
    }

    // Per-ticker failures are warnings, not a command failure.
    for (sym, err) in &history.errors {
        eprintln!("Warning: {sym}: {err}");
    }
    Ok(())
}

fn run_chart(tickers: Vec<String>) -> Result<()> {
    if tickers.len() > MAX_PLOT_TICKERS {
        bail!("at most {MAX_PLOT_TICKERS} tickers can be charted");
    }

    let table = load_table()?;
    let provider = YahooProvider::new();
    let today = chrono::Local::now().date_naive();
    let history = fetch_ytd(&provider, &tickers, today, &StdoutProgress);

    for ticker in &tickers {
        match price_chart(ticker, &history, &table) {
            ChartOutcome::Rendered(chart) => {
                println!();
                println!("{}", chart.title);
                print_sparkline(&chart.points.iter().map(|p| p.close).collect::<Vec<_>>());
                if let (Some((lo, hi)), Some((first, last))) =
                    (chart.close_bounds(), chart.date_span())
                {
                    println!("{first} to {last}   low {lo:.2}   high {hi:.2}");
                }
            }
            outcome @ ChartOutcome::Missing { .. } => {
                if let Some(warning) = outcome.warning() {
                    println!();
                    println!("{warning}");
                }
            }
        }
    }
    Ok(())
}

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const SPARK_WIDTH: usize = 80;

/// Terminal rendition of a close-price line: downsample to at most 80
/// columns and map each close onto eight block levels.
fn print_sparkline(closes: &[f64]) {
    if closes.is_empty() {
        return;
    }
    let min = closes.iter().copied().fold(f64::INFINITY, f64::min);
    let max = closes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = (max - min).max(f64::EPSILON);

    let step = (closes.len() as f64 / SPARK_WIDTH as f64).max(1.0);
    let mut line = String::new();
    let mut i = 0.0;
    while (i as usize) < closes.len() {
        let close = closes[i as usize];
        let level = (((close - min) / span) * 7.0).round() as usize;
        line.push(SPARK_LEVELS[level.min(7)]);
        i += step;
    }
    println!("{line}");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> CompanyTable {
        CompanyTable::new(
            vec!["Symbol".into(), "Security".into(), "GICS Sector".into()],
            vec![
                vec!["AAPL".into(), "Apple Inc.".into(), "Information Technology".into()],
                vec!["JNJ".into(), "J&J".into(), "Health Care".into()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn filtered_view_rejects_unknown_sector() {
        let err = filtered_view(&table(), &["Utilities".to_string()]).unwrap_err();
        assert!(err.to_string().contains("unknown sector"));
    }

    #[test]
    fn filtered_view_keeps_matching_rows() {
        let view = filtered_view(&table(), &["Health Care".to_string()]).unwrap();
        assert_eq!(view.row_count(), 1);
        assert_eq!(view.symbol(0), "JNJ");
    }

    #[test]
    fn no_sectors_means_full_table() {
        let view = filtered_view(&table(), &[]).unwrap();
        assert_eq!(view.row_count(), 2);
    }
}
