//! Application state — single-owner, main-thread only.
//!
//! All TUI state lives here. The worker thread communicates via channels.
//! Every selection mutation funnels through `recompute_filtered`, which
//! re-derives the filtered table and re-triggers the price fetch — the
//! observable "recompute everything on every interaction" behavior.

use std::collections::{BTreeSet, VecDeque};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;

use chrono::NaiveDateTime;

use sectorboard_core::chart::{price_chart, ChartOutcome};
use sectorboard_core::data::PriceHistory;
use sectorboard_core::filter::{self, MAX_PLOT_TICKERS};
use sectorboard_core::CompanyTable;

use crate::worker::{WorkerCommand, WorkerResponse};

/// Which panel is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Sectors,
    Table,
    Charts,
    Help,
}

impl Panel {
    pub fn index(self) -> usize {
        match self {
            Panel::Sectors => 0,
            Panel::Table => 1,
            Panel::Charts => 2,
            Panel::Help => 3,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(Panel::Sectors),
            1 => Some(Panel::Table),
            2 => Some(Panel::Charts),
            3 => Some(Panel::Help),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Panel::Sectors => "Sectors",
            Panel::Table => "Table",
            Panel::Charts => "Charts",
            Panel::Help => "Help",
        }
    }

    pub fn next(self) -> Panel {
        Panel::from_index((self.index() + 1) % 4).expect("panel index in range")
    }

    pub fn prev(self) -> Panel {
        Panel::from_index((self.index() + 3) % 4).expect("panel index in range")
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// An error record for the error history overlay.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub category: ErrorCategory,
    pub message: String,
    pub context: String,
}

/// Error category for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Other,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Network => "NET",
            ErrorCategory::Data => "DATA",
            ErrorCategory::Other => "ERR",
        }
    }
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    ErrorHistory,
}

/// One row of the sectors panel's composite list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectorRow {
    Sector(String),
    CustomToggle,
    Ticker(String),
}

/// Sectors panel state: the sector multiselect, the custom-ticker toggle
/// and its capped multiselect.
#[derive(Debug, Default)]
pub struct SectorsPanelState {
    pub selected: BTreeSet<String>,
    pub custom_enabled: bool,
    /// Ordered custom selection, at most `MAX_PLOT_TICKERS` entries.
    pub chosen_tickers: Vec<String>,
    pub cursor: usize,
}

/// In-flight fetch bookkeeping.
#[derive(Debug, Default)]
pub struct FetchState {
    pub in_progress: bool,
    pub current_symbol: Option<String>,
    pub done: usize,
    pub total: usize,
    /// Tags each fetch; stale completions are discarded (no cancellation,
    /// the newest selection's results win).
    pub generation: u64,
}

/// Charts panel state: the outcomes of the last "Show Plots" pass.
#[derive(Debug, Default)]
pub struct ChartsPanelState {
    pub outcomes: Vec<ChartOutcome>,
    pub index: usize,
}

/// Top-level application state.
pub struct AppState {
    pub active_panel: Panel,
    pub running: bool,

    // Reference table (session-cached in the worker) and its filtered view.
    pub table: Option<Arc<CompanyTable>>,
    pub table_loading: bool,
    pub filtered: CompanyTable,

    // Panel states
    pub sectors: SectorsPanelState,
    pub table_scroll: usize,
    pub charts: ChartsPanelState,

    // Price history for the current filtered set.
    pub fetch: FetchState,
    pub history: Option<PriceHistory>,

    // Worker communication
    pub worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,

    // Cross-cutting
    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,
    pub overlay: Overlay,
}

impl AppState {
    pub fn new(worker_tx: Sender<WorkerCommand>, worker_rx: Receiver<WorkerResponse>) -> Self {
        Self {
            active_panel: Panel::Sectors,
            running: true,
            table: None,
            table_loading: false,
            filtered: CompanyTable::empty(),
            sectors: SectorsPanelState::default(),
            table_scroll: 0,
            charts: ChartsPanelState::default(),
            fetch: FetchState::default(),
            history: None,
            worker_tx,
            worker_rx,
            status_message: None,
            error_history: VecDeque::with_capacity(50),
            error_scroll: 0,
            overlay: Overlay::None,
        }
    }

    /// Ask the worker for the constituent table (cache hit unless `force`).
    pub fn request_table_load(&mut self, force: bool) {
        self.table_loading = true;
        let _ = self.worker_tx.send(WorkerCommand::LoadTable { force });
        self.set_status(if force {
            "Reloading constituent table..."
        } else {
            "Loading constituent table..."
        });
    }

    /// Install a freshly loaded table and recompute everything below it.
    pub fn apply_table(&mut self, table: Arc<CompanyTable>) {
        self.table_loading = false;
        self.set_status(format!(
            "Loaded {} constituents, {} columns",
            table.row_count(),
            table.column_count()
        ));
        self.table = Some(table);
        self.recompute_filtered();
    }

    /// Sorted unique sector values driving the multiselect.
    pub fn sector_names(&self) -> Vec<String> {
        self.table
            .as_ref()
            .map(|t| t.sorted_sectors())
            .unwrap_or_default()
    }

    /// Companies in a sector, for the row labels.
    pub fn sector_company_count(&self, sector: &str) -> usize {
        self.table
            .as_ref()
            .map(|t| (0..t.row_count()).filter(|&i| t.sector(i) == sector).count())
            .unwrap_or(0)
    }

    /// The sectors panel's composite row list: sectors, the custom toggle,
    /// then (when the toggle is on) the filtered table's tickers, sorted.
    pub fn sector_rows(&self) -> Vec<SectorRow> {
        let mut rows: Vec<SectorRow> = self
            .sector_names()
            .into_iter()
            .map(SectorRow::Sector)
            .collect();
        rows.push(SectorRow::CustomToggle);
        if self.sectors.custom_enabled {
            rows.extend(self.filtered.sorted_symbols().into_iter().map(SectorRow::Ticker));
        }
        rows
    }

    /// The row under the sectors panel cursor.
    pub fn cursor_row(&self) -> Option<SectorRow> {
        self.sector_rows().into_iter().nth(self.sectors.cursor)
    }

    /// Re-derive the filtered view and re-trigger the price fetch.
    ///
    /// Runs after every selection mutation. The fetch covers the full
    /// filtered ticker set, not just what will be plotted.
    pub fn recompute_filtered(&mut self) {
        let Some(table) = self.table.clone() else {
            return;
        };

        self.filtered = filter::by_sector(&table, &self.sectors.selected);
        self.table_scroll = 0;
        self.charts = ChartsPanelState::default();
        self.history = None;

        // Prune the custom selection to tickers still in view.
        let available: BTreeSet<String> = self.filtered.symbols().map(String::from).collect();
        self.sectors.chosen_tickers.retain(|t| available.contains(t));

        let row_count = self.sector_rows().len();
        if self.sectors.cursor >= row_count {
            self.sectors.cursor = row_count.saturating_sub(1);
        }

        if self.sectors.selected.is_empty() {
            self.fetch = FetchState {
                generation: self.fetch.generation,
                ..FetchState::default()
            };
            return;
        }

        let tickers: Vec<String> = self.filtered.symbols().map(String::from).collect();
        self.start_fetch(tickers);
    }

    fn start_fetch(&mut self, tickers: Vec<String>) {
        self.fetch.generation += 1;
        self.fetch.in_progress = true;
        self.fetch.current_symbol = None;
        self.fetch.done = 0;
        self.fetch.total = tickers.len();
        let _ = self.worker_tx.send(WorkerCommand::FetchHistory {
            tickers,
            generation: self.fetch.generation,
        });
    }

    pub fn toggle_sector(&mut self, name: &str) {
        if !self.sectors.selected.remove(name) {
            self.sectors.selected.insert(name.to_string());
        }
        self.recompute_filtered();
    }

    pub fn select_all_sectors(&mut self) {
        self.sectors.selected = self.sector_names().into_iter().collect();
        self.recompute_filtered();
    }

    pub fn deselect_all_sectors(&mut self) {
        self.sectors.selected.clear();
        self.recompute_filtered();
    }

    /// Toggle the custom-ticker multiselect. Turning it off reverts plotting
    /// to the first-five default.
    pub fn toggle_custom(&mut self) {
        self.sectors.custom_enabled = !self.sectors.custom_enabled;
        if !self.sectors.custom_enabled {
            self.sectors.chosen_tickers.clear();
        }
        let row_count = self.sector_rows().len();
        if self.sectors.cursor >= row_count {
            self.sectors.cursor = row_count.saturating_sub(1);
        }
    }

    /// Toggle one ticker in the custom selection, refusing a sixth pick.
    pub fn toggle_ticker(&mut self, ticker: &str) {
        if let Some(pos) = self.sectors.chosen_tickers.iter().position(|t| t == ticker) {
            self.sectors.chosen_tickers.remove(pos);
            return;
        }
        if self.sectors.chosen_tickers.len() >= MAX_PLOT_TICKERS {
            self.set_warning(format!("At most {MAX_PLOT_TICKERS} tickers can be plotted"));
            return;
        }
        self.sectors.chosen_tickers.push(ticker.to_string());
    }

    /// The "Show Plots" action: build one chart outcome per selected ticker.
    pub fn show_plots(&mut self) {
        if self.sectors.selected.is_empty() {
            self.set_warning("Select at least one sector first");
            return;
        }
        if self.history.is_none() {
            self.set_warning("Price history still loading...");
            return;
        }

        let custom: Option<Vec<String>> = self
            .sectors
            .custom_enabled
            .then(|| filter::restrict_tickers(self.sectors.chosen_tickers.clone()));
        let tickers = filter::plot_selection(&self.filtered, custom.as_deref());

        let outcomes: Vec<ChartOutcome> = match (&self.history, &self.table) {
            (Some(history), Some(table)) => tickers
                .iter()
                .map(|t| price_chart(t, history, table))
                .collect(),
            _ => return,
        };

        if outcomes.is_empty() {
            self.set_warning("No tickers to plot");
            return;
        }
        let rendered = outcomes
            .iter()
            .filter(|o| matches!(o, ChartOutcome::Rendered(_)))
            .count();
        self.set_status(format!("Rendered {rendered}/{} charts", outcomes.len()));
        self.charts = ChartsPanelState { outcomes, index: 0 };
    }

    /// Push an error to the history and surface it in the status bar.
    pub fn push_error(&mut self, category: ErrorCategory, message: String, context: String) {
        self.status_message = Some((message.clone(), StatusLevel::Error));
        self.record_error(category, message, context);
    }

    /// Record an error in the history without touching the status bar
    /// (per-ticker fetch failures are not individually surfaced).
    pub fn record_error(&mut self, category: ErrorCategory, message: String, context: String) {
        let record = ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message,
            context,
        };
        self.error_history.push_front(record);
        if self.error_history.len() > 50 {
            self.error_history.pop_back();
        }
    }

    /// Set an info status message.
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    /// Set a warning status message.
    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }
}
