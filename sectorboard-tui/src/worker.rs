//! Background worker thread.
//!
//! Owns the network clients and the session table cache so the render loop
//! never blocks on I/O. Commands come in over one channel, responses go
//! back over another; the main loop drains responses every tick.

use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use sectorboard_core::data::{
    fetch_ytd, DataError, FetchProgress, PriceHistory, TableCache, WikiSource, YahooProvider,
};
use sectorboard_core::CompanyTable;

/// Commands from the UI thread to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    LoadTable { force: bool },
    FetchHistory { tickers: Vec<String>, generation: u64 },
    Shutdown,
}

/// Responses from the worker back to the UI thread.
pub enum WorkerResponse {
    TableLoaded {
        table: Arc<CompanyTable>,
    },
    TableFailed {
        error: DataError,
    },
    FetchProgress {
        symbol: String,
        index: usize,
        total: usize,
        generation: u64,
    },
    FetchSymbolDone {
        symbol: String,
        error: Option<DataError>,
        generation: u64,
    },
    FetchDone {
        history: PriceHistory,
        generation: u64,
    },
}

/// Bridges per-symbol fetch callbacks onto the response channel.
///
/// The callbacks fire from rayon worker threads, so the sender sits
/// behind a mutex (`Sender` is not `Sync`).
struct ChannelProgress {
    tx: Mutex<Sender<WorkerResponse>>,
    generation: u64,
}

impl FetchProgress for ChannelProgress {
    fn on_start(&self, symbol: &str, index: usize, total: usize) {
        let tx = self.tx.lock().expect("progress sender lock poisoned");
        let _ = tx.send(WorkerResponse::FetchProgress {
            symbol: symbol.to_string(),
            index,
            total,
            generation: self.generation,
        });
    }

    fn on_complete(
        &self,
        symbol: &str,
        _index: usize,
        _total: usize,
        result: &Result<(), DataError>,
    ) {
        let tx = self.tx.lock().expect("progress sender lock poisoned");
        let _ = tx.send(WorkerResponse::FetchSymbolDone {
            symbol: symbol.to_string(),
            error: result.as_ref().err().cloned(),
            generation: self.generation,
        });
    }

    fn on_batch_complete(&self, _succeeded: usize, _failed: usize, _total: usize) {}
}

/// Spawn the worker thread. Returns its join handle; the thread exits on
/// `Shutdown` or when the command channel closes.
pub fn spawn(rx: Receiver<WorkerCommand>, tx: Sender<WorkerResponse>) -> JoinHandle<()> {
    std::thread::Builder::new()
        .name("sectorboard-worker".to_string())
        .spawn(move || run(rx, tx))
        .expect("failed to spawn worker thread")
}

fn run(rx: Receiver<WorkerCommand>, tx: Sender<WorkerResponse>) {
    let cache = TableCache::new();
    let wiki = WikiSource::new();
    let yahoo = YahooProvider::new();

    while let Ok(cmd) = rx.recv() {
        match cmd {
            WorkerCommand::LoadTable { force } => {
                if force {
                    cache.invalidate();
                }
                match cache.load_with(|| wiki.fetch()) {
                    Ok(table) => {
                        let _ = tx.send(WorkerResponse::TableLoaded { table });
                    }
                    Err(error) => {
                        let _ = tx.send(WorkerResponse::TableFailed { error });
                    }
                }
            }
            WorkerCommand::FetchHistory { tickers, generation } => {
                let today = chrono::Local::now().date_naive();
                let progress = ChannelProgress {
                    tx: Mutex::new(tx.clone()),
                    generation,
                };
                let history = fetch_ytd(&yahoo, &tickers, today, &progress);
                let _ = tx.send(WorkerResponse::FetchDone { history, generation });
            }
            WorkerCommand::Shutdown => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn worker_shuts_down_on_command() {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, _resp_rx) = mpsc::channel();
        let handle = spawn(cmd_rx, resp_tx);
        cmd_tx.send(WorkerCommand::Shutdown).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn worker_exits_when_channel_closes() {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, _resp_rx) = mpsc::channel();
        let handle = spawn(cmd_rx, resp_tx);
        drop(cmd_tx);
        handle.join().unwrap();
    }

    #[test]
    fn channel_progress_forwards_events() {
        let (tx, rx) = mpsc::channel();
        let progress = ChannelProgress {
            tx: Mutex::new(tx),
            generation: 7,
        };
        progress.on_start("AAPL", 0, 2);
        progress.on_complete("AAPL", 0, 2, &Ok(()));
        progress.on_complete(
            "ZZZZ",
            1,
            2,
            &Err(DataError::SymbolNotFound {
                symbol: "ZZZZ".into(),
            }),
        );

        match rx.try_recv().unwrap() {
            WorkerResponse::FetchProgress {
                symbol, generation, ..
            } => {
                assert_eq!(symbol, "AAPL");
                assert_eq!(generation, 7);
            }
            _ => panic!("expected progress event"),
        }
        match rx.try_recv().unwrap() {
            WorkerResponse::FetchSymbolDone { error, .. } => assert!(error.is_none()),
            _ => panic!("expected completion event"),
        }
        match rx.try_recv().unwrap() {
            WorkerResponse::FetchSymbolDone { symbol, error, .. } => {
                assert_eq!(symbol, "ZZZZ");
                assert!(error.is_some());
            }
            _ => panic!("expected completion event"),
        }
    }
}
