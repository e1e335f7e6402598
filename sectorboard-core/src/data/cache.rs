//! Session-lifetime memo for the constituent table.
//!
//! The underlying fetch-and-parse runs at most once per session; every later
//! `load_with` call returns the memoized table. The cache is a constructed
//! object owned by whoever drives the loader (the TUI worker, a test), with
//! an explicit invalidation hook — no global state.

use std::sync::{Arc, Mutex};

use super::provider::DataError;
use crate::model::CompanyTable;

/// In-memory memo of the loaded constituent table.
#[derive(Default)]
pub struct TableCache {
    slot: Mutex<Option<Arc<CompanyTable>>>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached table, running `fetch` only on a cold cache.
    ///
    /// A failed fetch leaves the cache cold, so the next call tries again.
    pub fn load_with<F>(&self, fetch: F) -> Result<Arc<CompanyTable>, DataError>
    where
        F: FnOnce() -> Result<CompanyTable, DataError>,
    {
        let mut slot = self.slot.lock().expect("table cache lock poisoned");
        if let Some(table) = slot.as_ref() {
            return Ok(Arc::clone(table));
        }
        let table = Arc::new(fetch()?);
        *slot = Some(Arc::clone(&table));
        Ok(table)
    }

    /// Drop the memoized table; the next `load_with` re-fetches.
    pub fn invalidate(&self) {
        let mut slot = self.slot.lock().expect("table cache lock poisoned");
        *slot = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.slot
            .lock()
            .expect("table cache lock poisoned")
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::sample_table;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn fetch_runs_at_most_once() {
        let cache = TableCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let t = cache
                .load_with(|| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(sample_table())
                })
                .unwrap();
            assert_eq!(t.row_count(), 3);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn invalidate_forces_refetch() {
        let cache = TableCache::new();
        let calls = AtomicUsize::new(0);
        let load = || {
            cache.load_with(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(sample_table())
            })
        };

        load().unwrap();
        cache.invalidate();
        assert!(!cache.is_loaded());
        load().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn failed_fetch_leaves_cache_cold() {
        let cache = TableCache::new();
        let err = cache.load_with(|| Err(DataError::Network("offline".into())));
        assert!(err.is_err());
        assert!(!cache.is_loaded());

        cache.load_with(|| Ok(sample_table())).unwrap();
        assert!(cache.is_loaded());
    }
}
