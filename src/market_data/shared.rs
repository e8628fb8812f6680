//! Shared market state between the fetcher task and the render loop

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Mutex, MutexGuard};

use super::{FetchStatus, TickerRow};

/// Mutex-guarded ticker table plus the process-wide run and status flags
///
/// The row vector is sized once from the configured symbol list and never
/// grows or shrinks; indices correspond 1:1 to configuration order for the
/// lifetime of the process. All reads and writes of rows happen under the
/// lock, and the lock is never held across network or rendering work.
pub struct SharedMarketState {
    rows: Mutex<Vec<TickerRow>>,
    running: AtomicBool,
    status: AtomicU8,
}

impl SharedMarketState {
    pub fn new(symbols: &[String]) -> Self {
        let rows = symbols.iter().map(|s| TickerRow::empty(s)).collect();
        Self {
            rows: Mutex::new(rows),
            running: AtomicBool::new(true),
            status: AtomicU8::new(FetchStatus::Fetching as u8),
        }
    }

    fn rows(&self) -> MutexGuard<'_, Vec<TickerRow>> {
        self.rows.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Number of tracked symbols, fixed at startup
    pub fn symbol_count(&self) -> usize {
        self.rows().len()
    }

    /// Copy the full table into `dest` under the lock, reusing its allocation
    pub fn snapshot_into(&self, dest: &mut Vec<TickerRow>) {
        let rows = self.rows();
        dest.clone_from(&rows);
    }

    /// Copy the rows flagged in `updated` from `scratch` into the table
    ///
    /// Rows without a fresh result keep their previous value, so a render
    /// never observes a partially updated symbol.
    pub fn publish(&self, scratch: &[TickerRow], updated: &[bool]) {
        let mut rows = self.rows();
        for (i, row) in rows.iter_mut().enumerate() {
            if updated.get(i).copied().unwrap_or(false) {
                if let Some(fresh) = scratch.get(i) {
                    row.clone_from(fresh);
                }
            }
        }
    }

    /// Symbol string at a configuration index
    pub fn symbol_at(&self, index: usize) -> Option<String> {
        self.rows().get(index).map(|row| row.symbol.clone())
    }

    /// Latest price for a symbol, trying `cached_index` before a full scan
    pub fn live_price(&self, cached_index: usize, symbol: &str) -> Option<f64> {
        let rows = self.rows();
        if let Some(row) = rows.get(cached_index) {
            if row.symbol == symbol {
                return Some(row.last_price);
            }
        }
        rows.iter()
            .find(|row| row.symbol == symbol)
            .map(|row| row.last_price)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    pub fn request_shutdown(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    pub fn status(&self) -> FetchStatus {
        FetchStatus::from_u8(self.status.load(Ordering::Relaxed))
    }

    pub fn set_status(&self, status: FetchStatus) {
        self.status.store(status as u8, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn sample_row(symbol: &str, price: f64) -> TickerRow {
        TickerRow {
            symbol: symbol.to_string(),
            last_price: price,
            updated_at_ms: 1,
            ..TickerRow::default()
        }
    }

    #[test]
    fn table_is_sized_from_symbol_list() {
        let shared = SharedMarketState::new(&symbols(&["BTCUSDT", "ETHUSDT", "BNBUSDT"]));
        assert_eq!(shared.symbol_count(), 3);
        assert_eq!(shared.symbol_at(1), Some("ETHUSDT".to_string()));
        assert_eq!(shared.symbol_at(3), None);

        let mut snapshot = Vec::new();
        shared.snapshot_into(&mut snapshot);
        assert_eq!(snapshot.len(), 3);
        assert!(!snapshot[0].has_sample(), "rows start without data");
    }

    #[test]
    fn publish_only_touches_flagged_rows() {
        let shared = SharedMarketState::new(&symbols(&["BTCUSDT", "ETHUSDT", "BNBUSDT"]));

        let scratch = vec![
            sample_row("BTCUSDT", 100.0),
            sample_row("ETHUSDT", 999.0),
            sample_row("BNBUSDT", 75.0),
        ];
        shared.publish(&scratch, &[true, false, true]);

        let mut snapshot = Vec::new();
        shared.snapshot_into(&mut snapshot);
        assert_eq!(snapshot[0].last_price, 100.0);
        assert_eq!(snapshot[1].last_price, 0.0, "unflagged row keeps old value");
        assert_eq!(snapshot[2].last_price, 75.0);
    }

    #[test]
    fn live_price_prefers_cached_index_and_falls_back_to_scan() {
        let shared = SharedMarketState::new(&symbols(&["BTCUSDT", "ETHUSDT"]));
        let scratch = vec![sample_row("BTCUSDT", 42.0), sample_row("ETHUSDT", 7.0)];
        shared.publish(&scratch, &[true, true]);

        // Cached index matches the symbol
        assert_eq!(shared.live_price(1, "ETHUSDT"), Some(7.0));
        // Stale cached index still resolves via scan
        assert_eq!(shared.live_price(0, "ETHUSDT"), Some(7.0));
        assert_eq!(shared.live_price(99, "BTCUSDT"), Some(42.0));
        // Unknown symbol yields nothing
        assert_eq!(shared.live_price(0, "DOGEUSDT"), None);
    }

    #[test]
    fn shutdown_flag_round_trips() {
        let shared = SharedMarketState::new(&symbols(&["BTCUSDT"]));
        assert!(shared.is_running());
        shared.request_shutdown();
        assert!(!shared.is_running());
    }

    #[test]
    fn status_round_trips_through_atomic() {
        let shared = SharedMarketState::new(&symbols(&["BTCUSDT"]));
        assert_eq!(shared.status(), FetchStatus::Fetching);
        shared.set_status(FetchStatus::NetworkError);
        assert_eq!(shared.status(), FetchStatus::NetworkError);
        shared.set_status(FetchStatus::Normal);
        assert_eq!(shared.status(), FetchStatus::Normal);
    }
}
