// =============================================================================
// Central Application State
// =============================================================================
//
// Owns the latest scan snapshot. The scanner is the only writer; HTTP handlers
// read. A snapshot is published by swapping an `Arc` under a short write lock,
// so readers see either the previous cycle or the new one, never a mix.
// =============================================================================

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use parking_lot::RwLock;

use crate::engine::{TradeSetup, TradingEngine};
use crate::runtime_config::RuntimeConfig;
use crate::scanner::ScanSnapshot;

/// Shared across tasks as `Arc<AppState>`.
pub struct AppState {
    pub config: RuntimeConfig,
    pub engine: TradingEngine,

    /// Latest complete scan. Replaced wholesale by [`AppState::publish`].
    latest: RwLock<Arc<ScanSnapshot>>,

    /// Number of snapshots published so far; 0 until the first scan finishes.
    scan_version: AtomicU64,

    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: RuntimeConfig) -> Self {
        let engine = TradingEngine::new(config.total_capital, config.risk_per_trade);

        Self {
            config,
            engine,
            latest: RwLock::new(Arc::new(ScanSnapshot::empty())),
            scan_version: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Replace the current snapshot and return the new version.
    pub fn publish(&self, snapshot: ScanSnapshot) -> u64 {
        *self.latest.write() = Arc::new(snapshot);
        self.scan_version.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// The most recent complete snapshot.
    pub fn latest(&self) -> Arc<ScanSnapshot> {
        self.latest.read().clone()
    }

    pub fn current_scan_version(&self) -> u64 {
        self.scan_version.load(Ordering::SeqCst)
    }

    /// Seconds since the current snapshot finished; `None` before the first
    /// scan.
    pub fn snapshot_age_secs(&self) -> Option<i64> {
        self.latest()
            .finished_at
            .map(|t| (Utc::now() - t).num_seconds().max(0))
    }

    /// Latest result for `symbol` (case-insensitive).
    pub fn find_result(&self, symbol: &str) -> Option<TradeSetup> {
        self.latest()
            .results
            .iter()
            .find(|r| r.symbol.eq_ignore_ascii_case(symbol))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_with(symbols: &[&str]) -> ScanSnapshot {
        let engine = TradingEngine::new(10_000.0, 0.01);
        ScanSnapshot {
            scan_id: Some("scan".to_string()),
            started_at: Some(Utc::now()),
            finished_at: Some(Utc::now()),
            results: symbols
                .iter()
                .filter_map(|s| engine.evaluate(s, &[100.0; 210], "12:00:00"))
                .collect(),
            ..ScanSnapshot::default()
        }
    }

    #[test]
    fn starts_empty() {
        let state = AppState::new(RuntimeConfig::default());
        assert_eq!(state.current_scan_version(), 0);
        assert!(state.latest().results.is_empty());
        assert!(state.latest().scan_id.is_none());
        assert!(state.snapshot_age_secs().is_none());
    }

    #[test]
    fn engine_follows_config() {
        let mut cfg = RuntimeConfig::default();
        cfg.total_capital = 50_000.0;
        cfg.risk_per_trade = 0.02;
        let state = AppState::new(cfg);
        assert_eq!(state.engine.capital(), 50_000.0);
        assert_eq!(state.engine.risk_fraction(), 0.02);
    }

    #[test]
    fn publish_replaces_whole_snapshot() {
        let state = AppState::new(RuntimeConfig::default());

        assert_eq!(state.publish(snapshot_with(&["AAPL", "MSFT"])), 1);
        let held = state.latest();

        assert_eq!(state.publish(snapshot_with(&["NVDA"])), 2);
        assert_eq!(state.current_scan_version(), 2);

        // A reader holding the old Arc keeps a consistent view.
        assert_eq!(held.results.len(), 2);
        let now = state.latest();
        assert_eq!(now.results.len(), 1);
        assert_eq!(now.results[0].symbol, "NVDA");
        assert_eq!(state.snapshot_age_secs(), Some(0));
    }

    #[test]
    fn find_result_ignores_case() {
        let state = AppState::new(RuntimeConfig::default());
        state.publish(snapshot_with(&["AAPL"]));
        assert_eq!(state.find_result("aapl").unwrap().symbol, "AAPL");
        assert!(state.find_result("TSLA").is_none());
    }
}
