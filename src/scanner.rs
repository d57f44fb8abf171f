// =============================================================================
// Scanner — periodic watchlist pass
// =============================================================================
//
// One cycle walks the watchlist in order. Every ticker ends up in exactly one
// bucket (result, skipped, failed); a failure on one ticker never touches the
// others. The finished `ScanSnapshot` is immutable and replaces the previous
// one in `AppState` in a single swap.
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::app_state::AppState;
use crate::engine::{TradeSetup, TradingEngine};
use crate::market_data::{closes, BarSource};
use crate::runtime_config::RuntimeConfig;

// =============================================================================
// Per-ticker outcome
// =============================================================================

/// Ticker left out of a cycle for lack of data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickerSkip {
    pub symbol: String,
    pub reason: String,
}

/// Ticker whose bars could not be fetched this cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickerFailure {
    pub symbol: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickerOutcome {
    Ready(TradeSetup),
    Skipped(TickerSkip),
    Failed(TickerFailure),
}

// =============================================================================
// ScanSnapshot
// =============================================================================

/// Results of one complete scan cycle.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanSnapshot {
    /// `None` until the first cycle has finished.
    pub scan_id: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub results: Vec<TradeSetup>,
    pub skipped: Vec<TickerSkip>,
    pub failures: Vec<TickerFailure>,
}

impl ScanSnapshot {
    /// Placeholder served before the first cycle completes.
    pub fn empty() -> Self {
        Self::default()
    }

    fn from_outcomes(
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        outcomes: Vec<TickerOutcome>,
    ) -> Self {
        let mut snapshot = Self {
            scan_id: Some(uuid::Uuid::new_v4().to_string()),
            started_at: Some(started_at),
            finished_at: Some(finished_at),
            ..Self::default()
        };

        for outcome in outcomes {
            match outcome {
                TickerOutcome::Ready(setup) => snapshot.results.push(setup),
                TickerOutcome::Skipped(skip) => snapshot.skipped.push(skip),
                TickerOutcome::Failed(failure) => snapshot.failures.push(failure),
            }
        }

        snapshot
    }

    /// Number of actionable (BUY / SELL) results.
    pub fn signal_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.signal.is_actionable())
            .count()
    }
}

// =============================================================================
// One cycle
// =============================================================================

/// Fetch and evaluate a single ticker.
pub async fn scan_ticker(
    source: &dyn BarSource,
    engine: &TradingEngine,
    config: &RuntimeConfig,
    symbol: &str,
    timestamp: &str,
) -> TickerOutcome {
    let bars = match source
        .get_bars(symbol, &config.bar_timeframe, config.bar_limit)
        .await
    {
        Ok(bars) => bars,
        Err(e) => {
            warn!(symbol, error = %e, "bar fetch failed, skipping ticker this cycle");
            return TickerOutcome::Failed(TickerFailure {
                symbol: symbol.to_string(),
                error: format!("{e:#}"),
            });
        }
    };

    if bars.len() < config.min_bars {
        debug!(symbol, bars = bars.len(), min_bars = config.min_bars, "insufficient bars");
        return TickerOutcome::Skipped(TickerSkip {
            symbol: symbol.to_string(),
            reason: format!("insufficient bars: {} < {}", bars.len(), config.min_bars),
        });
    }

    match engine.evaluate(symbol, &closes(&bars), timestamp) {
        Some(setup) => {
            if setup.signal.is_actionable() {
                info!(
                    symbol,
                    signal = %setup.signal,
                    price = setup.price,
                    shares = setup.suggested_shares,
                    "signal triggered"
                );
            }
            TickerOutcome::Ready(setup)
        }
        None => TickerOutcome::Skipped(TickerSkip {
            symbol: symbol.to_string(),
            reason: "no bars".to_string(),
        }),
    }
}

/// Run one full pass over the configured watchlist.
pub async fn scan_watchlist(
    source: &dyn BarSource,
    engine: &TradingEngine,
    config: &RuntimeConfig,
) -> ScanSnapshot {
    let started_at = Utc::now();
    let timestamp = chrono::Local::now().format("%H:%M:%S").to_string();
    info!(timestamp = %timestamp, tickers = config.symbols.len(), "scan cycle starting");

    let mut outcomes = Vec::with_capacity(config.symbols.len());
    for symbol in &config.symbols {
        outcomes.push(scan_ticker(source, engine, config, symbol, &timestamp).await);
    }

    let snapshot = ScanSnapshot::from_outcomes(started_at, Utc::now(), outcomes);
    info!(
        results = snapshot.results.len(),
        signals = snapshot.signal_count(),
        skipped = snapshot.skipped.len(),
        failures = snapshot.failures.len(),
        "scan cycle complete"
    );
    snapshot
}

// =============================================================================
// Periodic loop
// =============================================================================

/// Scan on a fixed interval until `shutdown` flips to `true`.
///
/// The first cycle starts immediately. A cycle interrupted by shutdown is
/// discarded, so readers only ever see complete snapshots.
pub async fn run_scanner(
    state: Arc<AppState>,
    source: Arc<dyn BarSource>,
    mut shutdown: watch::Receiver<bool>,
) {
    let period = Duration::from_secs(state.config.scan_interval_secs.max(1));
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(
        interval_secs = period.as_secs(),
        capital = state.engine.capital(),
        risk_fraction = state.engine.risk_fraction(),
        "scanner loop starting"
    );

    loop {
        if *shutdown.borrow() {
            break;
        }

        tokio::select! {
            _ = interval.tick() => {}
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
                continue;
            }
        }

        tokio::select! {
            snapshot = scan_watchlist(source.as_ref(), &state.engine, &state.config) => {
                let version = state.publish(snapshot);
                debug!(version, "scan snapshot published");
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    info!("shutdown during scan, discarding partial cycle");
                    break;
                }
            }
        }
    }

    info!("scanner loop stopped");
}
