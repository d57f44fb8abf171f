// =============================================================================
// Runtime Configuration — JSON file + environment overrides
// =============================================================================
//
// Every field carries a serde default so a partial (or empty) file loads.
// Vendor credentials are never stored here; they come from the environment.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::market_data::alpaca::DEFAULT_DATA_URL;

pub const DEFAULT_CONFIG_PATH: &str = "runtime_config.json";

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_symbols() -> Vec<String> {
    [
        "AAPL", "MSFT", "GOOGL", "AMZN", "NVDA", "TSLA", "META", "AMD", "INTC", "QCOM", "MU",
        "TSM", "SPY", "QQQ", "IWM", "TQQQ", "SQQQ", "SOXL", "BABA", "PDD", "NIO", "COIN",
        "MSTR", "GME", "AMC", "PLTR", "HOOD",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_total_capital() -> f64 {
    10_000.0
}

fn default_risk_per_trade() -> f64 {
    0.01
}

fn default_scan_interval_secs() -> u64 {
    60
}

fn default_bar_timeframe() -> String {
    "1Min".to_string()
}

fn default_bar_limit() -> u32 {
    300
}

fn default_min_bars() -> usize {
    200
}

fn default_data_base_url() -> String {
    DEFAULT_DATA_URL.to_string()
}

fn default_bind_addr() -> String {
    "0.0.0.0:8000".to_string()
}

// =============================================================================
// RuntimeConfig
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Tickers scanned every cycle, in display order.
    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,

    /// Account size used for position sizing (currency units).
    #[serde(default = "default_total_capital")]
    pub total_capital: f64,

    /// Fraction of capital risked per trade, in (0, 1].
    #[serde(default = "default_risk_per_trade")]
    pub risk_per_trade: f64,

    /// Seconds between scan cycles.
    #[serde(default = "default_scan_interval_secs")]
    pub scan_interval_secs: u64,

    /// Vendor bar timeframe, e.g. "1Min".
    #[serde(default = "default_bar_timeframe")]
    pub bar_timeframe: String,

    /// Bars requested per ticker per cycle.
    #[serde(default = "default_bar_limit")]
    pub bar_limit: u32,

    /// Tickers returning fewer bars than this are skipped for the cycle.
    #[serde(default = "default_min_bars")]
    pub min_bars: usize,

    #[serde(default = "default_data_base_url")]
    pub data_base_url: String,

    /// Address the HTTP API listens on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            symbols: default_symbols(),
            total_capital: default_total_capital(),
            risk_per_trade: default_risk_per_trade(),
            scan_interval_secs: default_scan_interval_secs(),
            bar_timeframe: default_bar_timeframe(),
            bar_limit: default_bar_limit(),
            min_bars: default_min_bars(),
            data_base_url: default_data_base_url(),
            bind_addr: default_bind_addr(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// A missing file is an error so the caller can fall back to defaults with
    /// a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        info!(
            path = %path.display(),
            symbols = config.symbols.len(),
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Apply overrides from `lookup` (normally `std::env::var`).
    ///
    /// * `SCANNER_SYMBOLS`: comma separated, upper-cased
    /// * `SCANNER_BIND_ADDR`: listen address
    /// * `ALPACA_DATA_URL`: market data base URL
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(syms) = lookup("SCANNER_SYMBOLS") {
            let symbols: Vec<String> = syms
                .split(',')
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect();
            if !symbols.is_empty() {
                self.symbols = symbols;
            }
        }
        if let Some(addr) = lookup("SCANNER_BIND_ADDR").filter(|a| !a.trim().is_empty()) {
            self.bind_addr = addr.trim().to_string();
        }
        if let Some(url) = lookup("ALPACA_DATA_URL").filter(|u| !u.trim().is_empty()) {
            self.data_base_url = url.trim().to_string();
        }
    }

    /// Reject settings the scanner cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.symbols.is_empty() {
            anyhow::bail!("watchlist is empty");
        }
        if !(self.total_capital > 0.0) {
            anyhow::bail!("total_capital must be positive, got {}", self.total_capital);
        }
        if !(self.risk_per_trade > 0.0 && self.risk_per_trade <= 1.0) {
            anyhow::bail!(
                "risk_per_trade must be in (0, 1], got {}",
                self.risk_per_trade
            );
        }
        if self.scan_interval_secs == 0 {
            anyhow::bail!("scan_interval_secs must be at least 1");
        }
        if (self.bar_limit as usize) < self.min_bars {
            anyhow::bail!(
                "bar_limit ({}) is below min_bars ({})",
                self.bar_limit,
                self.min_bars
            );
        }
        Ok(())
    }
}
