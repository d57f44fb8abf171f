// =============================================================================
// Market Data — price bars and the sources that supply them
// =============================================================================

pub mod alpaca;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use alpaca::AlpacaClient;

/// One OHLCV bar as returned by the data vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    #[serde(rename = "t")]
    pub timestamp: String,
    #[serde(rename = "o")]
    pub open: f64,
    #[serde(rename = "h")]
    pub high: f64,
    #[serde(rename = "l")]
    pub low: f64,
    #[serde(rename = "c")]
    pub close: f64,
    #[serde(rename = "v", default)]
    pub volume: f64,
}

/// Anything that can hand back the most recent bars for a ticker.
///
/// Implementations return bars in chronological order (oldest first).
#[async_trait]
pub trait BarSource: Send + Sync {
    async fn get_bars(&self, symbol: &str, timeframe: &str, limit: u32) -> Result<Vec<Bar>>;
}

/// Closing prices of `bars`, oldest first.
pub fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}
