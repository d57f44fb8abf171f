// =============================================================================
// Trading Engine — closes in, TradeSetup out
// =============================================================================
//
// Pipeline (one ticker, one call, no retained state):
//   1. IndicatorSnapshot from the closing prices
//   2. classify -> BUY / SELL / NEUTRAL
//   3. For BUY / SELL: 1 % stop, risk-based share count, option hint
// =============================================================================

use serde::{Serialize, Serializer};

use crate::classifier::classify;
use crate::indicators::IndicatorSnapshot;
use crate::sizing::{option_suggestion, position_sizing, stop_loss_for, OptionSuggestion};
use crate::types::Signal;

/// Per-ticker scan result served to the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeSetup {
    pub symbol: String,
    pub price: f64,
    pub signal: Signal,
    pub macd_val: Option<f64>,
    pub rsi: Option<f64>,
    pub ema: Option<f64>,
    pub suggested_shares: u64,
    #[serde(serialize_with = "serialize_option_suggest")]
    pub option_suggest: Option<OptionSuggestion>,
    pub timestamp: String,
}

#[derive(Serialize)]
struct NoSuggestion {
    direction: &'static str,
    strike: &'static str,
    expiry: &'static str,
}

/// NEUTRAL rows still carry an `option_suggest` object so the page can render
/// every row the same way.
fn serialize_option_suggest<S: Serializer>(
    value: &Option<OptionSuggestion>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(suggestion) => suggestion.serialize(serializer),
        None => NoSuggestion {
            direction: "-",
            strike: "-",
            expiry: "-",
        }
        .serialize(serializer),
    }
}

/// Risk settings applied to every actionable signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradingEngine {
    capital: f64,
    risk_fraction: f64,
}

impl TradingEngine {
    /// * `capital`: total account size in currency units.
    /// * `risk_fraction`: share of capital risked per trade (0.01 = 1 %).
    pub fn new(capital: f64, risk_fraction: f64) -> Self {
        Self {
            capital,
            risk_fraction,
        }
    }

    pub fn capital(&self) -> f64 {
        self.capital
    }

    pub fn risk_fraction(&self) -> f64 {
        self.risk_fraction
    }

    /// Share count for an entry / stop pair under this engine's risk budget.
    pub fn position_sizing(&self, entry: f64, stop_loss: f64) -> u64 {
        position_sizing(entry, stop_loss, self.capital, self.risk_fraction)
    }

    /// Evaluate one ticker. `None` only when `closes` is empty.
    ///
    /// `timestamp` is stamped verbatim onto the result so that identical inputs
    /// produce identical output.
    pub fn evaluate(&self, symbol: &str, closes: &[f64], timestamp: &str) -> Option<TradeSetup> {
        let snapshot = IndicatorSnapshot::from_closes(closes)?;
        let signal = classify(&snapshot);
        let price = snapshot.close;

        let suggested_shares = stop_loss_for(signal, price)
            .map(|stop| self.position_sizing(price, stop))
            .unwrap_or(0);

        Some(TradeSetup {
            symbol: symbol.to_string(),
            price,
            signal,
            macd_val: snapshot.macd.map(|m| m.line),
            rsi: snapshot.rsi,
            ema: snapshot.ema200,
            suggested_shares,
            option_suggest: option_suggestion(symbol, signal, price),
            timestamp: timestamp.to_string(),
        })
    }
}
