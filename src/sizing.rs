// =============================================================================
// Position & Option Sizing
// =============================================================================
//
// shares = floor(capital * risk_fraction / |entry - stop_loss|)
//
// The stop is a fixed 1 % band around entry (below for BUY, above for SELL).
// A zero stop distance sizes to 0 shares instead of dividing by zero.
// =============================================================================

use serde::Serialize;

use crate::types::{OptionDirection, Signal};

/// Distance of the stop from entry, as a fraction of entry.
pub const STOP_LOSS_BAND: f64 = 0.01;

/// Expiry window attached to every option suggestion.
pub const OPTION_EXPIRY: &str = "0-7 DAYS";

/// Advisory option contract shape. Not a priced or tradable instrument.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionSuggestion {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub symbol: String,
    pub direction: OptionDirection,
    pub strike: i64,
    pub expiry: &'static str,
}

/// Integer share count risking `capital * risk_fraction` between `entry` and
/// `stop_loss`.
pub fn position_sizing(entry: f64, stop_loss: f64, capital: f64, risk_fraction: f64) -> u64 {
    let risk_amount = capital * risk_fraction;
    let risk_per_share = (entry - stop_loss).abs();

    if risk_per_share == 0.0 || !risk_per_share.is_finite() || !(risk_amount > 0.0) {
        return 0;
    }

    (risk_amount / risk_per_share).floor() as u64
}

/// Stop-loss price for `signal` at `entry`; `None` for NEUTRAL.
pub fn stop_loss_for(signal: Signal, entry: f64) -> Option<f64> {
    match signal {
        Signal::Buy => Some(entry * (1.0 - STOP_LOSS_BAND)),
        Signal::Sell => Some(entry * (1.0 + STOP_LOSS_BAND)),
        Signal::Neutral => None,
    }
}

/// Option contract hint for an actionable signal; `None` for NEUTRAL.
///
/// The strike is the price rounded to the nearest whole unit, ties to even.
pub fn option_suggestion(symbol: &str, signal: Signal, price: f64) -> Option<OptionSuggestion> {
    let direction = match signal {
        Signal::Buy => OptionDirection::Call,
        Signal::Sell => OptionDirection::Put,
        Signal::Neutral => return None,
    };

    Some(OptionSuggestion {
        kind: "OPTION",
        symbol: symbol.to_string(),
        direction,
        strike: price.round_ties_even() as i64,
        expiry: OPTION_EXPIRY,
    })
}
