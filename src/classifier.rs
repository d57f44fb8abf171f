// =============================================================================
// Signal Classifier — trend + momentum + MACD cross
// =============================================================================
//
// Rules, first match wins:
//   1. EMA-200 (or any other indicator) undefined     => NEUTRAL
//   2. close > EMA200, 45 < RSI < 70, line > signal, hist > 0 => BUY
//   3. close < EMA200, 30 < RSI < 55, line < signal, hist < 0 => SELL
//   4. otherwise                                       => NEUTRAL
//
// Every comparison is strict. The two RSI bands are deliberately asymmetric.
// =============================================================================

use crate::indicators::IndicatorSnapshot;
use crate::types::Signal;

/// Exclusive RSI band required for a BUY.
pub const BUY_RSI_BAND: (f64, f64) = (45.0, 70.0);
/// Exclusive RSI band required for a SELL.
pub const SELL_RSI_BAND: (f64, f64) = (30.0, 55.0);

fn in_band(value: f64, (low, high): (f64, f64)) -> bool {
    low < value && value < high
}

/// Classify one snapshot. Pure and deterministic.
pub fn classify(snapshot: &IndicatorSnapshot) -> Signal {
    let Some(ema200) = snapshot.ema200 else {
        return Signal::Neutral;
    };
    let (Some(macd), Some(rsi)) = (snapshot.macd, snapshot.rsi) else {
        return Signal::Neutral;
    };
    let close = snapshot.close;

    if close > ema200
        && in_band(rsi, BUY_RSI_BAND)
        && macd.line > macd.signal
        && macd.histogram > 0.0
    {
        Signal::Buy
    } else if close < ema200
        && in_band(rsi, SELL_RSI_BAND)
        && macd.line < macd.signal
        && macd.histogram < 0.0
    {
        Signal::Sell
    } else {
        Signal::Neutral
    }
}
