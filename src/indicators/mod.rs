// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free indicator math. Insufficient history is expressed as
// an empty series / `None`, never as an error.

pub mod ema;
pub mod macd;
pub mod rsi;

use serde::Serialize;

pub use macd::Macd;

/// EMA look-back used as the trend filter.
pub const TREND_EMA_PERIOD: usize = 200;
/// RSI look-back.
pub const RSI_PERIOD: usize = 14;

/// Latest indicator values for one closing-price series.
///
/// Built fresh on every call. An indicator without enough history is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorSnapshot {
    pub close: f64,
    pub macd: Option<Macd>,
    pub rsi: Option<f64>,
    pub ema200: Option<f64>,
}

impl IndicatorSnapshot {
    /// Compute the snapshot from chronological closes. `None` only when the
    /// series is empty.
    pub fn from_closes(closes: &[f64]) -> Option<Self> {
        let close = *closes.last()?;

        Some(Self {
            close,
            macd: macd::standard_macd(closes),
            rsi: rsi::latest_rsi(closes, RSI_PERIOD),
            ema200: ema::latest_ema(closes, TREND_EMA_PERIOD),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_series_has_no_snapshot() {
        assert!(IndicatorSnapshot::from_closes(&[]).is_none());
    }

    #[test]
    fn short_series_leaves_ema200_undefined() {
        let closes: Vec<f64> = (1..=199).map(|x| x as f64).collect();
        let snap = IndicatorSnapshot::from_closes(&closes).unwrap();
        assert_eq!(snap.close, 199.0);
        assert!(snap.ema200.is_none());
        assert!(snap.macd.is_some());
        assert!(snap.rsi.is_some());
    }

    #[test]
    fn full_series_defines_everything() {
        let closes: Vec<f64> = (0..250).map(|x| 100.0 + (x as f64 * 0.3).sin()).collect();
        let snap = IndicatorSnapshot::from_closes(&closes).unwrap();
        assert!(snap.ema200.is_some());
        let rsi = snap.rsi.unwrap();
        assert!((0.0..=100.0).contains(&rsi));
        let macd = snap.macd.unwrap();
        assert!((macd.histogram - (macd.line - macd.signal)).abs() < 1e-12);
    }

    #[test]
    fn snapshot_is_deterministic() {
        let closes: Vec<f64> = (0..300).map(|x| 50.0 + (x as f64 * 0.7).cos() * 3.0).collect();
        assert_eq!(
            IndicatorSnapshot::from_closes(&closes),
            IndicatorSnapshot::from_closes(&closes)
        );
    }
}
