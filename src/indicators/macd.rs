// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
//   line      = EMA(fast) - EMA(slow)
//   signal    = EMA(signal_period) of the line
//   histogram = line - signal
//
// Both EMAs are SMA-seeded (see `ema.rs`); the line starts where the slow EMA
// does, so the first signal value needs `slow + signal_period - 1` closes.
// =============================================================================

use serde::Serialize;

use super::ema::calculate_ema;

pub const FAST_PERIOD: usize = 12;
pub const SLOW_PERIOD: usize = 26;
pub const SIGNAL_PERIOD: usize = 9;

/// Latest MACD reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Macd {
    pub line: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// Compute the MACD line series (fast EMA minus slow EMA, aligned on the slow
/// EMA's first index).
///
/// Empty when `fast >= slow` or the slow EMA is undefined.
pub fn macd_line(closes: &[f64], fast: usize, slow: usize) -> Vec<f64> {
    if fast == 0 || fast >= slow {
        return Vec::new();
    }

    let fast_ema = calculate_ema(closes, fast);
    let slow_ema = calculate_ema(closes, slow);
    let offset = slow - fast;

    slow_ema
        .iter()
        .enumerate()
        .filter_map(|(i, slow_value)| fast_ema.get(i + offset).map(|f| f - slow_value))
        .collect()
}

/// Latest MACD line, signal and histogram for the given periods.
pub fn calculate_macd(
    closes: &[f64],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> Option<Macd> {
    let line = macd_line(closes, fast, slow);
    let signal = *calculate_ema(&line, signal_period).last()?;
    let line = *line.last()?;

    Some(Macd {
        line,
        signal,
        histogram: line - signal,
    })
}

/// MACD(12, 26, 9).
pub fn standard_macd(closes: &[f64]) -> Option<Macd> {
    calculate_macd(closes, FAST_PERIOD, SLOW_PERIOD, SIGNAL_PERIOD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn needs_slow_plus_signal_minus_one_closes() {
        let closes: Vec<f64> = (1..=33).map(|x| x as f64).collect();
        assert!(standard_macd(&closes).is_none());

        let closes: Vec<f64> = (1..=34).map(|x| x as f64).collect();
        assert!(standard_macd(&closes).is_some());
    }

    #[test]
    fn line_length_follows_slow_ema() {
        let closes: Vec<f64> = (1..=50).map(|x| x as f64).collect();
        assert_eq!(macd_line(&closes, 12, 26).len(), 25);
    }

    #[test]
    fn rejects_inverted_periods() {
        let closes: Vec<f64> = (1..=100).map(|x| x as f64).collect();
        assert!(calculate_macd(&closes, 26, 12, 9).is_none());
    }

    #[test]
    fn flat_series_is_all_zero() {
        let macd = standard_macd(&vec![50.0; 100]).unwrap();
        assert!(macd.line.abs() < 1e-10);
        assert!(macd.signal.abs() < 1e-10);
        assert!(macd.histogram.abs() < 1e-10);
    }

    #[test]
    fn uptrend_has_positive_line() {
        let closes: Vec<f64> = (1..=120).map(|x| x as f64).collect();
        let macd = standard_macd(&closes).unwrap();
        assert!(macd.line > 0.0);
        assert!((macd.histogram - (macd.line - macd.signal)).abs() < 1e-12);
    }

    #[test]
    fn downtrend_has_negative_line() {
        let closes: Vec<f64> = (1..=120).rev().map(|x| x as f64).collect();
        assert!(standard_macd(&closes).unwrap().line < 0.0);
    }
}
