// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// multiplier = 2 / (period + 1)
// EMA_t      = close_t * multiplier + EMA_{t-1} * (1 - multiplier)
//
// The series is seeded with the SMA of the first `period` values, so the first
// output lines up with input index `period - 1`.
// =============================================================================

/// Compute the EMA series of `values` for the given look-back `period`.
///
/// Returns an empty `Vec` when `period == 0` or there are fewer than `period`
/// values. A non-finite intermediate result truncates the series.
pub fn calculate_ema(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }

    let multiplier = 2.0 / (period + 1) as f64;

    let seed: f64 = values[..period].iter().sum::<f64>() / period as f64;
    if !seed.is_finite() {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(values.len() - period + 1);
    result.push(seed);

    let mut prev = seed;
    for &value in &values[period..] {
        let ema = value * multiplier + prev * (1.0 - multiplier);
        if !ema.is_finite() {
            break;
        }
        result.push(ema);
        prev = ema;
    }

    result
}

/// Most recent EMA value, or `None` when there is not enough history.
pub fn latest_ema(values: &[f64], period: usize) -> Option<f64> {
    calculate_ema(values, period).last().copied()
}
