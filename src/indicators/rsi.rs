// =============================================================================
// Relative Strength Index (RSI) — Wilder's Smoothing
// =============================================================================
//
// 1. Deltas between consecutive closes, split into gains and losses.
// 2. Seed average gain / loss with the SMA of the first `period` deltas.
// 3. Wilder smoothing:
//      avg = (prev_avg * (period - 1) + current) / period
// 4. RSI = 100 - 100 / (1 + avg_gain / avg_loss)
// =============================================================================

/// Compute the RSI series for `closes`.
///
/// One value is produced for each close from index `period` onward. Empty when
/// `period == 0` or there are fewer than `period + 1` closes.
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.len() < period + 1 {
        return Vec::new();
    }

    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

    let (sum_gain, sum_loss) = deltas[..period]
        .iter()
        .fold((0.0_f64, 0.0_f64), |(g, l), &d| {
            if d > 0.0 {
                (g + d, l)
            } else {
                (g, l - d)
            }
        });

    let period_f = period as f64;
    let mut avg_gain = sum_gain / period_f;
    let mut avg_loss = sum_loss / period_f;

    let mut result = Vec::with_capacity(deltas.len() - period + 1);
    match rsi_from_averages(avg_gain, avg_loss) {
        Some(rsi) => result.push(rsi),
        None => return result,
    }

    for &delta in &deltas[period..] {
        let gain = delta.max(0.0);
        let loss = (-delta).max(0.0);

        avg_gain = (avg_gain * (period_f - 1.0) + gain) / period_f;
        avg_loss = (avg_loss * (period_f - 1.0) + loss) / period_f;

        match rsi_from_averages(avg_gain, avg_loss) {
            Some(rsi) => result.push(rsi),
            None => break,
        }
    }

    result
}

/// Most recent RSI value, or `None` with insufficient history.
pub fn latest_rsi(closes: &[f64], period: usize) -> Option<f64> {
    calculate_rsi(closes, period).last().copied()
}

/// Map average gain / loss to [0, 100].
///
/// No movement at all reads 50; only gains reads 100.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    let rsi = if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0
    } else if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    };

    rsi.is_finite().then(|| rsi.clamp(0.0, 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsi_insufficient_data() {
        let closes: Vec<f64> = (1..=14).map(|x| x as f64).collect();
        assert!(calculate_rsi(&closes, 14).is_empty());
        assert!(latest_rsi(&[], 14).is_none());
    }

    #[test]
    fn rsi_first_value_at_period_plus_one() {
        let closes: Vec<f64> = (1..=15).map(|x| x as f64).collect();
        assert_eq!(calculate_rsi(&closes, 14).len(), 1);
    }

    #[test]
    fn rsi_all_gains_is_100() {
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        assert!((latest_rsi(&closes, 14).unwrap() - 100.0).abs() < 1e-10);
    }

    #[test]
    fn rsi_all_losses_is_0() {
        let closes: Vec<f64> = (1..=30).rev().map(|x| x as f64).collect();
        assert!(latest_rsi(&closes, 14).unwrap().abs() < 1e-10);
    }

    #[test]
    fn rsi_flat_market_is_50() {
        let closes = vec![100.0; 30];
        assert!((latest_rsi(&closes, 14).unwrap() - 50.0).abs() < 1e-10);
    }

    #[test]
    fn rsi_alternating_moves_reflect_gain_share() {
        // +3 / -2 alternating: average gain 1.5, average loss 1.0 in the limit.
        let mut closes = vec![100.0];
        for i in 0..400 {
            let last = closes[closes.len() - 1];
            closes.push(if i % 2 == 0 { last + 3.0 } else { last - 2.0 });
        }
        let rsi = latest_rsi(&closes, 14).unwrap();
        assert!((rsi - 60.0).abs() < 3.0, "rsi {rsi}");
    }

    #[test]
    fn rsi_stays_in_range() {
        let closes = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 44.18, 44.22, 44.57, 43.42, 42.66, 43.13,
        ];
        for v in calculate_rsi(&closes, 14) {
            assert!((0.0..=100.0).contains(&v), "RSI {v} out of range");
        }
    }
}
