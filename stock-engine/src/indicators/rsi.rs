//! Relative Strength Index with Wilder smoothing.

use crate::error::{Error, Result};

/// Default RSI lookback.
pub const DEFAULT_RSI_PERIOD: usize = 14;

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    (100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0)
}

/// RSI series.
///
/// The first reading uses the plain mean of the first `period` gains and
/// losses; later readings apply `avg = (prev·(period-1) + x) / period`.
/// Needs `period + 1` closes; output `i` belongs to input index `period + i`.
pub fn rsi(values: &[f64], period: usize) -> Result<Vec<f64>> {
    if period == 0 {
        return Err(Error::invalid_parameter("period", "must be at least 1"));
    }
    if values.len() < period + 1 {
        return Err(Error::insufficient("rsi", period + 1, values.len()));
    }

    let changes: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
    let p = period as f64;

    let mut avg_gain = changes[..period].iter().map(|c| c.max(0.0)).sum::<f64>() / p;
    let mut avg_loss = changes[..period].iter().map(|c| (-c).max(0.0)).sum::<f64>() / p;

    let mut out = Vec::with_capacity(changes.len() - period + 1);
    out.push(rsi_from_averages(avg_gain, avg_loss));

    for &change in &changes[period..] {
        avg_gain = (avg_gain * (p - 1.0) + change.max(0.0)) / p;
        avg_loss = (avg_loss * (p - 1.0) + (-change).max(0.0)) / p;
        out.push(rsi_from_averages(avg_gain, avg_loss));
    }

    Ok(out)
}

/// Latest RSI reading.
pub fn rsi_latest(values: &[f64], period: usize) -> Result<f64> {
    let series = rsi(values, period)?;
    series
        .last()
        .copied()
        .ok_or_else(|| Error::insufficient("rsi", period + 1, values.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_length() {
        let values: Vec<f64> = (0..30).map(|i| (i as f64 * 0.7).sin() + 10.0).collect();
        let out = rsi(&values, 14).unwrap();
        assert_eq!(out.len(), 16);
    }

    #[test]
    fn test_rsi_only_gains_is_100() {
        let values: Vec<f64> = (0..20).map(|i| i as f64).collect();
        assert_eq!(rsi_latest(&values, 14).unwrap(), 100.0);
    }

    #[test]
    fn test_rsi_only_losses_is_0() {
        let values: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
        assert_eq!(rsi_latest(&values, 14).unwrap(), 0.0);
    }

    #[test]
    fn test_rsi_flat_series_follows_zero_loss_rule() {
        assert_eq!(rsi_latest(&[5.0; 10], 3).unwrap(), 100.0);
    }

    #[test]
    fn test_rsi_reference_vector() {
        // changes: +1, -1, +2 ; period 2
        // first: gain 0.5, loss 0.5 -> 50
        // next:  gain (0.5 + 2) / 2 = 1.25, loss 0.25 -> RS 5 -> 83.333...
        let out = rsi(&[10.0, 11.0, 10.0, 12.0], 2).unwrap();
        assert_eq!(out.len(), 2);
        assert!((out[0] - 50.0).abs() < 1e-12);
        assert!((out[1] - 250.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_rsi_insufficient() {
        let err = rsi(&[1.0; 14], 14).unwrap_err();
        assert_eq!(err, Error::insufficient("rsi", 15, 14));
    }
}
