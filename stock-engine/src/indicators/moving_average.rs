//! Simple and exponential moving averages.

use crate::error::{Error, Result};

fn check_window(indicator: &'static str, values: &[f64], period: usize) -> Result<()> {
    if period == 0 {
        return Err(Error::invalid_parameter("period", "must be at least 1"));
    }
    if values.len() < period {
        return Err(Error::insufficient(indicator, period, values.len()));
    }
    Ok(())
}

/// Simple moving average.
///
/// Element `i` of the output is the mean of `values[i..i + period]`, so the
/// first value lines up with input index `period - 1` and the output has
/// `len - period + 1` elements.
pub fn sma(values: &[f64], period: usize) -> Result<Vec<f64>> {
    check_window("sma", values, period)?;

    // Summing each window afresh keeps results independent of history length.
    let divisor = period as f64;
    Ok(values
        .windows(period)
        .map(|w| w.iter().sum::<f64>() / divisor)
        .collect())
}

/// Latest simple moving average value.
pub fn sma_latest(values: &[f64], period: usize) -> Result<f64> {
    check_window("sma", values, period)?;
    let tail = &values[values.len() - period..];
    Ok(tail.iter().sum::<f64>() / period as f64)
}

/// Exponential moving average.
///
/// Seeded with the SMA of the first `period` values, then
/// `EMA[t] = v[t]·k + EMA[t-1]·(1-k)` with `k = 2 / (period + 1)`.
/// Aligned like [`sma`]: the first value belongs to index `period - 1`.
pub fn ema(values: &[f64], period: usize) -> Result<Vec<f64>> {
    check_window("ema", values, period)?;

    let k = 2.0 / (period as f64 + 1.0);
    let seed = values[..period].iter().sum::<f64>() / period as f64;

    let mut out = Vec::with_capacity(values.len() - period + 1);
    out.push(seed);

    let mut prev = seed;
    for &value in &values[period..] {
        prev = value * k + prev * (1.0 - k);
        out.push(prev);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-9, "{} != {}", a, e);
        }
    }

    #[test]
    fn test_sma_reference_vector() {
        let out = sma(&[10.0, 11.0, 12.0, 11.0, 13.0], 3).unwrap();
        assert_close(&out, &[11.0, 34.0 / 3.0, 12.0]);
    }

    #[test]
    fn test_sma_period_equals_length() {
        let out = sma(&[2.0, 4.0, 6.0], 3).unwrap();
        assert_close(&out, &[4.0]);
    }

    #[test]
    fn test_sma_insufficient() {
        let err = sma(&[1.0, 2.0], 3).unwrap_err();
        assert_eq!(
            err,
            Error::InsufficientData {
                indicator: "sma",
                required: 3,
                available: 2
            }
        );
    }

    #[test]
    fn test_zero_period_rejected() {
        assert!(matches!(sma(&[1.0], 0), Err(Error::InvalidParameter { .. })));
        assert!(matches!(ema(&[1.0], 0), Err(Error::InvalidParameter { .. })));
    }

    #[test]
    fn test_sma_latest_matches_series() {
        let values = [3.0, 5.0, 4.0, 8.0, 9.0, 1.0];
        let series = sma(&values, 4).unwrap();
        let latest = sma_latest(&values, 4).unwrap();
        assert!((series[series.len() - 1] - latest).abs() < 1e-12);
    }

    #[test]
    fn test_ema_reference_vector() {
        // k = 0.5; seed = mean(1, 2, 3) = 2
        let out = ema(&[1.0, 2.0, 3.0, 4.0, 5.0], 3).unwrap();
        assert_close(&out, &[2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_ema_constant_series_is_constant() {
        let out = ema(&[7.5; 30], 12).unwrap();
        assert_eq!(out.len(), 19);
        assert!(out.iter().all(|v| (v - 7.5).abs() < 1e-12));
    }
}
