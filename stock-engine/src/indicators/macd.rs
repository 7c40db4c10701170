//! Moving Average Convergence Divergence.

use serde::{Deserialize, Serialize};

use super::moving_average::ema;
use crate::error::{Error, Result};

/// MACD periods.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdParams {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
        }
    }
}

/// One aligned MACD reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdPoint {
    /// EMA(fast) - EMA(slow)
    pub macd: f64,
    /// EMA(signal) of the MACD line
    pub signal: f64,
    /// MACD - signal
    pub histogram: f64,
}

/// Full MACD output.
///
/// `line[i]` belongs to input index `slow - 1 + i`. `signal[j]` and
/// `histogram[j]` belong to `line[signal_period - 1 + j]`, so they are empty
/// while the line is shorter than the signal period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdSeries {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

impl MacdSeries {
    /// Most recent complete reading, if the signal line exists yet.
    pub fn latest(&self) -> Option<MacdPoint> {
        let macd = *self.line.last()?;
        let signal = *self.signal.last()?;
        let histogram = *self.histogram.last()?;
        Some(MacdPoint {
            macd,
            signal,
            histogram,
        })
    }

    /// Whether the signal line could be computed.
    pub fn is_complete(&self) -> bool {
        !self.signal.is_empty()
    }
}

/// Compute MACD over closes.
///
/// Needs at least `slow` values for the MACD line; the signal line needs
/// `slow + signal - 1`.
pub fn macd(values: &[f64], params: MacdParams) -> Result<MacdSeries> {
    if params.fast == 0 || params.signal == 0 {
        return Err(Error::invalid_parameter("period", "must be at least 1"));
    }
    if params.fast >= params.slow {
        return Err(Error::invalid_parameter(
            "fast",
            format!("fast period {} must be shorter than slow period {}", params.fast, params.slow),
        ));
    }
    if values.len() < params.slow {
        return Err(Error::insufficient("macd", params.slow, values.len()));
    }

    let fast = ema(values, params.fast)?;
    let slow = ema(values, params.slow)?;

    // fast[0] sits at index fast-1, slow[0] at slow-1
    let offset = params.slow - params.fast;
    let line: Vec<f64> = slow
        .iter()
        .enumerate()
        .map(|(i, s)| fast[i + offset] - s)
        .collect();

    let (signal, histogram) = if line.len() >= params.signal {
        let signal = ema(&line, params.signal)?;
        let histogram = signal
            .iter()
            .enumerate()
            .map(|(j, s)| line[params.signal - 1 + j] - s)
            .collect();
        (signal, histogram)
    } else {
        (Vec::new(), Vec::new())
    };

    Ok(MacdSeries {
        line,
        signal,
        histogram,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize) -> Vec<f64> {
        (0..n).map(|i| 10.0 + i as f64 * 0.5).collect()
    }

    #[test]
    fn test_macd_lengths() {
        let out = macd(&ramp(40), MacdParams::default()).unwrap();
        assert_eq!(out.line.len(), 15);
        assert_eq!(out.signal.len(), 7);
        assert_eq!(out.histogram.len(), 7);
        assert!(out.is_complete());
    }

    #[test]
    fn test_macd_minimum_history_is_partial() {
        let out = macd(&ramp(26), MacdParams::default()).unwrap();
        assert_eq!(out.line.len(), 1);
        assert!(out.signal.is_empty());
        assert!(out.latest().is_none());
    }

    #[test]
    fn test_macd_insufficient() {
        let err = macd(&ramp(25), MacdParams::default()).unwrap_err();
        assert_eq!(err, Error::insufficient("macd", 26, 25));
    }

    #[test]
    fn test_macd_constant_series_is_flat() {
        let out = macd(&[20.0; 50], MacdParams::default()).unwrap();
        let latest = out.latest().unwrap();
        assert!(latest.macd.abs() < 1e-12);
        assert!(latest.signal.abs() < 1e-12);
        assert!(latest.histogram.abs() < 1e-12);
    }

    #[test]
    fn test_macd_uptrend_is_positive() {
        let out = macd(&ramp(60), MacdParams::default()).unwrap();
        let latest = out.latest().unwrap();
        assert!(latest.macd > 0.0);
        assert!((latest.histogram - (latest.macd - latest.signal)).abs() < 1e-12);
    }

    #[test]
    fn test_macd_line_matches_ema_difference() {
        let values = ramp(30);
        let out = macd(&values, MacdParams::default()).unwrap();
        let fast = ema(&values, 12).unwrap();
        let slow = ema(&values, 26).unwrap();
        let expected = fast[fast.len() - 1] - slow[slow.len() - 1];
        assert!((out.line[out.line.len() - 1] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_macd_rejects_inverted_periods() {
        let params = MacdParams {
            fast: 26,
            slow: 12,
            signal: 9,
        };
        assert!(matches!(
            macd(&ramp(40), params),
            Err(Error::InvalidParameter { name: "fast", .. })
        ));
    }
}
