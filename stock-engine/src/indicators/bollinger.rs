//! Bollinger Bands.

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::error::{Error, Result};

/// Bollinger parameters: SMA window and standard-deviation multiple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerParams {
    pub period: usize,
    pub k: f64,
}

impl Default for BollingerParams {
    fn default() -> Self {
        Self { period: 20, k: 2.0 }
    }
}

/// Bands at one index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerPoint {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    /// Half-band width relative to the middle band (%)
    pub bandwidth: f64,
    /// Position of the close inside the band (0 = lower, 1 = upper)
    pub percent_b: f64,
}

impl BollingerPoint {
    fn from_window(window: &[f64], close: f64, k: f64) -> Self {
        let middle = window.mean();
        // Sample standard deviation (n - 1)
        let std_dev = window.std_dev();
        let upper = middle + k * std_dev;
        let lower = middle - k * std_dev;

        let percent_b = if upper != lower {
            (close - lower) / (upper - lower)
        } else {
            0.5
        };
        let bandwidth = if middle != 0.0 {
            (upper - middle) / middle * 100.0
        } else {
            0.0
        };

        Self {
            upper,
            middle,
            lower,
            bandwidth,
            percent_b,
        }
    }
}

/// Bollinger Bands series; output `i` belongs to input index `period - 1 + i`.
pub fn bollinger(values: &[f64], params: BollingerParams) -> Result<Vec<BollingerPoint>> {
    if params.period < 2 {
        return Err(Error::invalid_parameter(
            "period",
            "a standard deviation needs at least 2 points",
        ));
    }
    if !params.k.is_finite() || params.k <= 0.0 {
        return Err(Error::invalid_parameter("k", format!("must be positive, got {}", params.k)));
    }
    if values.len() < params.period {
        return Err(Error::insufficient("bollinger", params.period, values.len()));
    }

    Ok(values
        .windows(params.period)
        .map(|w| BollingerPoint::from_window(w, w[w.len() - 1], params.k))
        .collect())
}

/// Bands over the most recent window only.
pub fn bollinger_latest(values: &[f64], params: BollingerParams) -> Result<BollingerPoint> {
    let series = bollinger(&values[values.len().saturating_sub(params.period)..], params)?;
    series
        .last()
        .copied()
        .ok_or_else(|| Error::insufficient("bollinger", params.period, values.len()))
}
