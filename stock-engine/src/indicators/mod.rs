//! Technical indicator calculator.
//!
//! Pure functions over close prices:
//! - Simple and exponential moving averages
//! - MACD (line, signal, histogram)
//! - RSI with Wilder smoothing
//! - Bollinger Bands
//! - Volume / price relationship
//!
//! [`TechnicalAnalyzer`] runs the configured set over a [`PriceSeries`] and
//! reports every indicator as an [`Outcome`], so a short history yields a
//! partial report instead of an error.

mod bollinger;
mod macd;
mod moving_average;
mod rsi;
pub mod signal;
mod volume;

pub use bollinger::{bollinger, bollinger_latest, BollingerParams, BollingerPoint};
pub use macd::{macd, MacdParams, MacdPoint, MacdSeries};
pub use moving_average::{ema, sma, sma_latest};
pub use rsi::{rsi, rsi_latest, DEFAULT_RSI_PERIOD};
pub use signal::{
    composite_signal, CompositeSignal, IndicatorKind, IndicatorSignal, Outlook, Signal,
    SignalInputs, MA_ALIGNMENT_WINDOWS,
};
pub use volume::{analyze_volume, VolumeAnalysis, VolumeTrend};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use stock_common::config::{Config, IndicatorsConfig};

use crate::data::PriceSeries;
use crate::error::{Error, Result};

// ============================================================================
// Outcome
// ============================================================================

/// Result of one indicator: a value, or an explicit shortfall of history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome<T> {
    Ready { value: T },
    InsufficientData { required: usize, available: usize },
}

impl<T> Outcome<T> {
    /// Convert an indicator result; only `InsufficientData` becomes an
    /// outcome, every other error is passed through.
    pub fn from_result(result: Result<T>) -> Result<Self> {
        match result {
            Ok(value) => Ok(Self::Ready { value }),
            Err(Error::InsufficientData {
                required,
                available,
                ..
            }) => Ok(Self::InsufficientData {
                required,
                available,
            }),
            Err(e) => Err(e),
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Ready { value } => Some(value),
            Self::InsufficientData { .. } => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }
}

// ============================================================================
// Indicator Configuration
// ============================================================================

/// Parameters for a full technical analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorConfig {
    pub ma_windows: Vec<usize>,
    pub macd: MacdParams,
    pub rsi_periods: Vec<usize>,
    /// RSI period the composite signal reads
    pub signal_rsi_period: usize,
    pub bollinger: BollingerParams,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self::from_section(&IndicatorsConfig::default())
    }
}

impl IndicatorConfig {
    /// Create from config
    pub fn from_config(config: &Config) -> Self {
        Self::from_section(&config.indicators)
    }

    fn from_section(section: &IndicatorsConfig) -> Self {
        Self {
            ma_windows: section.ma_windows.clone(),
            macd: MacdParams {
                fast: section.macd_fast,
                slow: section.macd_slow,
                signal: section.macd_signal,
            },
            rsi_periods: section.rsi_periods.clone(),
            signal_rsi_period: section.signal_rsi_period,
            bollinger: BollingerParams {
                period: section.bollinger_period,
                k: section.bollinger_k,
            },
        }
    }
}

// ============================================================================
// Technical Report
// ============================================================================

/// Latest indicator readings for one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalReport {
    pub code: String,
    pub date: NaiveDate,
    pub close: f64,
    /// Latest close vs the previous close (%)
    pub change_pct: Option<f64>,
    /// Keyed by window length
    pub moving_averages: BTreeMap<usize, Outcome<f64>>,
    pub macd: Outcome<MacdPoint>,
    /// Keyed by period
    pub rsi: BTreeMap<usize, Outcome<f64>>,
    pub bollinger: Outcome<BollingerPoint>,
    pub volume: Outcome<VolumeAnalysis>,
    pub signal: CompositeSignal,
}

impl TechnicalReport {
    /// Number of indicators that could not be computed.
    pub fn missing_count(&self) -> usize {
        self.moving_averages.values().filter(|o| !o.is_ready()).count()
            + self.rsi.values().filter(|o| !o.is_ready()).count()
            + [
                self.macd.is_ready(),
                self.bollinger.is_ready(),
                self.volume.is_ready(),
            ]
            .iter()
            .filter(|ready| !**ready)
            .count()
    }
}

/// Runs the configured indicator set over a price series.
#[derive(Debug, Clone, Default)]
pub struct TechnicalAnalyzer {
    config: IndicatorConfig,
}

impl TechnicalAnalyzer {
    pub fn new(config: IndicatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IndicatorConfig {
        &self.config
    }

    /// Compute every configured indicator for the latest bar.
    ///
    /// Short history is reported per indicator; parameter errors (zero
    /// periods, fast >= slow) fail the whole call.
    pub fn analyze(&self, series: &PriceSeries) -> Result<TechnicalReport> {
        let closes = series.closes();
        let latest = series.latest();

        let moving_averages = self
            .config
            .ma_windows
            .iter()
            .map(|&w| Ok((w, Outcome::from_result(sma_latest(&closes, w))?)))
            .collect::<Result<BTreeMap<_, _>>>()?;

        let rsi = self
            .config
            .rsi_periods
            .iter()
            .map(|&p| Ok((p, Outcome::from_result(rsi_latest(&closes, p))?)))
            .collect::<Result<BTreeMap<_, _>>>()?;

        let macd = Outcome::from_result(self.latest_macd(&closes))?;
        let bollinger = Outcome::from_result(bollinger_latest(&closes, self.config.bollinger))?;
        let volume = Outcome::from_result(analyze_volume(series))?;
        let signal_rsi =
            Outcome::from_result(rsi_latest(&closes, self.config.signal_rsi_period))?;

        let inputs = SignalInputs {
            close: latest.close,
            moving_averages: Self::alignment_averages(&closes),
            macd: macd.value().copied(),
            rsi: signal_rsi.value().copied(),
            bollinger: bollinger.value().copied(),
        };
        let signal = composite_signal(&inputs);

        let report = TechnicalReport {
            code: series.code().to_string(),
            date: latest.date,
            close: latest.close,
            change_pct: series.latest_change_pct(),
            moving_averages,
            macd,
            rsi,
            bollinger,
            volume,
            signal,
        };

        tracing::debug!(
            code = %report.code,
            points = series.len(),
            missing = report.missing_count(),
            score = report.signal.score,
            "Technical analysis complete"
        );

        Ok(report)
    }

    fn latest_macd(&self, closes: &[f64]) -> Result<MacdPoint> {
        let params = self.config.macd;
        let series = macd(closes, params)?;
        series.latest().ok_or_else(|| {
            Error::insufficient("macd", params.slow + params.signal - 1, closes.len())
        })
    }

    fn alignment_averages(closes: &[f64]) -> Option<[f64; 3]> {
        let [short, medium, long] = MA_ALIGNMENT_WINDOWS;
        Some([
            sma_latest(closes, short).ok()?,
            sma_latest(closes, medium).ok()?,
            sma_latest(closes, long).ok()?,
        ])
    }
}
