//! Market data types consumed by the engine.
//!
//! Everything here is constructed per request from upstream provider data
//! and discarded once results are produced.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, Error, Result};

/// A single daily bar (OHLCV)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Trading day
    pub date: NaiveDate,
    /// Open price
    pub open: f64,
    /// High price
    pub high: f64,
    /// Low price
    pub low: f64,
    /// Close price
    pub close: f64,
    /// Volume
    #[serde(default, alias = "vol")]
    pub volume: f64,
}

impl PricePoint {
    /// Build a bar where open, high, low, and close are all `close`.
    pub fn flat(date: NaiveDate, close: f64, volume: f64) -> Self {
        Self {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume,
        }
    }

    fn validate(&self) -> Result<()> {
        ensure_finite("open", self.open)?;
        ensure_finite("high", self.high)?;
        ensure_finite("low", self.low)?;
        ensure_finite("close", self.close)?;
        ensure_finite("volume", self.volume)?;
        if self.volume < 0.0 {
            return Err(Error::invalid_field("volume", "must not be negative"));
        }
        Ok(())
    }
}

/// Chronological price history of one instrument.
///
/// Dates are strictly increasing; gaps (weekends, suspensions) are fine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    code: String,
    points: Vec<PricePoint>,
}

#[derive(Deserialize)]
struct RawPriceSeries {
    code: String,
    points: Vec<PricePoint>,
}

impl<'de> Deserialize<'de> for PriceSeries {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawPriceSeries::deserialize(deserializer)?;
        PriceSeries::new(raw.code, raw.points).map_err(serde::de::Error::custom)
    }
}

impl PriceSeries {
    /// Create a validated series.
    pub fn new(code: impl Into<String>, points: Vec<PricePoint>) -> Result<Self> {
        let code = code.into();
        if points.is_empty() {
            return Err(Error::EmptyInput(format!("price series {}", code)));
        }

        for point in &points {
            point.validate()?;
        }

        if let Some(pair) = points.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(Error::invalid_field(
                "date",
                format!("{} does not follow {}", pair[1].date, pair[0].date),
            ));
        }

        Ok(Self { code, points })
    }

    /// Build a series from closes on consecutive calendar days.
    pub fn from_closes(code: impl Into<String>, start: NaiveDate, closes: &[f64]) -> Result<Self> {
        let points = closes
            .iter()
            .zip(start.iter_days())
            .map(|(&close, date)| PricePoint::flat(date, close, 0.0))
            .collect();
        Self::new(code, points)
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Close prices in chronological order.
    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    /// Volumes in chronological order.
    pub fn volumes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.volume).collect()
    }

    /// Most recent bar.
    pub fn latest(&self) -> &PricePoint {
        // Constructor guarantees at least one point
        &self.points[self.points.len() - 1]
    }

    /// Percentage change of the latest close against the previous one.
    pub fn latest_change_pct(&self) -> Option<f64> {
        let n = self.points.len();
        if n < 2 {
            return None;
        }
        let prev = self.points[n - 2].close;
        if prev > 0.0 {
            Some((self.points[n - 1].close - prev) / prev * 100.0)
        } else {
            None
        }
    }
}

/// Per-stock fundamentals for one evaluation date.
///
/// Every metric is optional: providers routinely omit values, and the
/// scorer and filter treat `None` explicitly rather than as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FundamentalRecord {
    /// Stock code (e.g., "600519.SH")
    #[serde(alias = "ts_code")]
    pub code: String,
    /// Stock name
    #[serde(default)]
    pub name: String,
    /// Price-to-earnings ratio
    #[serde(default)]
    pub pe: Option<f64>,
    /// Price-to-book ratio
    #[serde(default)]
    pub pb: Option<f64>,
    /// Return on equity (%)
    #[serde(default)]
    pub roe: Option<f64>,
    /// Dividend yield (%)
    #[serde(default, alias = "dv_ratio")]
    pub dividend_yield: Option<f64>,
    /// Daily turnover rate (%)
    #[serde(default)]
    pub turnover_rate: Option<f64>,
    /// Market capitalisation (100M yuan)
    #[serde(default)]
    pub market_cap: Option<f64>,
    /// Net profit margin (%)
    #[serde(default, alias = "netprofit_margin")]
    pub net_profit_margin: Option<f64>,
    /// Gross profit margin (%)
    #[serde(default, alias = "grossprofit_margin")]
    pub gross_profit_margin: Option<f64>,
    /// Dividends as a share of earnings (%)
    #[serde(default)]
    pub payout_ratio: Option<f64>,
}

impl FundamentalRecord {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_pe(mut self, pe: f64) -> Self {
        self.pe = Some(pe);
        self
    }

    pub fn with_pb(mut self, pb: f64) -> Self {
        self.pb = Some(pb);
        self
    }

    pub fn with_roe(mut self, roe: f64) -> Self {
        self.roe = Some(roe);
        self
    }

    pub fn with_dividend_yield(mut self, dividend_yield: f64) -> Self {
        self.dividend_yield = Some(dividend_yield);
        self
    }

    pub fn with_turnover_rate(mut self, turnover_rate: f64) -> Self {
        self.turnover_rate = Some(turnover_rate);
        self
    }

    pub fn with_market_cap(mut self, market_cap: f64) -> Self {
        self.market_cap = Some(market_cap);
        self
    }

    pub fn with_payout_ratio(mut self, payout_ratio: f64) -> Self {
        self.payout_ratio = Some(payout_ratio);
        self
    }
}
