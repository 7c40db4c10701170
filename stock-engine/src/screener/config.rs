//! Screener configuration module.
//!
//! Filter bounds, the missing-value policy, and score weights.

use serde::{Deserialize, Serialize};
use stock_common::config::{Config, ScoringConfig, ScreeningConfig};

use crate::data::FundamentalRecord;
use crate::error::{Error, Result};

// ============================================================================
// Bounds
// ============================================================================

/// Inclusive range on one field; an absent side is unconstrained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bound {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl Bound {
    pub const UNBOUNDED: Self = Self {
        min: None,
        max: None,
    };

    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    pub fn at_least(min: f64) -> Self {
        Self::new(Some(min), None)
    }

    pub fn at_most(max: f64) -> Self {
        Self::new(None, Some(max))
    }

    pub fn between(min: f64, max: f64) -> Self {
        Self::new(Some(min), Some(max))
    }

    /// Whether either side is set.
    pub fn is_active(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    /// Inclusive containment check.
    pub fn contains(&self, value: f64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

// ============================================================================
// Missing Field Policy
// ============================================================================

/// What an active bound does when the record has no value for its field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingFieldPolicy {
    /// The record passes that bound
    #[default]
    Pass,
    /// The record fails that bound
    Reject,
}

impl std::str::FromStr for MissingFieldPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "pass" => Ok(Self::Pass),
            "reject" => Ok(Self::Reject),
            other => Err(Error::invalid_field(
                "missing_policy",
                format!("expected 'pass' or 'reject', got '{}'", other),
            )),
        }
    }
}

// ============================================================================
// Filter Criteria
// ============================================================================

/// Fields a criterion can constrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    Pe,
    Pb,
    Roe,
    DividendYield,
    TurnoverRate,
    MarketCap,
}

impl FilterField {
    pub const ALL: [FilterField; 6] = [
        Self::Pe,
        Self::Pb,
        Self::Roe,
        Self::DividendYield,
        Self::TurnoverRate,
        Self::MarketCap,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Pe => "pe",
            Self::Pb => "pb",
            Self::Roe => "roe",
            Self::DividendYield => "dividend_yield",
            Self::TurnoverRate => "turnover_rate",
            Self::MarketCap => "market_cap",
        }
    }

    /// Read this field from a record.
    pub fn value(&self, record: &FundamentalRecord) -> Option<f64> {
        match self {
            Self::Pe => record.pe,
            Self::Pb => record.pb,
            Self::Roe => record.roe,
            Self::DividendYield => record.dividend_yield,
            Self::TurnoverRate => record.turnover_rate,
            Self::MarketCap => record.market_cap,
        }
    }
}

/// Multi-criteria screen: one inclusive bound per field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub pe: Bound,
    #[serde(default)]
    pub pb: Bound,
    #[serde(default)]
    pub roe: Bound,
    #[serde(default)]
    pub dividend_yield: Bound,
    #[serde(default)]
    pub turnover_rate: Bound,
    #[serde(default)]
    pub market_cap: Bound,
    #[serde(default)]
    pub missing: MissingFieldPolicy,
}

impl FilterCriteria {
    /// The service's default screen: reasonable valuation, positive
    /// profitability, some dividend, and moderate trading activity.
    pub fn recommended() -> Self {
        Self {
            pe: Bound::between(0.0, 50.0),
            pb: Bound::between(0.0, 5.0),
            roe: Bound::at_least(5.0),
            dividend_yield: Bound::at_least(1.0),
            turnover_rate: Bound::between(0.5, 15.0),
            market_cap: Bound::UNBOUNDED,
            missing: MissingFieldPolicy::Pass,
        }
    }

    /// Loose fallback screen: profitable with PE under 100.
    pub fn relaxed() -> Self {
        Self {
            pe: Bound::between(f64::MIN_POSITIVE, 100.0),
            missing: MissingFieldPolicy::Reject,
            ..Self::default()
        }
    }

    /// Create from config
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::from_section(&config.screening)
    }

    fn from_section(section: &ScreeningConfig) -> Result<Self> {
        Ok(Self {
            pe: Bound::new(section.pe_min, section.pe_max),
            pb: Bound::new(section.pb_min, section.pb_max),
            roe: Bound::new(section.roe_min, section.roe_max),
            dividend_yield: Bound::new(section.dividend_min, section.dividend_max),
            turnover_rate: Bound::new(section.turnover_min, section.turnover_max),
            market_cap: Bound::new(section.market_cap_min, section.market_cap_max),
            missing: section.missing_policy.parse()?,
        })
    }

    pub fn bound(&self, field: FilterField) -> &Bound {
        match field {
            FilterField::Pe => &self.pe,
            FilterField::Pb => &self.pb,
            FilterField::Roe => &self.roe,
            FilterField::DividendYield => &self.dividend_yield,
            FilterField::TurnoverRate => &self.turnover_rate,
            FilterField::MarketCap => &self.market_cap,
        }
    }

    /// Fields with at least one side set.
    pub fn active_fields(&self) -> impl Iterator<Item = FilterField> + '_ {
        FilterField::ALL
            .into_iter()
            .filter(move |f| self.bound(*f).is_active())
    }

    /// Reject NaN bounds and bounds whose min exceeds max.
    pub fn validate(&self) -> Result<()> {
        for field in FilterField::ALL {
            let bound = self.bound(field);
            for side in [bound.min, bound.max].into_iter().flatten() {
                if side.is_nan() {
                    return Err(Error::invalid_parameter("criteria", format!("{} bound is NaN", field.name())));
                }
            }
            if let (Some(min), Some(max)) = (bound.min, bound.max) {
                if min > max {
                    return Err(Error::invalid_parameter(
                        "criteria",
                        format!("{} min {} exceeds max {}", field.name(), min, max),
                    ));
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// Score Weights
// ============================================================================

/// Static weight table of the fundamental composite score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub pe: f64,
    pub pb: f64,
    pub roe: f64,
    pub dividend: f64,
    pub liquidity: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self::from_section(&ScoringConfig::default())
    }
}

impl ScoreWeights {
    /// Create from config
    pub fn from_config(config: &Config) -> Self {
        Self::from_section(&config.scoring)
    }

    fn from_section(section: &ScoringConfig) -> Self {
        Self {
            pe: section.pe_weight,
            pb: section.pb_weight,
            roe: section.roe_weight,
            dividend: section.dividend_weight,
            liquidity: section.liquidity_weight,
        }
    }

    /// Weights must be finite, non-negative, and not all zero.
    pub fn validate(&self) -> Result<()> {
        let all = [self.pe, self.pb, self.roe, self.dividend, self.liquidity];
        if all.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(Error::invalid_parameter(
                "weights",
                "weights must be finite and non-negative",
            ));
        }
        if all.iter().sum::<f64>() <= 0.0 {
            return Err(Error::invalid_parameter(
                "weights",
                "at least one weight must be positive",
            ));
        }
        Ok(())
    }
}
