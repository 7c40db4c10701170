//! Valuation rating types.

use serde::{Deserialize, Serialize};

// ============================================================================
// Valuation Bands
// ============================================================================

/// Absolute band of a single PE or PB reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValuationBand {
    /// Non-positive or missing (异常)
    Abnormal,
    /// 低估
    Undervalued,
    /// 合理偏低
    FairLow,
    /// 合理
    Fair,
    /// 合理偏高
    FairHigh,
    /// 高估
    Overvalued,
}

impl std::fmt::Display for ValuationBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Abnormal => write!(f, "异常"),
            Self::Undervalued => write!(f, "低估"),
            Self::FairLow => write!(f, "合理偏低"),
            Self::Fair => write!(f, "合理"),
            Self::FairHigh => write!(f, "合理偏高"),
            Self::Overvalued => write!(f, "高估"),
        }
    }
}

/// Combined PE/PB verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValuationStatus {
    DeeplyUndervalued,
    RelativelyUndervalued,
    Fair,
    RelativelyOvervalued,
    DeeplyOvervalued,
}

impl std::fmt::Display for ValuationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DeeplyUndervalued => write!(f, "严重低估"),
            Self::RelativelyUndervalued => write!(f, "相对低估"),
            Self::Fair => write!(f, "估值合理"),
            Self::RelativelyOvervalued => write!(f, "相对高估"),
            Self::DeeplyOvervalued => write!(f, "严重高估"),
        }
    }
}

/// PE/PB valuation of one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationAssessment {
    pub pe: Option<f64>,
    pub pb: Option<f64>,
    pub pe_band: ValuationBand,
    pub pb_band: ValuationBand,
    pub status: ValuationStatus,
}

// ============================================================================
// Dividend Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DividendRating {
    /// Yield >= 5%
    Excellent,
    /// Yield >= 3%
    Good,
    /// Yield >= 1%
    Average,
    Low,
    NoDividend,
}

impl std::fmt::Display for DividendRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Excellent => write!(f, "优秀"),
            Self::Good => write!(f, "良好"),
            Self::Average => write!(f, "一般"),
            Self::Low => write!(f, "较低"),
            Self::NoDividend => write!(f, "无股息"),
        }
    }
}

/// How much of earnings the dividend consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutSustainability {
    /// Payout ratio <= 50%
    Healthy,
    /// Payout ratio in (50%, 80%]
    Moderate,
    /// Payout ratio > 80%
    HighRisk,
}

impl std::fmt::Display for PayoutSustainability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Healthy => write!(f, "健康"),
            Self::Moderate => write!(f, "适中"),
            Self::HighRisk => write!(f, "较高风险"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividendAnalysis {
    /// Dividend yield (%)
    pub dividend_yield: Option<f64>,
    pub rating: DividendRating,
    /// Payout ratio (%)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payout_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sustainability: Option<PayoutSustainability>,
}

// ============================================================================
// Financial Health Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthRating {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl std::fmt::Display for HealthRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Excellent => write!(f, "优秀"),
            Self::Good => write!(f, "良好"),
            Self::Fair => write!(f, "一般"),
            Self::Poor => write!(f, "较差"),
        }
    }
}

/// Outcome of a single health check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckOutcome {
    Pass,
    Neutral,
    Fail,
}

impl CheckOutcome {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Pass => "✓",
            Self::Neutral => "○",
            Self::Fail => "✗",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthCheck {
    /// Metric checked (roe, net_profit_margin, gross_profit_margin)
    pub metric: String,
    pub value: f64,
    pub outcome: CheckOutcome,
    /// Points added to (or taken from) the base score
    pub adjustment: i32,
    pub description: String,
}

impl std::fmt::Display for HealthCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.outcome.symbol(), self.description)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialHealth {
    /// 0-100
    pub score: u8,
    pub rating: HealthRating,
    /// Checks in evaluation order; skipped metrics are absent
    pub checks: Vec<HealthCheck>,
}

// ============================================================================
// Fundamental Report
// ============================================================================

/// Rating summary of one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundamentalReport {
    pub code: String,
    pub name: String,
    pub valuation: ValuationAssessment,
    pub dividend: DividendAnalysis,
    pub health: FinancialHealth,
}
