//! Valuation, dividend, and financial health ratings.

use super::types::*;
use crate::data::FundamentalRecord;

/// PE band upper limits: Undervalued, FairLow, Fair, FairHigh.
const PE_THRESHOLDS: [f64; 4] = [10.0, 20.0, 40.0, 60.0];
/// PB band upper limits: Undervalued, FairLow, Fair, FairHigh.
const PB_THRESHOLDS: [f64; 4] = [1.0, 2.0, 4.0, 6.0];

/// Starting score of the financial health check.
const HEALTH_BASE_SCORE: i32 = 60;

// ============================================================================
// Valuation
// ============================================================================

fn band(value: Option<f64>, thresholds: &[f64; 4]) -> ValuationBand {
    let Some(value) = value.filter(|v| v.is_finite() && *v > 0.0) else {
        return ValuationBand::Abnormal;
    };
    let [undervalued, fair_low, fair, fair_high] = *thresholds;
    if value < undervalued {
        ValuationBand::Undervalued
    } else if value < fair_low {
        ValuationBand::FairLow
    } else if value < fair {
        ValuationBand::Fair
    } else if value < fair_high {
        ValuationBand::FairHigh
    } else {
        ValuationBand::Overvalued
    }
}

/// Band of a PE reading.
pub fn pe_band(pe: Option<f64>) -> ValuationBand {
    band(pe, &PE_THRESHOLDS)
}

/// Band of a PB reading.
pub fn pb_band(pb: Option<f64>) -> ValuationBand {
    band(pb, &PB_THRESHOLDS)
}

/// Combine the PE and PB bands. Undervaluation is checked first.
pub fn valuation_status(pe_band: ValuationBand, pb_band: ValuationBand) -> ValuationStatus {
    use ValuationBand::{Overvalued, Undervalued};

    match (pe_band, pb_band) {
        (Undervalued, Undervalued) => ValuationStatus::DeeplyUndervalued,
        (Undervalued, _) | (_, Undervalued) => ValuationStatus::RelativelyUndervalued,
        (Overvalued, Overvalued) => ValuationStatus::DeeplyOvervalued,
        (Overvalued, _) | (_, Overvalued) => ValuationStatus::RelativelyOvervalued,
        _ => ValuationStatus::Fair,
    }
}

/// PE/PB valuation of a record.
pub fn assess_valuation(record: &FundamentalRecord) -> ValuationAssessment {
    let pe_band = pe_band(record.pe);
    let pb_band = pb_band(record.pb);
    ValuationAssessment {
        pe: record.pe,
        pb: record.pb,
        pe_band,
        pb_band,
        status: valuation_status(pe_band, pb_band),
    }
}

// ============================================================================
// Dividend
// ============================================================================

/// Rate a dividend yield (%).
pub fn dividend_rating(dividend_yield: Option<f64>) -> DividendRating {
    match dividend_yield.filter(|v| !v.is_nan()) {
        None => DividendRating::NoDividend,
        Some(y) if y >= 5.0 => DividendRating::Excellent,
        Some(y) if y >= 3.0 => DividendRating::Good,
        Some(y) if y >= 1.0 => DividendRating::Average,
        Some(_) => DividendRating::Low,
    }
}

/// Rate a payout ratio (%).
pub fn payout_sustainability(payout_ratio: f64) -> PayoutSustainability {
    if payout_ratio > 80.0 {
        PayoutSustainability::HighRisk
    } else if payout_ratio > 50.0 {
        PayoutSustainability::Moderate
    } else {
        PayoutSustainability::Healthy
    }
}

/// Rate the dividend and, when the payout ratio is known, its sustainability.
pub fn analyze_dividend(dividend_yield: Option<f64>, payout_ratio: Option<f64>) -> DividendAnalysis {
    let payout_ratio = payout_ratio.filter(|v| !v.is_nan());
    DividendAnalysis {
        dividend_yield,
        rating: dividend_rating(dividend_yield),
        payout_ratio,
        sustainability: payout_ratio.map(payout_sustainability),
    }
}

// ============================================================================
// Financial Health
// ============================================================================

/// One tier of a health check: `(exclusive lower limit, points, outcome, description)`.
type Tier = (f64, i32, CheckOutcome, &'static str);

const ROE_TIERS: [Tier; 3] = [
    (15.0, 10, CheckOutcome::Pass, "ROE优秀 (>15%)"),
    (10.0, 5, CheckOutcome::Pass, "ROE良好 (>10%)"),
    (5.0, 0, CheckOutcome::Neutral, "ROE一般 (>5%)"),
];
const ROE_FLOOR: (i32, &str) = (-10, "ROE偏低");

const NET_MARGIN_TIERS: [Tier; 3] = [
    (20.0, 5, CheckOutcome::Pass, "净利润率高 (>20%)"),
    (10.0, 3, CheckOutcome::Pass, "净利润率良好 (>10%)"),
    (0.0, 0, CheckOutcome::Neutral, "净利润率为正"),
];
const NET_MARGIN_FLOOR: (i32, &str) = (-15, "净利润率为负");

const GROSS_MARGIN_TIERS: [Tier; 3] = [
    (50.0, 5, CheckOutcome::Pass, "毛利率优秀 (>50%)"),
    (30.0, 3, CheckOutcome::Pass, "毛利率良好 (>30%)"),
    (0.0, 0, CheckOutcome::Neutral, "毛利率为正"),
];
const GROSS_MARGIN_FLOOR: (i32, &str) = (-10, "毛利率为负");

fn run_check(
    metric: &str,
    value: Option<f64>,
    tiers: &[Tier],
    floor: (i32, &str),
) -> Option<HealthCheck> {
    let value = value.filter(|v| !v.is_nan())?;
    let (adjustment, outcome, description) = tiers
        .iter()
        .find(|(limit, ..)| value > *limit)
        .map(|&(_, points, outcome, description)| (points, outcome, description))
        .unwrap_or((floor.0, CheckOutcome::Fail, floor.1));

    Some(HealthCheck {
        metric: metric.to_string(),
        value,
        outcome,
        adjustment,
        description: description.to_string(),
    })
}

/// Map a health score to its rating.
pub fn health_rating(score: u8) -> HealthRating {
    match score {
        80.. => HealthRating::Excellent,
        60..=79 => HealthRating::Good,
        40..=59 => HealthRating::Fair,
        _ => HealthRating::Poor,
    }
}

/// Score ROE, net margin, and gross margin against a base of 60.
///
/// Missing metrics are skipped and leave the score unchanged.
pub fn financial_health(record: &FundamentalRecord) -> FinancialHealth {
    let checks: Vec<HealthCheck> = [
        run_check("roe", record.roe, &ROE_TIERS, ROE_FLOOR),
        run_check(
            "net_profit_margin",
            record.net_profit_margin,
            &NET_MARGIN_TIERS,
            NET_MARGIN_FLOOR,
        ),
        run_check(
            "gross_profit_margin",
            record.gross_profit_margin,
            &GROSS_MARGIN_TIERS,
            GROSS_MARGIN_FLOOR,
        ),
    ]
    .into_iter()
    .flatten()
    .collect();

    let raw = HEALTH_BASE_SCORE + checks.iter().map(|c| c.adjustment).sum::<i32>();
    let score = raw.clamp(0, 100) as u8;

    FinancialHealth {
        score,
        rating: health_rating(score),
        checks,
    }
}

// ============================================================================
// Analyzer
// ============================================================================

/// Produces the full rating summary of a record.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValuationAnalyzer;

impl ValuationAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Rate valuation, dividend, and financial health.
    ///
    /// Payout sustainability is only rated when the record carries a
    /// payout ratio.
    pub fn analyze(&self, record: &FundamentalRecord) -> FundamentalReport {
        let report = FundamentalReport {
            code: record.code.clone(),
            name: record.name.clone(),
            valuation: assess_valuation(record),
            dividend: analyze_dividend(record.dividend_yield, record.payout_ratio),
            health: financial_health(record),
        };
        tracing::debug!(
            code = %report.code,
            valuation = %report.valuation.status,
            health = report.health.score,
            "Fundamental ratings complete"
        );
        report
    }
}

// ============================================================================
// Tests
// ============================================================================
