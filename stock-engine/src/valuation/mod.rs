//! Fundamental ratings.
//!
//! Absolute-threshold ratings of a single [`FundamentalRecord`](crate::data::FundamentalRecord):
//!
//! 1. **Valuation**: PE and PB bands combined into an overall verdict
//! 2. **Dividend**: yield rating and payout sustainability
//! 3. **Financial health**: ROE and margin checks against a base score
//!
//! Ratio helpers for deriving PE, PB, ROE, and yields from per-share data
//! live in [`ratios`].

pub mod analyzer;
pub mod ratios;
pub mod types;

pub use analyzer::{
    analyze_dividend, assess_valuation, dividend_rating, financial_health, health_rating,
    payout_sustainability, pb_band, pe_band, valuation_status, ValuationAnalyzer,
};
pub use ratios::{dividend_yield, payout_ratio, pb_ratio, pe_ratio, return_on_equity};
pub use types::{
    CheckOutcome, DividendAnalysis, DividendRating, FinancialHealth, FundamentalReport,
    HealthCheck, HealthRating, PayoutSustainability, ValuationAssessment, ValuationBand,
    ValuationStatus,
};
