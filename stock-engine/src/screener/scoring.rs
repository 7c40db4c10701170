//! Fundamental scoring.
//!
//! Every factor maps to a 0-100 sub-score. The composite is the weighted
//! mean over all factors, where a factor the record does not carry counts
//! as [`NEUTRAL_SCORE`]. Only present factors appear in
//! `component_scores`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::config::ScoreWeights;
use crate::data::FundamentalRecord;
use crate::error::{ensure_finite, Error, Result};

/// Sub-score assumed for a missing factor.
pub const NEUTRAL_SCORE: f64 = 50.0;

// ============================================================================
// Factors
// ============================================================================

/// Scoring factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    Pe,
    Pb,
    Roe,
    Dividend,
    Liquidity,
}

impl Factor {
    pub const ALL: [Factor; 5] = [
        Self::Pe,
        Self::Pb,
        Self::Roe,
        Self::Dividend,
        Self::Liquidity,
    ];

    /// Record field backing this factor.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Pe => "pe",
            Self::Pb => "pb",
            Self::Roe => "roe",
            Self::Dividend => "dividend_yield",
            Self::Liquidity => "turnover_rate",
        }
    }

    fn value(&self, record: &FundamentalRecord) -> Option<f64> {
        match self {
            Self::Pe => record.pe,
            Self::Pb => record.pb,
            Self::Roe => record.roe,
            Self::Dividend => record.dividend_yield,
            Self::Liquidity => record.turnover_rate,
        }
    }

    fn weight(&self, weights: &ScoreWeights) -> f64 {
        match self {
            Self::Pe => weights.pe,
            Self::Pb => weights.pb,
            Self::Roe => weights.roe,
            Self::Dividend => weights.dividend,
            Self::Liquidity => weights.liquidity,
        }
    }

    /// Map a raw (finite) value to its 0-100 sub-score.
    pub fn sub_score(&self, value: f64) -> Result<f64> {
        let score = match self {
            // Loss-making or negative book value
            Self::Pe if value <= 0.0 => 0.0,
            Self::Pe => 50.0 - (value - 10.0) * 2.0,
            Self::Pb if value <= 0.0 => 0.0,
            Self::Pb => 40.0 - (value - 1.0) * 10.0,
            Self::Roe => value * 10.0,
            Self::Dividend | Self::Liquidity if value < 0.0 => {
                return Err(Error::invalid_field(self.field(), format!("must not be negative, got {}", value)));
            }
            Self::Dividend => value * 20.0,
            Self::Liquidity => 50.0 - (value - 3.0).abs() * 10.0,
        };
        Ok(clamp_score(score))
    }
}

impl std::fmt::Display for Factor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pe => write!(f, "市盈率"),
            Self::Pb => write!(f, "市净率"),
            Self::Roe => write!(f, "净资产收益率"),
            Self::Dividend => write!(f, "股息率"),
            Self::Liquidity => write!(f, "流动性"),
        }
    }
}

fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}

// ============================================================================
// Score Results
// ============================================================================

/// Score of one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub code: String,
    pub composite_score: f64,
    /// Only the factors the record carries
    pub component_scores: BTreeMap<Factor, f64>,
}

/// A record the batch could not score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordFailure {
    pub code: String,
    /// Machine-readable error kind
    pub kind: String,
    pub message: String,
}

impl RecordFailure {
    pub(crate) fn new(code: &str, error: &Error) -> Self {
        Self {
            code: code.to_string(),
            kind: error.kind().to_string(),
            message: error.to_string(),
        }
    }
}

/// Scores of a batch, in input order, plus the records that failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchScores {
    pub scored: Vec<ScoreResult>,
    pub failed: Vec<RecordFailure>,
}

// ============================================================================
// Scorer
// ============================================================================

/// Weighted multi-factor scorer.
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    weights: ScoreWeights,
}

impl Scorer {
    /// Create a scorer, validating the weight table.
    pub fn new(weights: ScoreWeights) -> Result<Self> {
        weights.validate()?;
        Ok(Self { weights })
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    /// Score one record.
    pub fn score(&self, record: &FundamentalRecord) -> Result<ScoreResult> {
        let mut component_scores = BTreeMap::new();
        let mut weighted_sum = 0.0;
        let mut weight_sum = 0.0;

        for factor in Factor::ALL {
            let sub_score = match factor.value(record) {
                Some(raw) => {
                    let score = factor.sub_score(ensure_finite(factor.field(), raw)?)?;
                    component_scores.insert(factor, score);
                    score
                }
                None => NEUTRAL_SCORE,
            };
            let weight = factor.weight(&self.weights);

            weighted_sum += sub_score * weight;
            weight_sum += weight;
        }

        let composite_score = if weight_sum > 0.0 {
            weighted_sum / weight_sum
        } else {
            NEUTRAL_SCORE
        };

        Ok(ScoreResult {
            code: record.code.clone(),
            composite_score,
            component_scores,
        })
    }

    /// Score a batch. Bad records are reported in `failed` and never abort
    /// the rest.
    pub fn score_all(&self, records: &[FundamentalRecord]) -> Result<BatchScores> {
        if records.is_empty() {
            return Err(Error::EmptyInput("no records to score".into()));
        }

        let mut batch = BatchScores::default();
        for record in records {
            match self.score(record) {
                Ok(result) => batch.scored.push(result),
                Err(e) => {
                    tracing::warn!(code = %record.code, error = %e, "Skipping unscorable record");
                    batch.failed.push(RecordFailure::new(&record.code, &e));
                }
            }
        }

        tracing::debug!(
            scored = batch.scored.len(),
            failed = batch.failed.len(),
            "Batch scoring complete"
        );
        Ok(batch)
    }
}

// ============================================================================
// Tests
// ============================================================================
