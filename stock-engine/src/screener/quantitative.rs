//! Quantitative filtering module for the screener.
//!
//! A record passes when every active bound of the criteria holds. Bounds
//! are inclusive; a field the record does not carry is resolved by the
//! criteria's [`MissingFieldPolicy`].

use serde::{Deserialize, Serialize};

use super::config::{FilterCriteria, MissingFieldPolicy};
use crate::data::FundamentalRecord;
use crate::error::{ensure_finite, Error, Result};

// ============================================================================
// Filter Stage
// ============================================================================

/// Filter stage identifier for tracking where stocks are eliminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterStage {
    /// Multi-criteria screen
    Criteria,
    /// Fallback screen after an empty result
    Relaxed,
}

impl std::fmt::Display for FilterStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Criteria => write!(f, "条件筛选"),
            Self::Relaxed => write!(f, "放宽筛选"),
        }
    }
}

// ============================================================================
// Filter Result
// ============================================================================

/// Result of a filtering stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterResult {
    /// Stage name
    pub stage: FilterStage,
    /// Number of stocks that passed this stage
    pub passed: usize,
    /// Number of stocks eliminated at this stage
    pub eliminated: usize,
    /// Elimination rate (%)
    pub elimination_rate: f64,
}

impl FilterResult {
    pub fn new(stage: FilterStage, input_count: usize, passed_count: usize) -> Self {
        let eliminated = input_count.saturating_sub(passed_count);
        let elimination_rate = if input_count > 0 {
            (eliminated as f64 / input_count as f64) * 100.0
        } else {
            0.0
        };

        Self {
            stage,
            passed: passed_count,
            eliminated,
            elimination_rate,
        }
    }
}

// ============================================================================
// Quantitative Filter
// ============================================================================

/// Multi-criteria filter over fundamental records.
#[derive(Debug, Clone, Default)]
pub struct QuantitativeFilter {
    criteria: FilterCriteria,
}

impl QuantitativeFilter {
    /// Create a new quantitative filter with the given criteria.
    pub fn new(criteria: FilterCriteria) -> Self {
        Self { criteria }
    }

    /// Create with the recommended screen.
    pub fn with_defaults() -> Self {
        Self::new(FilterCriteria::recommended())
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Check one record against every active bound.
    ///
    /// Fails with `InvalidField` when an active bound meets a non-finite
    /// value; fields without a bound are not inspected.
    pub fn check(&self, record: &FundamentalRecord) -> Result<bool> {
        for field in self.criteria.active_fields() {
            let bound = self.criteria.bound(field);
            match field.value(record) {
                Some(value) => {
                    let value = ensure_finite(field.name(), value)?;
                    if !bound.contains(value) {
                        return Ok(false);
                    }
                }
                None => {
                    if self.criteria.missing == MissingFieldPolicy::Reject {
                        return Ok(false);
                    }
                }
            }
        }
        Ok(true)
    }

    /// Keep the records that satisfy every bound, in input order.
    ///
    /// Records with non-numeric values are dropped and logged; they never
    /// abort the batch.
    pub fn filter(&self, records: &[FundamentalRecord]) -> Result<Vec<FundamentalRecord>> {
        self.filter_with_stats(records).map(|(passed, _)| passed)
    }

    /// Same as [`filter`](Self::filter), with elimination statistics.
    pub fn filter_with_stats(
        &self,
        records: &[FundamentalRecord],
    ) -> Result<(Vec<FundamentalRecord>, FilterResult)> {
        self.run_stage(FilterStage::Criteria, records)
    }

    pub(crate) fn run_stage(
        &self,
        stage: FilterStage,
        records: &[FundamentalRecord],
    ) -> Result<(Vec<FundamentalRecord>, FilterResult)> {
        if records.is_empty() {
            return Err(Error::EmptyInput("no records to filter".into()));
        }

        let passed: Vec<FundamentalRecord> = records
            .iter()
            .filter(|r| self.passes(r))
            .cloned()
            .collect();

        let result = FilterResult::new(stage, records.len(), passed.len());
        tracing::debug!(
            stage = %stage,
            input = records.len(),
            passed = result.passed,
            eliminated = result.eliminated,
            "Filter stage complete"
        );
        Ok((passed, result))
    }

    fn passes(&self, record: &FundamentalRecord) -> bool {
        match self.check(record) {
            Ok(passed) => passed,
            Err(e) => {
                tracing::warn!(code = %record.code, error = %e, "Excluding record with invalid field");
                false
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
