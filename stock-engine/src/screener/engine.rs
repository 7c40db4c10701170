//! Screener engine module.
//!
//! Runs filter, score, and rank over one batch of records.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use stock_common::config::Config;
use tracing::{debug, info};

use super::config::{FilterCriteria, ScoreWeights};
use super::quantitative::{FilterResult, FilterStage, QuantitativeFilter};
use super::scoring::{Factor, RecordFailure, Scorer};
use crate::data::FundamentalRecord;
use crate::error::{Error, Result};

/// Default number of stocks kept by a screen.
pub const DEFAULT_TOP_N: usize = 10;

// ============================================================================
// Ranked Stock
// ============================================================================

/// A stock that passed the screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedStock {
    /// 1-based position
    pub rank: usize,
    /// Stock code (e.g., "600519.SH")
    pub code: String,
    /// Stock name
    pub name: String,
    /// Composite score (0-100)
    pub composite_score: f64,
    /// Per-factor sub-scores
    pub component_scores: BTreeMap<Factor, f64>,
    /// Input fundamentals
    pub fundamentals: FundamentalRecord,
}

// ============================================================================
// Screen Report
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenStatus {
    Success,
    NoMatches,
}

/// Result of a screening operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenReport {
    pub status: ScreenStatus,
    /// Whether the fallback screen produced the matches
    pub relaxed: bool,
    /// Total records scanned
    pub total_input: usize,
    /// Records that passed filtering
    pub matched: usize,
    /// Screened stocks (sorted by score descending)
    pub stocks: Vec<RankedStock>,
    /// Filter stage results
    pub filter_results: Vec<FilterResult>,
    /// Matched records that could not be scored
    pub failures: Vec<RecordFailure>,
    /// Criteria used
    pub criteria: FilterCriteria,
    /// Weights used
    pub weights: ScoreWeights,
}

impl ScreenReport {
    /// Get the top N stocks by score.
    pub fn top(&self, n: usize) -> &[RankedStock] {
        &self.stocks[..n.min(self.stocks.len())]
    }

    /// Summary string for logging.
    pub fn summary(&self) -> String {
        let rate = if self.total_input > 0 {
            self.matched as f64 / self.total_input as f64 * 100.0
        } else {
            0.0
        };
        format!(
            "Screened {} stocks: {} passed ({:.1}%), {} ranked{}",
            self.total_input,
            self.matched,
            rate,
            self.stocks.len(),
            if self.relaxed { " (relaxed)" } else { "" }
        )
    }
}

// ============================================================================
// Screener
// ============================================================================

/// Filter, score, and rank pipeline.
#[derive(Debug, Clone)]
pub struct Screener {
    filter: QuantitativeFilter,
    scorer: Scorer,
    top_n: usize,
    relax_on_empty: bool,
}

impl Default for Screener {
    fn default() -> Self {
        Self {
            filter: QuantitativeFilter::default(),
            scorer: Scorer::default(),
            top_n: DEFAULT_TOP_N,
            relax_on_empty: false,
        }
    }
}

impl Screener {
    /// Create a screener, validating criteria and weights.
    pub fn new(criteria: FilterCriteria, weights: ScoreWeights) -> Result<Self> {
        criteria.validate()?;
        Ok(Self {
            filter: QuantitativeFilter::new(criteria),
            scorer: Scorer::new(weights)?,
            ..Self::default()
        })
    }

    /// Create from config
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            FilterCriteria::from_config(config)?,
            ScoreWeights::from_config(config),
        )?
        .with_top_n(config.screening.top_n)
        .with_relax_on_empty(config.screening.relax_on_empty))
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_relax_on_empty(mut self, relax: bool) -> Self {
        self.relax_on_empty = relax;
        self
    }

    pub fn criteria(&self) -> &FilterCriteria {
        self.filter.criteria()
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Run the screen over one batch.
    pub fn run(&self, records: &[FundamentalRecord]) -> Result<ScreenReport> {
        if records.is_empty() {
            return Err(Error::EmptyInput("no records to screen".into()));
        }

        let (mut matched, stats) = self.filter.filter_with_stats(records)?;
        let mut filter_results = vec![stats];
        let mut relaxed = false;

        if matched.is_empty() && self.relax_on_empty {
            debug!("No records matched, falling back to relaxed screen");
            let fallback = QuantitativeFilter::new(FilterCriteria::relaxed());
            let (passed, stats) = fallback.run_stage(FilterStage::Relaxed, records)?;
            matched = passed;
            filter_results.push(stats);
            relaxed = true;
        }

        let mut scored = Vec::with_capacity(matched.len());
        let mut failures = Vec::new();
        for record in &matched {
            match self.scorer.score(record) {
                Ok(score) => scored.push((record, score)),
                Err(e) => {
                    tracing::warn!(code = %record.code, error = %e, "Skipping unscorable record");
                    failures.push(RecordFailure::new(&record.code, &e));
                }
            }
        }

        // Stable: ties keep filter order
        scored.sort_by(|(_, a), (_, b)| b.composite_score.total_cmp(&a.composite_score));

        let stocks: Vec<RankedStock> = scored
            .into_iter()
            .take(self.top_n)
            .enumerate()
            .map(|(i, (record, score))| RankedStock {
                rank: i + 1,
                code: score.code,
                name: record.name.clone(),
                composite_score: score.composite_score,
                component_scores: score.component_scores,
                fundamentals: record.clone(),
            })
            .collect();

        let report = ScreenReport {
            status: if stocks.is_empty() {
                ScreenStatus::NoMatches
            } else {
                ScreenStatus::Success
            },
            relaxed,
            total_input: records.len(),
            matched: matched.len(),
            stocks,
            filter_results,
            failures,
            criteria: self.filter.criteria().clone(),
            weights: *self.scorer.weights(),
        };

        info!(
            status = ?report.status,
            ranked = report.stocks.len(),
            failed = report.failures.len(),
            "{}",
            report.summary()
        );
        Ok(report)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screener::config::Bound;

    fn create_test_record(code: &str, pe: f64, roe: f64) -> FundamentalRecord {
        FundamentalRecord::new(code, format!("Test {}", code))
            .with_pe(pe)
            .with_roe(roe)
    }

    fn value_criteria() -> FilterCriteria {
        FilterCriteria {
            pe: Bound::at_most(30.0),
            roe: Bound::at_least(10.0),
            ..FilterCriteria::default()
        }
    }

    #[test]
    fn test_run_ranks_by_score() {
        let screener = Screener::new(value_criteria(), ScoreWeights::default()).unwrap();
        let records = vec![
            create_test_record("A", 25.0, 12.0),
            create_test_record("B", 8.0, 20.0),
            create_test_record("C", 50.0, 30.0), // filtered out
            create_test_record("D", 15.0, 15.0),
        ];

        let report = screener.run(&records).unwrap();
        assert_eq!(report.status, ScreenStatus::Success);
        assert_eq!(report.total_input, 4);
        assert_eq!(report.matched, 3);
        let codes: Vec<_> = report.stocks.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, vec!["B", "D", "A"]);
        let ranks: Vec<_> = report.stocks.iter().map(|s| s.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        assert_eq!(report.filter_results.len(), 1);
        assert_eq!(report.filter_results[0].eliminated, 1);
    }

    #[test]
    fn test_run_ties_keep_input_order() {
        let screener = Screener::default();
        let records = vec![
            create_test_record("X", 12.0, 10.0),
            create_test_record("Y", 12.0, 10.0),
        ];
        let report = screener.run(&records).unwrap();
        assert_eq!(report.stocks[0].code, "X");
        assert_eq!(report.stocks[1].code, "Y");
    }

    #[test]
    fn test_run_top_n() {
        let screener = Screener::default().with_top_n(2);
        let records: Vec<_> = (0..5)
            .map(|i| create_test_record(&format!("S{}", i), 10.0 + i as f64, 12.0))
            .collect();
        let report = screener.run(&records).unwrap();
        assert_eq!(report.stocks.len(), 2);
        assert_eq!(report.matched, 5);
        assert_eq!(report.top(10).len(), 2);
    }

    #[test]
    fn test_no_matches() {
        let screener = Screener::new(value_criteria(), ScoreWeights::default()).unwrap();
        let report = screener.run(&[create_test_record("A", 90.0, 2.0)]).unwrap();
        assert_eq!(report.status, ScreenStatus::NoMatches);
        assert!(report.stocks.is_empty());
        assert!(!report.relaxed);
    }

    #[test]
    fn test_relax_on_empty() {
        let screener = Screener::new(value_criteria(), ScoreWeights::default())
            .unwrap()
            .with_relax_on_empty(true);
        let records = vec![
            create_test_record("A", 90.0, 2.0),
            create_test_record("B", -5.0, 1.0),
            create_test_record("C", 150.0, 3.0),
        ];

        let report = screener.run(&records).unwrap();
        assert!(report.relaxed);
        assert_eq!(report.status, ScreenStatus::Success);
        assert_eq!(report.stocks.len(), 1);
        assert_eq!(report.stocks[0].code, "A");
        assert_eq!(report.filter_results[1].stage, FilterStage::Relaxed);
    }

    #[test]
    fn test_scoring_failure_reported() {
        let screener = Screener::default();
        let records = vec![
            create_test_record("A", 12.0, 15.0),
            create_test_record("B", 12.0, 15.0).with_dividend_yield(-2.0),
        ];
        let report = screener.run(&records).unwrap();
        assert_eq!(report.stocks.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].code, "B");
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(Screener::default().run(&[]), Err(Error::EmptyInput(_))));
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.screening.top_n = 3;
        config.screening.relax_on_empty = true;
        config.screening.pe_max = Some(20.0);

        let screener = Screener::from_config(&config).unwrap();
        assert_eq!(screener.top_n(), 3);
        assert_eq!(screener.criteria().pe, Bound::at_most(20.0));
    }

    #[test]
    fn test_summary() {
        let report = Screener::default()
            .run(&[create_test_record("A", 12.0, 15.0)])
            .unwrap();
        assert_eq!(report.summary(), "Screened 1 stocks: 1 passed (100.0%), 1 ranked");
    }
}
