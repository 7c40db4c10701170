//! Fundamental screener.
//!
//! Filters a batch of [`FundamentalRecord`](crate::data::FundamentalRecord)s
//! against inclusive bounds, scores the survivors on five weighted factors,
//! and ranks them.
//!
//! # Usage
//!
//! ```
//! use stock_engine::data::FundamentalRecord;
//! use stock_engine::screener::{Bound, FilterCriteria, QuantitativeFilter};
//!
//! let criteria = FilterCriteria {
//!     pe: Bound::at_most(30.0),
//!     roe: Bound::at_least(10.0),
//!     ..FilterCriteria::default()
//! };
//! let records = vec![FundamentalRecord::new("600519.SH", "贵州茅台")
//!     .with_pe(15.0)
//!     .with_roe(18.0)];
//!
//! let passed = QuantitativeFilter::new(criteria).filter(&records)?;
//! assert_eq!(passed.len(), 1);
//! # Ok::<(), stock_engine::Error>(())
//! ```

pub mod config;
pub mod engine;
pub mod quantitative;
pub mod ranking;
pub mod scoring;

pub use config::{Bound, FilterCriteria, FilterField, MissingFieldPolicy, ScoreWeights};
pub use engine::{RankedStock, ScreenReport, ScreenStatus, Screener, DEFAULT_TOP_N};
pub use quantitative::{FilterResult, FilterStage, QuantitativeFilter};
pub use ranking::{rank_by, RankKey, SortOrder};
pub use scoring::{BatchScores, Factor, RecordFailure, ScoreResult, Scorer, NEUTRAL_SCORE};
