//! Stock Engine Library
//!
//! Stateless analysis of A-share market data: technical indicators over a
//! daily price series, and multi-factor scoring and screening over
//! per-stock fundamentals.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        stock-engine (library)                        │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │  PriceSeries ──▶ indicators ──▶ TechnicalReport + CompositeSignal   │
//! │                  (MA/EMA, MACD, RSI, Bollinger, volume)             │
//! │                                                                     │
//! │  FundamentalRecord ──▶ screener ──▶ ScreenReport                    │
//! │                        (filter → score → rank)                      │
//! │                                                                     │
//! │  FundamentalRecord ──▶ valuation ──▶ FundamentalReport              │
//! │                        (PE/PB bands, dividend, financial health)    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every entry point is a pure function of its inputs. Short histories and
//! missing fundamentals are reported explicitly rather than guessed at.

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod data;
pub mod error;
pub mod indicators;
pub mod screener;
pub mod valuation;

pub use data::{FundamentalRecord, PricePoint, PriceSeries};
pub use error::{Error, Result};
pub use indicators::{Outcome, TechnicalAnalyzer, TechnicalReport};
pub use screener::{FilterCriteria, QuantitativeFilter, ScreenReport, Screener, Scorer};
pub use valuation::{FundamentalReport, ValuationAnalyzer};
