//! Stock Engine CLI
//!
//! Reads price series or fundamental records from JSON files and prints
//! analysis results as pretty JSON on stdout. Logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use stock_common::config::Config;
use stock_common::logging::init_logging_with_exclusions;
use stock_common::util::{read_json_file, to_pretty_json};
use stock_common::ValidationError;
use tracing::info;

use stock_engine::indicators::{IndicatorConfig, TechnicalAnalyzer};
use stock_engine::screener::{
    rank_by, FilterCriteria, RankKey, ScoreWeights, Scorer, Screener, SortOrder,
};
use stock_engine::valuation::ValuationAnalyzer;
use stock_engine::{FundamentalRecord, PriceSeries};

/// Technical indicators, fundamental scoring, and stock screening.
#[derive(Parser, Debug)]
#[command(name = "stock-engine")]
#[command(version)]
#[command(about = "Technical indicators, fundamental scoring, and stock screening", long_about = None)]
struct Cli {
    /// Config file (default: ~/.stock-engine/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute technical indicators and the composite signal for a price series
    Indicators {
        /// JSON file with `{code, points: [{date, open, high, low, close, volume}]}`
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Score fundamental records
    Score {
        /// JSON array of fundamental records
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Filter, score, and rank fundamental records
    Screen {
        /// JSON array of fundamental records
        #[arg(short, long)]
        input: PathBuf,

        /// Number of stocks to keep (overrides config)
        #[arg(long)]
        top: Option<usize>,

        /// Use the recommended screen instead of the configured criteria
        #[arg(long)]
        recommended: bool,

        /// Fall back to a loose screen when nothing matches
        #[arg(long)]
        relax: bool,
    },

    /// Rank records by a single metric
    Rank {
        /// JSON array of fundamental records
        #[arg(short, long)]
        input: PathBuf,

        /// Metric to rank by
        #[arg(long, value_enum, default_value = "roe")]
        by: RankMetric,

        /// Sort ascending instead of descending
        #[arg(long)]
        ascending: bool,

        /// Number of records to keep
        #[arg(long, default_value = "10")]
        top: usize,
    },

    /// Rate valuation, dividend, and financial health of each record
    Rate {
        /// JSON array of fundamental records
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum RankMetric {
    Roe,
    Pe,
    DividendYield,
}

impl From<RankMetric> for RankKey {
    fn from(metric: RankMetric) -> Self {
        match metric {
            RankMetric::Roe => Self::Roe,
            RankMetric::Pe => Self::Pe,
            RankMetric::DividendYield => Self::DividendYield,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code(&e));
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    init_logging_with_exclusions(
        &config.observability.log_level,
        &config.observability.log_format,
        &config.observability.excluded_targets,
    );

    match cli.command {
        Commands::Indicators { input } => {
            let series: PriceSeries = read_json_file(&input)?;
            let analyzer = TechnicalAnalyzer::new(IndicatorConfig::from_config(&config));
            let report = analyzer.analyze(&series)?;
            info!(code = %report.code, score = report.signal.score, "Indicators computed");
            print_json(&report)
        }
        Commands::Score { input } => {
            let records = read_records(&input)?;
            let scorer = Scorer::new(ScoreWeights::from_config(&config))?;
            print_json(&scorer.score_all(&records)?)
        }
        Commands::Screen {
            input,
            top,
            recommended,
            relax,
        } => {
            let records = read_records(&input)?;
            let mut screener = if recommended {
                Screener::new(FilterCriteria::recommended(), ScoreWeights::from_config(&config))?
                    .with_top_n(config.screening.top_n)
                    .with_relax_on_empty(config.screening.relax_on_empty)
            } else {
                Screener::from_config(&config)?
            };
            if let Some(top) = top {
                screener = screener.with_top_n(top);
            }
            if relax {
                screener = screener.with_relax_on_empty(true);
            }
            print_json(&screener.run(&records)?)
        }
        Commands::Rank {
            input,
            by,
            ascending,
            top,
        } => {
            let records = read_records(&input)?;
            let order = if ascending {
                SortOrder::Ascending
            } else {
                SortOrder::Descending
            };
            print_json(&rank_by(&records, by.into(), order, top))
        }
        Commands::Rate { input } => {
            let records = read_records(&input)?;
            let analyzer = ValuationAnalyzer::new();
            let reports: Vec<_> = records.iter().map(|r| analyzer.analyze(r)).collect();
            print_json(&reports)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => {
            let mut config = Config::load_from(path)?;
            config.apply_env_overrides();
            config
        }
        None => Config::load_with_env()?,
    };
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn read_records(path: &Path) -> Result<Vec<FundamentalRecord>> {
    let records: Vec<FundamentalRecord> = read_json_file(path)?;
    tracing::debug!(path = %path.display(), count = records.len(), "Loaded records");
    Ok(records)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", to_pretty_json(value)?);
    Ok(())
}

fn exit_code(err: &anyhow::Error) -> i32 {
    if let Some(e) = err.downcast_ref::<stock_common::Error>() {
        e.exit_code()
    } else if err.downcast_ref::<ValidationError>().is_some() {
        78
    } else if err.downcast_ref::<stock_engine::Error>().is_some() {
        65
    } else {
        1
    }
}
