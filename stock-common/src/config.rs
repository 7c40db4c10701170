//! Configuration for the stock analysis engine.
//!
//! Configuration lives in `~/.stock-engine/config.json`. Every field has a
//! default, so a missing file or a partial file is always usable.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result, ResultExt};

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from(".stock-engine"),
        |dirs| dirs.home_dir().join(".stock-engine"),
    )
}

/// Get the configuration file path.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Fundamental score weights
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Screening criteria and pipeline options
    #[serde(default)]
    pub screening: ScreeningConfig,

    /// Technical indicator parameters
    #[serde(default)]
    pub indicators: IndicatorsConfig,
}

impl Config {
    /// Load configuration from the default path.
    pub fn load() -> Result<Self> {
        let path = config_path();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    ///
    /// A missing file is `NotFound`; a file that does not decode is a
    /// `Config` error.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::NotFound(format!("config file {}", path.display())));
        }

        let content = fs::read_to_string(path)
            .context(format!("Failed to read config from {}", path.display()))?;

        serde_json::from_str(&content).map_err(|e| {
            Error::Config(format!("Failed to parse config from {}: {}", path.display(), e))
        })
    }

    /// Load configuration with environment variable fallbacks.
    pub fn load_with_env() -> Result<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Unparseable values are ignored and the configured value is kept.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("STOCK_LOG_LEVEL") {
            self.observability.log_level = level;
        }
        if let Some(format) = lookup("STOCK_LOG_FORMAT") {
            self.observability.log_format = format;
        }
        if let Some(top_n) = lookup("STOCK_TOP_N") {
            match top_n.parse() {
                Ok(n) => self.screening.top_n = n,
                Err(_) => tracing::warn!(value = %top_n, "Ignoring invalid STOCK_TOP_N"),
            }
        }
    }

    /// Save configuration to a path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context(format!("Failed to create {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).context(format!("Failed to write config to {}", path.display()))
    }
}

// ============================================================================
// Observability Configuration
// ============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level", alias = "level")]
    pub log_level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format", alias = "format")]
    pub log_format: String,

    /// Additional module targets pinned to `warn`.
    #[serde(default)]
    pub excluded_targets: Vec<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
            excluded_targets: Vec::new(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

// ============================================================================
// Scoring Configuration
// ============================================================================

/// Weights of the fundamental composite score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_pe_weight")]
    pub pe_weight: f64,
    #[serde(default = "default_pb_weight")]
    pub pb_weight: f64,
    #[serde(default = "default_roe_weight")]
    pub roe_weight: f64,
    #[serde(default = "default_dividend_weight")]
    pub dividend_weight: f64,
    #[serde(default = "default_liquidity_weight")]
    pub liquidity_weight: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            pe_weight: default_pe_weight(),
            pb_weight: default_pb_weight(),
            roe_weight: default_roe_weight(),
            dividend_weight: default_dividend_weight(),
            liquidity_weight: default_liquidity_weight(),
        }
    }
}

fn default_pe_weight() -> f64 {
    0.25
}

fn default_pb_weight() -> f64 {
    0.20
}

fn default_roe_weight() -> f64 {
    0.25
}

fn default_dividend_weight() -> f64 {
    0.20
}

fn default_liquidity_weight() -> f64 {
    0.10
}

// ============================================================================
// Screening Configuration
// ============================================================================

/// Screening bounds and pipeline options.
///
/// Bounds are inclusive; an absent bound leaves the field unconstrained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningConfig {
    #[serde(default)]
    pub pe_min: Option<f64>,
    #[serde(default)]
    pub pe_max: Option<f64>,
    #[serde(default)]
    pub pb_min: Option<f64>,
    #[serde(default)]
    pub pb_max: Option<f64>,
    #[serde(default)]
    pub roe_min: Option<f64>,
    #[serde(default)]
    pub roe_max: Option<f64>,
    #[serde(default)]
    pub dividend_min: Option<f64>,
    #[serde(default)]
    pub dividend_max: Option<f64>,
    #[serde(default)]
    pub turnover_min: Option<f64>,
    #[serde(default)]
    pub turnover_max: Option<f64>,
    #[serde(default)]
    pub market_cap_min: Option<f64>,
    #[serde(default)]
    pub market_cap_max: Option<f64>,

    /// What a bound does with a missing field: "pass" or "reject"
    #[serde(default = "default_missing_policy")]
    pub missing_policy: String,

    /// Number of ranked stocks a screen returns
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Fall back to a loose PE screen when nothing passes
    #[serde(default)]
    pub relax_on_empty: bool,
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            pe_min: None,
            pe_max: None,
            pb_min: None,
            pb_max: None,
            roe_min: None,
            roe_max: None,
            dividend_min: None,
            dividend_max: None,
            turnover_min: None,
            turnover_max: None,
            market_cap_min: None,
            market_cap_max: None,
            missing_policy: default_missing_policy(),
            top_n: default_top_n(),
            relax_on_empty: false,
        }
    }
}

fn default_missing_policy() -> String {
    "pass".to_string()
}

fn default_top_n() -> usize {
    10
}

// ============================================================================
// Indicator Configuration
// ============================================================================

/// Technical indicator parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorsConfig {
    #[serde(default = "default_ma_windows")]
    pub ma_windows: Vec<usize>,
    #[serde(default = "default_macd_fast")]
    pub macd_fast: usize,
    #[serde(default = "default_macd_slow")]
    pub macd_slow: usize,
    #[serde(default = "default_macd_signal")]
    pub macd_signal: usize,
    #[serde(default = "default_rsi_periods")]
    pub rsi_periods: Vec<usize>,
    /// RSI period the composite signal reads
    #[serde(default = "default_signal_rsi_period")]
    pub signal_rsi_period: usize,
    #[serde(default = "default_bollinger_period")]
    pub bollinger_period: usize,
    #[serde(default = "default_bollinger_k")]
    pub bollinger_k: f64,
}

impl Default for IndicatorsConfig {
    fn default() -> Self {
        Self {
            ma_windows: default_ma_windows(),
            macd_fast: default_macd_fast(),
            macd_slow: default_macd_slow(),
            macd_signal: default_macd_signal(),
            rsi_periods: default_rsi_periods(),
            signal_rsi_period: default_signal_rsi_period(),
            bollinger_period: default_bollinger_period(),
            bollinger_k: default_bollinger_k(),
        }
    }
}

fn default_ma_windows() -> Vec<usize> {
    vec![5, 10, 20, 60, 120]
}

fn default_macd_fast() -> usize {
    12
}

fn default_macd_slow() -> usize {
    26
}

fn default_macd_signal() -> usize {
    9
}

fn default_rsi_periods() -> Vec<usize> {
    vec![6, 12, 24]
}

fn default_signal_rsi_period() -> usize {
    6
}

fn default_bollinger_period() -> usize {
    20
}

fn default_bollinger_k() -> f64 {
    2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.observability.log_level, "info");
        assert_eq!(config.observability.log_format, "pretty");
        assert_eq!(config.screening.top_n, 10);
        assert_eq!(config.screening.missing_policy, "pass");
        assert_eq!(config.indicators.ma_windows, vec![5, 10, 20, 60, 120]);
        assert!((config.scoring.pe_weight - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let json = r#"{
            "observability": { "level": "debug" },
            "screening": { "pe_max": 30.0, "roe_min": 10.0 }
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.observability.log_level, "debug");
        assert_eq!(config.observability.log_format, "pretty");
        assert_eq!(config.screening.pe_max, Some(30.0));
        assert_eq!(config.screening.roe_min, Some(10.0));
        assert_eq!(config.screening.pb_max, None);
        assert_eq!(config.indicators.macd_slow, 26);
    }

    #[test]
    fn test_load_from_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.screening.top_n = 25;
        config.scoring.liquidity_weight = 0.0;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.screening.top_n, 25);
        assert_eq!(loaded.scoring.liquidity_weight, 0.0);
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(err.exit_code(), 66);
    }

    #[test]
    fn test_load_from_malformed_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("Failed to parse config"));
        assert_eq!(err.exit_code(), 78);
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("STOCK_LOG_LEVEL", "trace"),
            ("STOCK_LOG_FORMAT", "json"),
            ("STOCK_TOP_N", "3"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.observability.log_level, "trace");
        assert_eq!(config.observability.log_format, "json");
        assert_eq!(config.screening.top_n, 3);
    }

    #[test]
    fn test_invalid_top_n_override_is_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|key| (key == "STOCK_TOP_N").then(|| "many".to_string()));
        assert_eq!(config.screening.top_n, 10);
    }
}
