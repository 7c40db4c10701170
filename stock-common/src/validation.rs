//! Configuration validation.
//!
//! Checks that weights, bounds, and indicator periods are usable before
//! any analysis runs.

use thiserror::Error;

use crate::config::{Config, IndicatorsConfig, ObservabilityConfig, ScoringConfig, ScreeningConfig};
use crate::logging::LogFormat;

/// Configuration validation error.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Invalid range for {field}: min {min} exceeds max {max}")]
    InvalidRange { field: String, min: f64, max: f64 },

    #[error("Configuration conflict: {reason}")]
    Conflict { reason: String },

    #[error("Multiple validation errors: {0:?}")]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Trait for validatable configuration sections.
pub trait Validate {
    /// Validate this configuration section.
    fn validate(&self) -> ValidationResult<()>;
}

impl Config {
    /// Validate the entire configuration.
    pub fn validate(&self) -> ValidationResult<()> {
        let mut errors: Vec<ValidationError> = [
            self.observability.validate(),
            self.scoring.validate(),
            self.screening.validate(),
            self.indicators.validate(),
        ]
        .into_iter()
        .filter_map(Result::err)
        .flat_map(|e| match e {
            ValidationError::Multiple(inner) => inner,
            other => vec![other],
        })
        .collect();

        if errors.is_empty() {
            Ok(())
        } else if errors.len() == 1 {
            Err(errors.remove(0))
        } else {
            Err(ValidationError::Multiple(errors))
        }
    }
}

impl Validate for ObservabilityConfig {
    fn validate(&self) -> ValidationResult<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "observability.log_level".into(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            });
        }

        if let Err(reason) = self.log_format.parse::<LogFormat>() {
            return Err(ValidationError::InvalidValue {
                field: "observability.log_format".into(),
                reason: format!("{}, expected json or pretty", reason),
            });
        }

        Ok(())
    }
}

impl Validate for ScoringConfig {
    fn validate(&self) -> ValidationResult<()> {
        let weights = [
            ("scoring.pe_weight", self.pe_weight),
            ("scoring.pb_weight", self.pb_weight),
            ("scoring.roe_weight", self.roe_weight),
            ("scoring.dividend_weight", self.dividend_weight),
            ("scoring.liquidity_weight", self.liquidity_weight),
        ];

        for (field, weight) in weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ValidationError::InvalidValue {
                    field: field.into(),
                    reason: format!("must be a non-negative number, got {}", weight),
                });
            }
        }

        let total: f64 = weights.iter().map(|(_, w)| w).sum();
        if total <= 0.0 {
            return Err(ValidationError::Conflict {
                reason: "at least one scoring weight must be positive".into(),
            });
        }

        Ok(())
    }
}

fn check_range(field: &str, min: Option<f64>, max: Option<f64>) -> ValidationResult<()> {
    for value in [min, max].into_iter().flatten() {
        if !value.is_finite() {
            return Err(ValidationError::InvalidValue {
                field: field.into(),
                reason: "bounds must be finite".into(),
            });
        }
    }

    match (min, max) {
        (Some(min), Some(max)) if min > max => Err(ValidationError::InvalidRange {
            field: field.into(),
            min,
            max,
        }),
        _ => Ok(()),
    }
}

impl Validate for ScreeningConfig {
    fn validate(&self) -> ValidationResult<()> {
        let ranges = [
            ("screening.pe", self.pe_min, self.pe_max),
            ("screening.pb", self.pb_min, self.pb_max),
            ("screening.roe", self.roe_min, self.roe_max),
            ("screening.dividend", self.dividend_min, self.dividend_max),
            ("screening.turnover", self.turnover_min, self.turnover_max),
            ("screening.market_cap", self.market_cap_min, self.market_cap_max),
        ];

        let mut errors: Vec<ValidationError> = ranges
            .into_iter()
            .filter_map(|(field, min, max)| check_range(field, min, max).err())
            .collect();

        let valid_policies = ["pass", "reject"];
        if !valid_policies.contains(&self.missing_policy.to_lowercase().as_str()) {
            errors.push(ValidationError::InvalidValue {
                field: "screening.missing_policy".into(),
                reason: format!("must be one of: {}", valid_policies.join(", ")),
            });
        }

        if self.top_n == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "screening.top_n".into(),
                reason: "must be at least 1".into(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else if errors.len() == 1 {
            Err(errors.remove(0))
        } else {
            Err(ValidationError::Multiple(errors))
        }
    }
}

impl Validate for IndicatorsConfig {
    fn validate(&self) -> ValidationResult<()> {
        let periods = self
            .ma_windows
            .iter()
            .map(|p| ("indicators.ma_windows", *p))
            .chain(self.rsi_periods.iter().map(|p| ("indicators.rsi_periods", *p)))
            .chain([
                ("indicators.macd_fast", self.macd_fast),
                ("indicators.macd_slow", self.macd_slow),
                ("indicators.macd_signal", self.macd_signal),
                ("indicators.signal_rsi_period", self.signal_rsi_period),
            ]);

        for (field, period) in periods {
            if period == 0 {
                return Err(ValidationError::InvalidValue {
                    field: field.into(),
                    reason: "periods must be positive".into(),
                });
            }
        }

        if self.macd_fast >= self.macd_slow {
            return Err(ValidationError::Conflict {
                reason: format!(
                    "indicators.macd_fast ({}) must be shorter than indicators.macd_slow ({})",
                    self.macd_fast, self.macd_slow
                ),
            });
        }

        if self.bollinger_period < 2 {
            return Err(ValidationError::InvalidValue {
                field: "indicators.bollinger_period".into(),
                reason: "must be at least 2".into(),
            });
        }

        if !self.bollinger_k.is_finite() || self.bollinger_k <= 0.0 {
            return Err(ValidationError::InvalidValue {
                field: "indicators.bollinger_k".into(),
                reason: "must be a positive number".into(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test_case("verbose", "pretty" ; "unknown level")]
    #[test_case("info", "xml" ; "unknown format")]
    fn test_invalid_observability(level: &str, format: &str) {
        let config = ObservabilityConfig {
            log_level: level.into(),
            log_format: format.into(),
            excluded_targets: Vec::new(),
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let scoring = ScoringConfig {
            pb_weight: -0.1,
            ..ScoringConfig::default()
        };
        let err = scoring.validate().unwrap_err();
        assert!(err.to_string().contains("scoring.pb_weight"));
    }

    #[test]
    fn test_all_zero_weights_rejected() {
        let scoring = ScoringConfig {
            pe_weight: 0.0,
            pb_weight: 0.0,
            roe_weight: 0.0,
            dividend_weight: 0.0,
            liquidity_weight: 0.0,
        };
        assert!(matches!(
            scoring.validate(),
            Err(ValidationError::Conflict { .. })
        ));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let screening = ScreeningConfig {
            pe_min: Some(40.0),
            pe_max: Some(10.0),
            ..ScreeningConfig::default()
        };
        assert!(matches!(
            screening.validate(),
            Err(ValidationError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_multiple_screening_errors_aggregate() {
        let screening = ScreeningConfig {
            pb_min: Some(5.0),
            pb_max: Some(1.0),
            missing_policy: "ignore".into(),
            top_n: 0,
            ..ScreeningConfig::default()
        };
        match screening.validate() {
            Err(ValidationError::Multiple(errors)) => assert_eq!(errors.len(), 3),
            other => panic!("expected multiple errors, got {:?}", other),
        }
    }

    #[test]
    fn test_macd_periods_must_be_ordered() {
        let indicators = IndicatorsConfig {
            macd_fast: 26,
            macd_slow: 12,
            ..IndicatorsConfig::default()
        };
        assert!(matches!(
            indicators.validate(),
            Err(ValidationError::Conflict { .. })
        ));
    }

    #[test]
    fn test_zero_period_rejected() {
        let indicators = IndicatorsConfig {
            rsi_periods: vec![6, 0],
            ..IndicatorsConfig::default()
        };
        let err = indicators.validate().unwrap_err();
        assert!(err.to_string().contains("indicators.rsi_periods"));
    }

    #[test]
    fn test_config_flattens_section_errors() {
        let mut config = Config::default();
        config.observability.log_format = "xml".into();
        config.indicators.bollinger_period = 1;
        match config.validate() {
            Err(ValidationError::Multiple(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected multiple errors, got {:?}", other),
        }
    }
}
