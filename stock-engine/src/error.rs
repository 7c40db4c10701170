//! Error types for the analysis engine.

use thiserror::Error;

/// Result type alias using the engine error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by indicator, scoring, and screening operations.
///
/// None of these is fatal: batch operations report them per record and
/// keep going.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Series shorter than the indicator's minimum window
    #[error("Insufficient data for {indicator}: need {required} points, have {available}")]
    InsufficientData {
        indicator: &'static str,
        required: usize,
        available: usize,
    },

    /// Non-numeric or out-of-domain field value
    #[error("Invalid field {field}: {reason}")]
    InvalidField { field: String, reason: String },

    /// Nothing to filter, score, or analyze
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// Indicator or scorer parameter outside its domain
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

impl Error {
    pub(crate) fn insufficient(indicator: &'static str, required: usize, available: usize) -> Self {
        Self::InsufficientData {
            indicator,
            required,
            available,
        }
    }

    pub(crate) fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Check if this is an insufficient-history error.
    pub const fn is_insufficient_data(&self) -> bool {
        matches!(self, Self::InsufficientData { .. })
    }

    /// Stable machine-readable kind, used in serialized reports.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InsufficientData { .. } => "insufficient_data",
            Self::InvalidField { .. } => "invalid_field",
            Self::EmptyInput(_) => "empty_input",
            Self::InvalidParameter { .. } => "invalid_parameter",
        }
    }
}

/// Reject NaN and infinities for a named field.
pub(crate) fn ensure_finite(field: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::invalid_field(field, format!("expected a finite number, got {}", value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::insufficient("macd", 26, 10);
        assert_eq!(err.to_string(), "Insufficient data for macd: need 26 points, have 10");
        assert!(err.is_insufficient_data());
        assert_eq!(err.kind(), "insufficient_data");
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(Error::invalid_field("pe", "nan").kind(), "invalid_field");
        assert_eq!(Error::EmptyInput("records".into()).kind(), "empty_input");
        assert_eq!(Error::invalid_parameter("period", "zero").kind(), "invalid_parameter");
    }

    #[test]
    fn test_ensure_finite() {
        assert_eq!(ensure_finite("pe", 12.5), Ok(12.5));
        assert!(matches!(
            ensure_finite("pe", f64::NAN),
            Err(Error::InvalidField { ref field, .. }) if field == "pe"
        ));
        assert!(ensure_finite("pb", f64::INFINITY).is_err());
    }
}
