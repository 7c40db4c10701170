//! Error types shared by the stock analysis crates.

use thiserror::Error;

/// Result type alias using the shared error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for configuration and I/O boundaries.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input file or payload
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create an error with additional context.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Check if this is a configuration error.
    pub fn is_config(&self) -> bool {
        match self {
            Self::Config(_) => true,
            Self::WithContext { source, .. } => source.is_config(),
            _ => false,
        }
    }

    /// Process exit code for command-line front ends.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 78,
            Self::InvalidInput(_) | Self::Json(_) => 65,
            Self::NotFound(_) => 66,
            Self::Io(_) => 74,
            Self::WithContext { source, .. } => source.exit_code(),
        }
    }
}

/// Extension trait for adding context to any error type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(Error::Config("test".into()).exit_code(), 78);
        assert_eq!(Error::InvalidInput("test".into()).exit_code(), 65);
        assert_eq!(Error::NotFound("test".into()).exit_code(), 66);
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::Config("bad weights".into());
        let with_ctx = err.with_context("loading config");
        assert!(matches!(with_ctx, Error::WithContext { .. }));
        assert!(with_ctx.is_config());
        assert_eq!(with_ctx.exit_code(), 78);
        assert_eq!(with_ctx.to_string(), "loading config: Configuration error: bad weights");
    }

    #[test]
    fn test_result_ext_context() {
        let parsed: std::result::Result<serde_json::Value, serde_json::Error> =
            serde_json::from_str("{not json");
        let err = parsed.context("parsing records").unwrap_err();
        assert!(err.to_string().starts_with("parsing records: JSON error"));
        assert!(!err.is_config());
    }
}
