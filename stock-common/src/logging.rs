//! Logging setup for the stock analysis crates.
//!
//! Engine code logs through `tracing` macros with structured fields; this
//! module installs the subscriber once per process. Output always goes to
//! stderr so JSON results on stdout stay machine-readable.
//!
//! Filtering: `RUST_LOG` overrides the configured level. Otherwise the
//! configured level applies, with [`NOISY_MODULES`] and any extra targets
//! held at `warn`.

use std::str::FromStr;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Dependencies pinned to `warn` regardless of the configured level.
pub const NOISY_MODULES: &[&str] = &["clap", "clap_builder", "statrs"];

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per event, with file and line
    Json,
    /// Coloured single-line output for terminals
    #[default]
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// Filter directives for a base level: `level,noisy=warn,...,extra=warn`.
pub fn filter_directives(log_level: &str, excluded_targets: &[String]) -> String {
    let quiet = NOISY_MODULES
        .iter()
        .copied()
        .chain(excluded_targets.iter().map(String::as_str))
        .map(|target| format!(",{}=warn", target));

    std::iter::once(log_level.to_string()).chain(quiet).collect()
}

fn env_filter(log_level: &str, excluded_targets: &[String]) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(log_level, excluded_targets)))
}

/// Install the global subscriber.
///
/// `log_format` is "json" or "pretty"; anything else falls back to pretty.
/// Later calls are ignored.
pub fn init_logging(log_level: &str, log_format: &str) {
    init_logging_with_exclusions(log_level, log_format, &[]);
}

/// [`init_logging`] with extra targets held at `warn`.
pub fn init_logging_with_exclusions(
    log_level: &str,
    log_format: &str,
    excluded_targets: &[String],
) {
    let format = log_format.parse::<LogFormat>().unwrap_or_default();
    let registry = tracing_subscriber::registry().with(env_filter(log_level, excluded_targets));

    let installed = match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(true)
                    .with_target(true),
            )
            .try_init(),
    };

    if installed.is_ok() {
        tracing::debug!(
            log_level = %log_level,
            ?format,
            quieted = NOISY_MODULES.len() + excluded_targets.len(),
            "Logging ready"
        );
    }
}
