//! Tracing subscriber setup
//!
//! Filtering follows `RUST_LOG` (default `info`). Output is human readable
//! unless JSON is requested, e.g. for log shipping from the daemon.

use std::str::FromStr;

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Output format of log lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("Invalid log format: {other}")),
        }
    }
}

/// Build the filter from `RUST_LOG`, or `default` when unset or invalid
pub fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Install the global subscriber
///
/// Returns `false` if a subscriber was already installed; the existing one
/// is kept.
pub fn init_logging(format: LogFormat, verbose: bool) -> bool {
    let filter = if verbose { env_filter("debug") } else { env_filter(DEFAULT_FILTER) };
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);

    let result = match format {
        LogFormat::Pretty => builder.with_target(false).try_init(),
        LogFormat::Json => builder.json().with_current_span(true).try_init(),
    };
    result.is_ok()
}
