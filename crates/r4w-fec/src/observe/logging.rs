//! # Structured Logging
//!
//! `tracing-subscriber` setup for applications using the FEC chain.
//!
//! Events emitted by this crate:
//!
//! - `trace`: every encoded block (`fec::convolutional`)
//! - `debug`: end of each decode with steps and path metric (`fec::viterbi`),
//!   interleaver tables built (`fec::interleaver`)
//! - `warn`: decode rejected for capacity (`fec::viterbi`), no generator
//!   taps the input bit (`fec::trellis`)
//!
//! Each Viterbi run is wrapped in a `viterbi` debug span.

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        f.write_str(s)
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per event
    Json,
    /// Multi-line, colored
    #[default]
    Pretty,
    /// One line per event
    Compact,
}

/// Logging configuration, the `logging:` section of the FEC config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    /// Directive string such as `"r4w_fec::fec::viterbi=trace"`. Overrides
    /// both `level` and `RUST_LOG`.
    pub filter: Option<String>,
    /// Include file:line
    pub source_location: bool,
    pub thread_ids: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Pretty,
            filter: None,
            source_location: false,
            thread_ids: false,
        }
    }
}

impl LogConfig {
    /// Debug level with source locations, pretty output.
    pub fn development() -> Self {
        Self {
            level: LogLevel::Debug,
            source_location: true,
            ..Default::default()
        }
    }

    /// Info level JSON with thread ids.
    pub fn production() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Json,
            thread_ids: true,
            ..Default::default()
        }
    }

    /// Errors only, compact.
    pub fn quiet() -> Self {
        Self {
            level: LogLevel::Error,
            format: LogFormat::Compact,
            ..Default::default()
        }
    }

    /// The filter directive used when neither `filter` nor `RUST_LOG` is set.
    pub fn default_directive(&self) -> String {
        self.level.to_string()
    }

    /// An unparsable `filter` falls back to the level directive.
    fn env_filter(&self) -> EnvFilter {
        match &self.filter {
            Some(custom) => EnvFilter::try_new(custom)
                .unwrap_or_else(|_| EnvFilter::new(self.default_directive())),
            None => EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(self.default_directive())),
        }
    }
}

/// Install the global `tracing` subscriber described by `config`.
///
/// Returns `false` if a global subscriber was already set, in which case
/// nothing changes.
pub fn init_logging(config: &LogConfig) -> bool {
    let layer = fmt::layer()
        .with_file(config.source_location)
        .with_line_number(config.source_location)
        .with_thread_ids(config.thread_ids);
    let registry = tracing_subscriber::registry().with(config.env_filter());

    let result = match config.format {
        LogFormat::Json => registry.with(layer.json()).try_init(),
        LogFormat::Pretty => registry.with(layer.pretty()).try_init(),
        LogFormat::Compact => registry.with(layer.compact()).try_init(),
    };
    result.is_ok()
}
