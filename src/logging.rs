/// Structured logging for hydrologic tools
///
/// Library code emits `tracing` events with unit codes as fields. This
/// module installs the subscriber that renders them: console output with
/// optional timestamps, plus an optional append-mode log file for batch
/// runs. `RUST_LOG` overrides the configured level when set.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::Deserialize;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt as fmt_layer, EnvFilter};

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    #[serde(alias = "warn")]
    Warning,
    Error,
}

impl LogLevel {
    /// Directive understood by `EnvFilter`.
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Minimum log level to display
    pub level: LogLevel,
    /// Optional file path for logging
    pub log_file: Option<PathBuf>,
    /// Whether to include timestamps in console output
    pub console_timestamps: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            log_file: None,
            console_timestamps: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("a global logger is already installed")]
    AlreadyInitialized,
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logger(settings: &LogSettings) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.level.as_directive()));

    let file = match &settings.log_file {
        Some(path) => Some(open_log_file(path)?),
        None => None,
    };

    let console_timed = settings
        .console_timestamps
        .then(|| fmt_layer::layer().with_writer(std::io::stderr));
    let console_plain = (!settings.console_timestamps)
        .then(|| fmt_layer::layer().without_time().with_writer(std::io::stderr));
    let file_layer = file.map(|f| {
        fmt_layer::layer()
            .with_ansi(false)
            .with_writer(Mutex::new(f))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_timed)
        .with(console_plain)
        .with(file_layer)
        .try_init()
        .map_err(|_| LoggingError::AlreadyInitialized)
}

fn open_log_file(path: &Path) -> Result<File, LoggingError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LoggingError::LogFile {
            path: path.to_path_buf(),
            source,
        })
}

// ---------------------------------------------------------------------------
// Summary Logging
// ---------------------------------------------------------------------------

/// Log the size and depth of a finished upstream trace.
///
/// `levels` is the output of `trace_upstream_levels`; depth is the number of
/// levels above the outlet.
pub fn log_trace_summary(outlet: &str, levels: &[Vec<String>]) {
    let units: usize = levels.iter().map(Vec::len).sum();
    let depth = levels.len().saturating_sub(1);
    info!(outlet, units, depth, "upstream trace complete");
}
