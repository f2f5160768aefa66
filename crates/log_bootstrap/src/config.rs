//! Configuration for the logging bootstrap.

use std::path::PathBuf;

use crate::{DEFAULT_LOG_DIR, Severity};

/// Comprehensive configuration for the logging bootstrap.
///
/// The [`Default`] configuration writes records of severity `info` or more severe to a log file
/// under `./logs` and mirrors them on standard output.
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    /// Directory where the log file will be created, relative to the current working directory
    /// unless absolute.
    pub log_dir: PathBuf,

    /// Minimum severity accepted by the shared back end, regardless of sink configuration.
    pub level: Severity,

    /// Configuration for file logging. If `None`, file logging is disabled.
    pub file_config: Option<FileSinkConfig>,

    /// Configuration for console logging. If `None`, console logging is disabled.
    pub console_config: Option<ConsoleSinkConfig>,

    /// If `true`, events emitted through the [`tracing`] macros (and `log` records) are rendered
    /// through the same processor chain and sinks as [`LoggerHandle`][crate::LoggerHandle]
    /// events.
    pub capture_tracing_events: bool,

    /// An [`EnvFilter`][tracing_subscriber::EnvFilter] directive (e.g., `"info,my_crate=debug"`)
    /// applied to captured [`tracing`] events. If `None`, only [`Self::level`] applies.
    pub filtering_directive: Option<String>,
}

impl BootstrapConfig {
    /// Creates the default configuration with a custom log directory.
    pub fn with_log_dir(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
            ..Self::default()
        }
    }
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            level: Severity::Info,
            file_config: Some(FileSinkConfig::default()),
            console_config: Some(ConsoleSinkConfig::default()),
            capture_tracing_events: true,
            filtering_directive: None,
        }
    }
}

/// Configuration for file logging.
#[derive(Debug, Clone, Copy)]
pub struct FileSinkConfig {
    /// Minimum severity for file logs.
    pub level: Severity,
}

impl Default for FileSinkConfig {
    fn default() -> Self {
        Self {
            level: Severity::Info,
        }
    }
}

/// Configuration for console logging.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleSinkConfig {
    /// Minimum severity for console logs.
    pub level: Severity,

    /// Stream the console logs are written to.
    pub target: ConsoleTarget,
}

impl Default for ConsoleSinkConfig {
    fn default() -> Self {
        Self {
            level: Severity::Info,
            target: ConsoleTarget::Stdout,
        }
    }
}

/// Stream used by the console sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleTarget {
    /// Standard output.
    Stdout,

    /// Standard error.
    Stderr,
}
