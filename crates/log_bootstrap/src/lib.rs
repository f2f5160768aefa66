//! `log_bootstrap` sets up structured JSON logging for an application with a single call.
//!
//! It offers:
//! - A [`LogBootstrapper`] which creates the log directory and decides on a timestamped log file
//!   for the current run.
//! - [`LoggerHandle`]s, named emitters which write one JSON object per line to both the log file
//!   and the console.
//! - A [`ProcessorChain`] which adds `timestamp`, `level` and `event` to every record before it
//!   is rendered.
//! - A [`JsonFormattingLayer`] which routes [`tracing`] events (and `log` records) through the
//!   same processor chain and sinks.
//!
//! # Example
//!
//! ```no_run
//! use log_bootstrap::{LogBootstrapper, fields};
//!
//! # fn main() -> Result<(), log_bootstrap::LoggerError> {
//! let logger = LogBootstrapper::new()?.get_logger("main")?;
//!
//! logger.info("User uploaded a file", fields! { user_id = 123, filename = "report.pdf" });
//! logger.error("Failed to process PDF", fields! { error = "File not found", user_id = 123 });
//! # Ok(())
//! # }
//! ```

mod backend;
mod bootstrapper;
mod config;
mod destination;
mod formatter;
mod handle;
mod processors;
mod severity;
mod storage;
#[cfg(test)]
mod test_utils;

pub use tracing::Level;

pub use self::{
    bootstrapper::LogBootstrapper,
    config::{BootstrapConfig, ConsoleSinkConfig, ConsoleTarget, FileSinkConfig},
    destination::LogDestination,
    formatter::JsonFormattingLayer,
    handle::{Fields, LoggerHandle},
    processors::{
        AddLogLevel, AddLoggerName, EventContext, EventDict, EventRenamer, JsonRenderer,
        Processor, ProcessorChain, TimeStamper, TimestampFormat,
    },
    severity::Severity,
};

pub(crate) mod keys {
    pub(crate) const EVENT: &str = "event";
    pub(crate) const LEVEL: &str = "level";
    pub(crate) const LOGGER: &str = "logger";
    pub(crate) const TIMESTAMP: &str = "timestamp";

    /// Field name under which `tracing` records the formatted message.
    pub(crate) const MESSAGE: &str = "message";
}

/// Name of the log directory used when none is configured.
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Errors that can occur while bootstrapping the logger.
#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Represents an error in configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The current working directory could not be determined.
    #[error("Failed to determine the current working directory: {0}")]
    CurrentDirectory(#[source] std::io::Error),

    /// The log directory could not be created.
    #[error("Failed to create log directory `{}`: {source}", path.display())]
    LogDirectoryCreation {
        /// The directory that was being created.
        path: std::path::PathBuf,

        /// The underlying filesystem error.
        #[source]
        source: std::io::Error,
    },

    /// The log file could not be created.
    #[error("Failed to create log file `{}`: {source}", path.display())]
    LogFileCreation {
        /// The file that was being created.
        path: std::path::PathBuf,

        /// The underlying filesystem error.
        #[source]
        source: std::io::Error,
    },

    /// The sinks could not be flushed.
    #[error("Failed to flush log sinks: {0}")]
    Flush(#[source] std::io::Error),

    /// Represents an error during JSON serialization.
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    /// Represents an error while formatting a timestamp.
    #[error("Failed to format timestamp: {0}")]
    TimestampFormatting(#[from] time::error::Format),

    /// Represents an error during initialization of the log file appender.
    #[error("Failed to initialize log file appender: {0}")]
    FileAppenderInitialization(#[from] tracing_appender::rolling::InitError),

    /// Represents an error due to an invalid filtering directive.
    #[error("Failed to parse filtering directive: {0}")]
    InvalidFilteringDirective(#[from] tracing_subscriber::filter::ParseError),
}
