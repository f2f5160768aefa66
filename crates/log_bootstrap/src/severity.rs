use std::{fmt, str::FromStr};

use tracing::Level;
use tracing_subscriber::filter::LevelFilter;

use crate::LoggerError;

/// Severity of a log record, ordered from least to most severe.
///
/// The lowercase name of the severity is what ends up under the `level` key of every record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Very verbose diagnostics.
    Trace,

    /// Diagnostics useful during development.
    Debug,

    /// Informational messages.
    Info,

    /// Something unexpected happened, but the application can continue.
    Warning,

    /// An operation failed.
    Error,

    /// The application may not be able to continue.
    Critical,
}

impl Severity {
    /// Returns the lowercase name of the severity.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }

    /// The [`LevelFilter`] which lets through records of this severity or more severe.
    pub(crate) fn level_filter(self) -> LevelFilter {
        match self {
            Self::Trace => LevelFilter::TRACE,
            Self::Debug => LevelFilter::DEBUG,
            Self::Info => LevelFilter::INFO,
            Self::Warning => LevelFilter::WARN,
            Self::Error | Self::Critical => LevelFilter::ERROR,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Level> for Severity {
    fn from(level: Level) -> Self {
        match level {
            Level::TRACE => Self::Trace,
            Level::DEBUG => Self::Debug,
            Level::INFO => Self::Info,
            Level::WARN => Self::Warning,
            Level::ERROR => Self::Error,
        }
    }
}

impl FromStr for Severity {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            "critical" | "fatal" => Ok(Self::Critical),
            other => Err(LoggerError::Configuration(format!(
                "Unknown severity `{other}`"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severities_are_ordered() {
        assert!(Severity::Trace < Severity::Debug);
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Error < Severity::Critical);
    }

    #[test]
    fn warn_maps_to_warning() {
        assert_eq!(Severity::from(Level::WARN).as_str(), "warning");
        assert_eq!("WARN".parse::<Severity>().ok(), Some(Severity::Warning));
        assert_eq!("warning".parse::<Severity>().ok(), Some(Severity::Warning));
    }

    #[test]
    fn unknown_severity_is_rejected() {
        assert!(matches!(
            "verbose".parse::<Severity>(),
            Err(LoggerError::Configuration(_))
        ));
    }

    #[test]
    fn critical_filters_like_error() {
        assert_eq!(Severity::Critical.level_filter(), LevelFilter::ERROR);
        assert_eq!(Severity::Info.level_filter(), LevelFilter::INFO);
    }
}
