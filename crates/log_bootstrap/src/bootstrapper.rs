use std::{
    fs::OpenOptions,
    panic::Location,
    path::{Path, PathBuf},
};

use crate::{
    BootstrapConfig, LogDestination, LoggerError, LoggerHandle,
    backend::{self, LoggerRegistry},
};

/// Creates the log directory and file for the current run, and hands out [`LoggerHandle`]s
/// writing to it.
///
/// The sinks are installed once per process, by the first [`LogBootstrapper::get_logger`] call.
/// Handles acquired later, from any bootstrapper, share those sinks: a later bootstrapper still
/// creates its own log file, but events are appended to the file returned by
/// [`LogBootstrapper::installed_log_file_path`].
///
/// # Example
///
/// ```no_run
/// use log_bootstrap::{LogBootstrapper, fields};
///
/// # fn main() -> Result<(), log_bootstrap::LoggerError> {
/// let bootstrapper = LogBootstrapper::with_log_dir("logs")?;
/// let logger = bootstrapper.get_logger("main")?;
///
/// logger.info("customer logger initialized", ());
/// logger.error("Failed to process PDF", fields! { error = "File not found", user_id = 123 });
///
/// bootstrapper.flush()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct LogBootstrapper {
    destination: LogDestination,
    config: BootstrapConfig,
}

impl LogBootstrapper {
    /// Creates a bootstrapper logging to the `logs` directory of the current working directory.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError`] if the log directory cannot be created.
    pub fn new() -> Result<Self, LoggerError> {
        Self::from_config(BootstrapConfig::default())
    }

    /// Creates a bootstrapper logging to `log_dir`, resolved against the current working
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError`] if the log directory cannot be created.
    pub fn with_log_dir(log_dir: impl Into<PathBuf>) -> Result<Self, LoggerError> {
        Self::from_config(BootstrapConfig::with_log_dir(log_dir))
    }

    /// Creates a bootstrapper from a full [`BootstrapConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError`] if the log directory cannot be created.
    pub fn from_config(config: BootstrapConfig) -> Result<Self, LoggerError> {
        let destination = LogDestination::create(&config.log_dir)?;

        Ok(Self {
            destination,
            config,
        })
    }

    /// The resolved log file location.
    pub fn destination(&self) -> &LogDestination {
        &self.destination
    }

    /// The full path of the log file for this bootstrapper.
    ///
    /// The file is created by [`LogBootstrapper::get_logger`]. Events only go to it if this
    /// bootstrapper installed the sinks, see [`LogBootstrapper::installed_log_file_path`].
    pub fn log_file_path(&self) -> &Path {
        self.destination.file_path()
    }

    /// The log file the installed file sink appends to.
    ///
    /// Returns `None` before the first handle is acquired, or if the installed configuration has
    /// no file sink.
    pub fn installed_log_file_path() -> Option<&'static Path> {
        backend::global().and_then(|registry| registry.backend().log_file_path())
    }

    /// The directory holding the log file.
    pub fn logs_dir(&self) -> &Path {
        self.destination.logs_dir()
    }

    /// The configuration this bootstrapper was created with.
    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// Returns the handle named after the file name component of `name`.
    ///
    /// Creates this bootstrapper's log file if the file sink is enabled. On the first call in the
    /// process, this also installs the file and console sinks and (if enabled) the [`tracing`]
    /// subscriber. Repeated calls with the same name return the same handle.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError`] if the log file, the sinks or the filtering directive cannot be set
    /// up.
    pub fn get_logger(&self, name: &str) -> Result<LoggerHandle, LoggerError> {
        self.create_log_file()?;
        let registry = self.registry()?;
        Ok(registry.logger(logger_name(name)))
    }

    /// Returns the handle named after the source file of the caller.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError`] if the sinks or the filtering directive cannot be set up.
    #[track_caller]
    pub fn logger(&self) -> Result<LoggerHandle, LoggerError> {
        let caller = Location::caller().file();
        self.get_logger(caller)
    }

    /// Flushes the installed sinks. Does nothing if no handle has been acquired yet.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::Flush`] with the first error reported by a sink.
    pub fn flush(&self) -> Result<(), LoggerError> {
        match backend::global() {
            Some(registry) => registry.backend().flush().map_err(LoggerError::Flush),
            None => Ok(()),
        }
    }

    fn create_log_file(&self) -> Result<(), LoggerError> {
        if self.config.file_config.is_none() {
            return Ok(());
        }

        let path = self.log_file_path();
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map(drop)
            .map_err(|source| LoggerError::LogFileCreation {
                path: path.to_path_buf(),
                source,
            })
    }

    fn registry(&self) -> Result<&'static LoggerRegistry, LoggerError> {
        backend::install_global(&self.destination, &self.config)
    }
}

/// The file name component of `name`, or `name` itself if it has none.
fn logger_name(name: &str) -> &str {
    Path::new(name)
        .file_name()
        .and_then(|file_name| file_name.to_str())
        .unwrap_or(name)
}
