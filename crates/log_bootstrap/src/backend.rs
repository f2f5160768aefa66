//! The shared sinks every [`LoggerHandle`] writes through, and their process-wide installation.

use std::{
    fmt,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex, OnceLock, PoisonError, RwLock},
};

use rustc_hash::FxHashMap;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{MakeWriter, writer::BoxMakeWriter},
    layer::SubscriberExt,
};

use crate::{
    BootstrapConfig, ConsoleTarget, EventContext, EventDict, JsonFormattingLayer, LogDestination,
    LoggerError, LoggerHandle, ProcessorChain, Severity,
};

static GLOBAL_REGISTRY: OnceLock<LoggerRegistry> = OnceLock::new();

/// Serializes installation so that the sinks are only ever built once.
static INSTALL_LOCK: Mutex<()> = Mutex::new(());

/// A destination for rendered records, with its own minimum severity.
pub(crate) struct Sink {
    level: Severity,
    writer: BoxMakeWriter,
}

impl Sink {
    pub(crate) fn new<W>(level: Severity, writer: W) -> Self
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        Self {
            level,
            writer: BoxMakeWriter::new(writer),
        }
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink")
            .field("level", &self.level)
            .finish_non_exhaustive()
    }
}

/// The processor chain and sinks shared by all handles.
#[derive(Debug)]
pub(crate) struct SharedBackend {
    chain: ProcessorChain,
    level: Severity,
    sinks: Vec<Sink>,

    /// The file the file sink appends to, if one is configured.
    log_file_path: Option<PathBuf>,
}

impl SharedBackend {
    pub(crate) fn new(chain: ProcessorChain, level: Severity, sinks: Vec<Sink>) -> Self {
        Self {
            chain,
            level,
            sinks,
            log_file_path: None,
        }
    }

    /// Opens the file sink at `destination` and the console sink, as enabled by `config`.
    pub(crate) fn build(
        destination: &LogDestination,
        config: &BootstrapConfig,
    ) -> Result<Self, LoggerError> {
        let mut sinks = Vec::new();
        let mut log_file_path = None;

        if let Some(file_config) = config.file_config {
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::NEVER)
                .filename_prefix(destination.file_name())
                .build(destination.logs_dir())?;
            sinks.push(Sink::new(file_config.level, file_appender));
            log_file_path = Some(destination.file_path().to_path_buf());
        }

        if let Some(console_config) = config.console_config {
            let sink = match console_config.target {
                ConsoleTarget::Stdout => Sink::new(console_config.level, io::stdout),
                ConsoleTarget::Stderr => Sink::new(console_config.level, io::stderr),
            };
            sinks.push(sink);
        }

        Ok(Self {
            log_file_path,
            ..Self::new(ProcessorChain::default(), config.level, sinks)
        })
    }

    pub(crate) fn log_file_path(&self) -> Option<&Path> {
        self.log_file_path.as_deref()
    }

    pub(crate) fn enabled(&self, severity: Severity) -> bool {
        severity >= self.level && self.sinks.iter().any(|sink| severity >= sink.level)
    }

    /// Runs the processor chain over `event_dict` and writes the resulting line to every sink
    /// accepting `severity`.
    ///
    /// Each sink receives the line through a single `write_all` call, to avoid interleaving
    /// with writes from other threads. A failing sink does not prevent writes to the others.
    pub(crate) fn emit(&self, logger_name: &str, severity: Severity, event_dict: EventDict) {
        if !self.enabled(severity) {
            return;
        }

        let context = EventContext {
            logger_name,
            severity,
        };
        let Ok(line) = self.chain.run(&context, event_dict) else {
            return;
        };

        for sink in self.sinks.iter().filter(|sink| severity >= sink.level) {
            let _ = sink.writer.make_writer().write_all(&line);
        }
    }

    pub(crate) fn flush(&self) -> io::Result<()> {
        for sink in &self.sinks {
            sink.writer.make_writer().flush()?;
        }
        Ok(())
    }
}

/// Caches handles by name so repeated acquisitions return the same handle.
#[derive(Debug)]
pub(crate) struct LoggerRegistry {
    backend: Arc<SharedBackend>,
    loggers: RwLock<FxHashMap<String, LoggerHandle>>,
}

impl LoggerRegistry {
    pub(crate) fn new(backend: Arc<SharedBackend>) -> Self {
        Self {
            backend,
            loggers: RwLock::new(FxHashMap::default()),
        }
    }

    pub(crate) fn logger(&self, name: &str) -> LoggerHandle {
        if let Some(handle) = self
            .loggers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
        {
            return handle.clone();
        }

        self.loggers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(name.to_owned())
            .or_insert_with(|| LoggerHandle::new(name.to_owned(), Arc::clone(&self.backend)))
            .clone()
    }

    pub(crate) fn backend(&self) -> &SharedBackend {
        &self.backend
    }
}

/// Returns the process-wide registry, building the sinks for `destination` on the first call.
///
/// Later calls return the already installed registry, whatever their arguments.
pub(crate) fn install_global(
    destination: &LogDestination,
    config: &BootstrapConfig,
) -> Result<&'static LoggerRegistry, LoggerError> {
    if let Some(registry) = GLOBAL_REGISTRY.get() {
        return Ok(registry);
    }

    let _guard = INSTALL_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(registry) = GLOBAL_REGISTRY.get() {
        return Ok(registry);
    }

    let filter = if config.capture_tracing_events {
        let directive = config
            .filtering_directive
            .as_deref()
            .unwrap_or_default(); // Using an empty string causes it to use the default directive
        Some(
            EnvFilter::builder()
                .with_default_directive(config.level.level_filter().into())
                .parse(directive)?,
        )
    } else {
        None
    };

    let backend = Arc::new(SharedBackend::build(destination, config)?);

    if let Some(filter) = filter {
        let layer = JsonFormattingLayer::new(Arc::clone(&backend)).with_filter(filter);
        let subscriber = tracing_subscriber::registry().with(layer);

        // Installed separately, so that an existing `log` logger does not keep `tracing` events
        // out (and vice versa). Handles write to the sinks directly either way.
        let _ = tracing_log::LogTracer::init();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    Ok(GLOBAL_REGISTRY.get_or_init(|| LoggerRegistry::new(backend)))
}

/// The process-wide registry, if installed.
pub(crate) fn global() -> Option<&'static LoggerRegistry> {
    GLOBAL_REGISTRY.get()
}
