//! Named emitters handed out by the bootstrapper.

use std::sync::Arc;

use serde_json::Value;

use crate::{EventDict, JsonFormattingLayer, LoggerError, Severity, backend::SharedBackend, keys};

/// Caller-supplied context fields attached to a single event.
///
/// Usually built with the [`fields!`][crate::fields] macro. `()` converts into an empty set of
/// fields.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Fields(EventDict);

impl Fields {
    /// Creates an empty set of fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, returning the updated set.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Adds a field, replacing any previous value for the same key.
    ///
    /// Keys written as raw identifiers (`r#type`) are recorded without the `r#` prefix.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let key = match key.strip_prefix("r#") {
            Some(stripped) => stripped.to_string(),
            None => key,
        };
        self.0.insert(key, value.into());
    }

    /// Returns `true` if no fields have been added.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn into_inner(self) -> EventDict {
        self.0
    }
}

impl From<()> for Fields {
    fn from((): ()) -> Self {
        Self::default()
    }
}

impl From<EventDict> for Fields {
    fn from(event_dict: EventDict) -> Self {
        Self(event_dict)
    }
}

impl<K, V> FromIterator<(K, V)> for Fields
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Self::new();
        for (key, value) in iter {
            fields.insert(key, value);
        }
        fields
    }
}

/// Builds [`Fields`] from `key = value` pairs.
///
/// Values may be anything convertible into a [`serde_json::Value`]; integers stay integers and
/// strings stay strings.
///
/// ```
/// use log_bootstrap::fields;
///
/// let fields = fields! { user_id = 123, filename = "report.pdf" };
/// assert!(!fields.is_empty());
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::Fields::new()
    };
    ($($key:ident = $value:expr),+ $(,)?) => {
        $crate::Fields::new()$(.with(stringify!($key), $value))+
    };
}

/// A named, cheaply cloneable emitter writing to the process-wide sinks.
///
/// The name labels the handle only, it never appears in the emitted records.
#[derive(Clone, Debug)]
pub struct LoggerHandle {
    inner: Arc<HandleInner>,
}

#[derive(Debug)]
struct HandleInner {
    name: String,
    context: EventDict,
    backend: Arc<SharedBackend>,
}

impl LoggerHandle {
    pub(crate) fn new(name: String, backend: Arc<SharedBackend>) -> Self {
        Self {
            inner: Arc::new(HandleInner {
                name,
                context: EventDict::new(),
                backend,
            }),
        }
    }

    /// The name this handle was acquired with.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Returns a new handle which adds `fields` to every event it emits.
    ///
    /// Fields passed to an individual event take precedence over bound fields.
    pub fn bind(&self, fields: impl Into<Fields>) -> Self {
        let mut context = self.inner.context.clone();
        context.extend(fields.into().into_inner());

        Self {
            inner: Arc::new(HandleInner {
                name: self.inner.name.clone(),
                context,
                backend: Arc::clone(&self.inner.backend),
            }),
        }
    }

    /// Returns `true` if an event of the given severity would reach at least one sink.
    pub fn enabled(&self, severity: Severity) -> bool {
        self.inner.backend.enabled(severity)
    }

    /// Emits an event with the given severity.
    pub fn log(&self, severity: Severity, event: impl Into<String>, fields: impl Into<Fields>) {
        if !self.enabled(severity) {
            return;
        }

        let mut event_dict = self.inner.context.clone();
        event_dict.extend(fields.into().into_inner());
        event_dict.insert(keys::EVENT.to_string(), Value::from(event.into()));

        self.inner
            .backend
            .emit(&self.inner.name, severity, event_dict);
    }

    /// Emits a `trace` event.
    pub fn trace(&self, event: impl Into<String>, fields: impl Into<Fields>) {
        self.log(Severity::Trace, event, fields);
    }

    /// Emits a `debug` event.
    pub fn debug(&self, event: impl Into<String>, fields: impl Into<Fields>) {
        self.log(Severity::Debug, event, fields);
    }

    /// Emits an `info` event.
    pub fn info(&self, event: impl Into<String>, fields: impl Into<Fields>) {
        self.log(Severity::Info, event, fields);
    }

    /// Emits a `warning` event.
    pub fn warning(&self, event: impl Into<String>, fields: impl Into<Fields>) {
        self.log(Severity::Warning, event, fields);
    }

    /// Emits an `error` event.
    pub fn error(&self, event: impl Into<String>, fields: impl Into<Fields>) {
        self.log(Severity::Error, event, fields);
    }

    /// Emits a `critical` event.
    pub fn critical(&self, event: impl Into<String>, fields: impl Into<Fields>) {
        self.log(Severity::Critical, event, fields);
    }

    /// Creates a [`JsonFormattingLayer`] writing through the same sinks as this handle, for
    /// composing with a custom [`tracing_subscriber::Registry`].
    pub fn tracing_layer(&self) -> JsonFormattingLayer {
        JsonFormattingLayer::new(Arc::clone(&self.inner.backend))
    }

    /// Flushes the sinks this handle writes to.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::Flush`] with the first error reported by a sink.
    pub fn flush(&self) -> Result<(), LoggerError> {
        self.inner.backend.flush().map_err(LoggerError::Flush)
    }

    #[cfg(test)]
    pub(crate) fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
