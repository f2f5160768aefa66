//! The processor chain applied to every event before it is written to the sinks.
//!
//! Each [`Processor`] receives the mutable [`EventDict`] of a single event, in order, and the
//! [`JsonRenderer`] at the end of the chain turns the final dictionary into one line of JSON.

use std::{
    fmt,
    time::{SystemTime, UNIX_EPOCH},
};

use serde::ser::{SerializeMap, Serializer};
use serde_json::Value;
use time::{
    UtcDateTime, format_description::BorrowedFormatItem, macros::format_description,
};

use crate::{LoggerError, Severity, keys};

/// The ordered key-value fields of a single log event.
pub type EventDict = serde_json::Map<String, Value>;

/// `2024-01-15T10:30:00.000000Z`
const ISO_TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]Z"
);

/// Information about the event being processed which is not part of its fields.
#[derive(Debug, Clone, Copy)]
pub struct EventContext<'a> {
    /// Name of the logger emitting the event.
    pub logger_name: &'a str,

    /// Severity of the event.
    pub severity: Severity,
}

/// A single step of the [`ProcessorChain`].
pub trait Processor: fmt::Debug + Send + Sync {
    /// Transforms the fields of an event in place.
    fn process(&self, context: &EventContext<'_>, event_dict: &mut EventDict);
}

/// Format of the timestamps added by [`TimeStamper`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampFormat {
    /// ISO-8601 in UTC with microsecond precision, e.g. `2024-01-15T10:30:00.000000Z`.
    Iso,

    /// Seconds since the UNIX epoch as a floating point number.
    Unix,
}

/// Adds the current time under a configurable key.
#[derive(Debug, Clone)]
pub struct TimeStamper {
    key: String,
    format: TimestampFormat,
}

impl TimeStamper {
    /// Creates a [`TimeStamper`] writing timestamps of the given format under `key`.
    pub fn new(key: impl Into<String>, format: TimestampFormat) -> Self {
        Self {
            key: key.into(),
            format,
        }
    }

    fn now(&self) -> Option<Value> {
        match self.format {
            TimestampFormat::Iso => UtcDateTime::now()
                .format(ISO_TIMESTAMP_FORMAT)
                .ok()
                .map(Value::from),
            TimestampFormat::Unix => SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .ok()
                .map(|elapsed| Value::from(elapsed.as_secs_f64())),
        }
    }
}

impl Default for TimeStamper {
    fn default() -> Self {
        Self::new(keys::TIMESTAMP, TimestampFormat::Iso)
    }
}

impl Processor for TimeStamper {
    fn process(&self, _context: &EventContext<'_>, event_dict: &mut EventDict) {
        if let Some(timestamp) = self.now() {
            event_dict.insert(self.key.clone(), timestamp);
        }
    }
}

/// Adds the lowercase severity name under the `level` key.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddLogLevel;

impl Processor for AddLogLevel {
    fn process(&self, context: &EventContext<'_>, event_dict: &mut EventDict) {
        event_dict.insert(
            keys::LEVEL.to_string(),
            Value::from(context.severity.as_str()),
        );
    }
}

/// Adds the name of the emitting logger under the `logger` key.
///
/// Not part of the default chain, records carry no logger name unless a chain includes it.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddLoggerName;

impl Processor for AddLoggerName {
    fn process(&self, context: &EventContext<'_>, event_dict: &mut EventDict) {
        event_dict.insert(keys::LOGGER.to_string(), Value::from(context.logger_name));
    }
}

/// Moves the event message to the `to` key, placing it after every other field.
///
/// If `replace_by` is set and present in the event, its value becomes the new `event`.
#[derive(Debug, Clone)]
pub struct EventRenamer {
    to: String,
    replace_by: Option<String>,
}

impl EventRenamer {
    /// Creates an [`EventRenamer`] moving the message to `to`.
    pub fn new(to: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            replace_by: None,
        }
    }

    /// Uses the value of `key` (if present) as the new `event`.
    pub fn replace_by(mut self, key: impl Into<String>) -> Self {
        self.replace_by = Some(key.into());
        self
    }
}

impl Default for EventRenamer {
    fn default() -> Self {
        Self::new(keys::EVENT)
    }
}

impl Processor for EventRenamer {
    fn process(&self, _context: &EventContext<'_>, event_dict: &mut EventDict) {
        if let Some(event) = event_dict.shift_remove(keys::EVENT) {
            event_dict.insert(self.to.clone(), event);
        }

        if let Some(replace_by) = &self.replace_by {
            if let Some(replacement) = event_dict.shift_remove(replace_by) {
                event_dict.insert(keys::EVENT.to_string(), replacement);
            }
        }
    }
}

/// Renders an [`EventDict`] as compact, single-line JSON terminated by a newline.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl JsonRenderer {
    /// Renders the event into a buffer ready to be written with a single `write_all` call.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::JsonSerialization`] if a value cannot be serialized.
    pub fn render(self, event_dict: &EventDict) -> Result<Vec<u8>, LoggerError> {
        let mut buffer = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(
            &mut buffer,
            serde_json::ser::CompactFormatter,
        );
        let mut map_serializer = serializer.serialize_map(Some(event_dict.len()))?;
        for (key, value) in event_dict {
            map_serializer.serialize_entry(key, value)?;
        }
        map_serializer.end()?;

        buffer.push(b'\n');
        Ok(buffer)
    }
}

/// An ordered list of [`Processor`]s followed by a [`JsonRenderer`].
#[derive(Debug)]
pub struct ProcessorChain {
    processors: Vec<Box<dyn Processor>>,
    renderer: JsonRenderer,
}

impl ProcessorChain {
    /// Creates a chain running `processors` in order before rendering.
    pub fn new(processors: Vec<Box<dyn Processor>>) -> Self {
        Self {
            processors,
            renderer: JsonRenderer,
        }
    }

    /// Runs every processor over `event_dict` and renders the result.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::JsonSerialization`] if rendering fails.
    pub fn run(
        &self,
        context: &EventContext<'_>,
        mut event_dict: EventDict,
    ) -> Result<Vec<u8>, LoggerError> {
        for processor in &self.processors {
            processor.process(context, &mut event_dict);
        }

        self.renderer.render(&event_dict)
    }
}

impl Default for ProcessorChain {
    /// `timestamp` (ISO-8601, UTC), then `level`, then `event`.
    fn default() -> Self {
        Self::new(vec![
            Box::new(TimeStamper::default()),
            Box::new(AddLogLevel),
            Box::new(EventRenamer::default()),
        ])
    }
}
