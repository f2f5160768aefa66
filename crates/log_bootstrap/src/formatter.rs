//! Provides a [`tracing_subscriber::Layer`] ([`JsonFormattingLayer`]) rendering [`tracing`]
//! events through the shared processor chain and sinks.

use std::sync::Arc;

use serde_json::Value;
use tracing::{Event, Subscriber};
use tracing_subscriber::{Layer, layer::Context};

use crate::{Severity, backend::SharedBackend, keys, storage::FieldStorage};

/// A [`tracing_subscriber::Layer`] that turns tracing events into JSON records.
///
/// Event fields become top-level keys of the record, and the event message becomes `event`
/// (falling back to the event target when there is no message). The records are written through
/// the same sinks as [`LoggerHandle`][crate::LoggerHandle] events, so both kinds of records
/// interleave in the same log file.
///
/// Obtain one with [`LoggerHandle::tracing_layer`][crate::LoggerHandle::tracing_layer].
#[derive(Debug, Clone)]
pub struct JsonFormattingLayer {
    backend: Arc<SharedBackend>,
}

impl JsonFormattingLayer {
    pub(crate) fn new(backend: Arc<SharedBackend>) -> Self {
        Self { backend }
    }
}

impl<S> Layer<S> for JsonFormattingLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let severity = Severity::from(*metadata.level());
        if !self.backend.enabled(severity) {
            return;
        }

        let mut storage = FieldStorage::default();
        event.record(&mut storage);

        let (message, mut event_dict) = storage.into_parts();
        let message = message.unwrap_or_else(|| metadata.target().to_string());
        event_dict.insert(keys::EVENT.to_string(), Value::from(message));

        self.backend.emit(metadata.target(), severity, event_dict);
    }
}
