//! Provides a [`tracing::field::Visit`] implementation ([`FieldStorage`]) capturing the fields of
//! a [`tracing`] event as JSON values.

use std::fmt;

use serde_json::Value;
use tracing::field::{Field, Visit};

use crate::{EventDict, keys};

/// Holds the key-value data recorded for an event.
#[derive(Clone, Debug, Default)]
pub(crate) struct FieldStorage {
    /// The collected key-value pairs, in the order they were recorded.
    fields: EventDict,

    /// The primary message of the event, if captured.
    message: Option<String>,
}

impl FieldStorage {
    /// Records a key-value pair, skipping the `log.*` bookkeeping fields added by `tracing-log`.
    ///
    /// Keys written as raw identifiers (`r#type`) are recorded without the `r#` prefix.
    fn record_value(&mut self, key: &str, value: Value) {
        if key.starts_with("log.") {
            return;
        }

        let key = key.strip_prefix("r#").unwrap_or(key);
        self.fields.insert(key.to_string(), value);
    }

    fn record_message(&mut self, message: String) {
        if self.message.is_none() {
            self.message = Some(message);
        }
    }

    /// Splits the storage into the message (if any) and the remaining fields.
    pub(crate) fn into_parts(self) -> (Option<String>, EventDict) {
        (self.message, self.fields)
    }
}

impl Visit for FieldStorage {
    fn record_f64(&mut self, field: &Field, value: f64) {
        if field.name() == keys::MESSAGE {
            self.record_message(value.to_string());
        } else {
            self.record_value(field.name(), Value::from(value));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        if field.name() == keys::MESSAGE {
            self.record_message(value.to_string());
        } else {
            self.record_value(field.name(), Value::from(value));
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        if field.name() == keys::MESSAGE {
            self.record_message(value.to_string());
        } else {
            self.record_value(field.name(), Value::from(value));
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == keys::MESSAGE {
            self.record_message(value.to_string());
        } else {
            self.record_value(field.name(), Value::from(value));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == keys::MESSAGE {
            self.message = Some(value.to_string()); // `record_str()` is preferred for `message`
        } else {
            self.record_value(field.name(), Value::from(value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == keys::MESSAGE {
            self.record_message(format!("{value:?}"));
        } else {
            self.record_value(field.name(), Value::from(format!("{value:?}")));
        }
    }
}
