#![allow(clippy::unwrap_used)]

use std::{
    io,
    sync::{Arc, Mutex},
};

use tracing_subscriber::fmt::MakeWriter;

use crate::{
    EventDict, ProcessorChain, Severity,
    backend::{SharedBackend, Sink},
};

/// An in-memory sink collecting everything written to it.
#[derive(Clone, Debug, Default)]
pub(crate) struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

impl CaptureWriter {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }

    pub(crate) fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_owned).collect()
    }

    pub(crate) fn records(&self) -> Vec<EventDict> {
        self.lines()
            .iter()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }
}

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CaptureWriter {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// A back end with the default processor chain writing to a single capture sink.
pub(crate) fn capture_backend(capture: &CaptureWriter, level: Severity) -> Arc<SharedBackend> {
    Arc::new(SharedBackend::new(
        ProcessorChain::default(),
        level,
        vec![Sink::new(level, capture.clone())],
    ))
}
