//! Routing `tracing` events to the server log.
//!
//! The server hands plugins a printf-style logging function. Events are
//! formatted by `tracing_subscriber::fmt` into a buffer and each finished
//! line is passed on to a [`LogSink`] with a `[pawn-ini]` prefix.

use std::io;
use std::sync::Arc;

use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

use crate::config::DEFAULT_LOG_FILTER;

pub const PREFIX: &str = "[pawn-ini]";

/// Destination for finished log lines.
pub trait LogSink: Send + Sync {
    fn log(&self, line: &str);
}

/// `MakeWriter` that hands one buffer to each event.
#[derive(Clone)]
pub struct HostWriter {
    sink: Arc<dyn LogSink>,
}

impl HostWriter {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }
}

impl<'a> MakeWriter<'a> for HostWriter {
    type Writer = HostLine;

    fn make_writer(&'a self) -> Self::Writer {
        HostLine {
            sink: Arc::clone(&self.sink),
            buf: Vec::new(),
        }
    }
}

/// Buffer for a single event, flushed to the sink when dropped.
pub struct HostLine {
    sink: Arc<dyn LogSink>,
    buf: Vec<u8>,
}

impl io::Write for HostLine {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for HostLine {
    fn drop(&mut self) {
        let text = String::from_utf8_lossy(&self.buf);
        for line in text.lines().filter(|line| !line.trim().is_empty()) {
            self.sink.log(&format!("{PREFIX} {line}"));
        }
    }
}

/// Parse `filter`, falling back to the default directive when it is invalid.
pub fn env_filter(filter: &str) -> EnvFilter {
    EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Build a subscriber writing plain, untimed lines to `sink`.
///
/// The server log adds its own timestamps.
pub fn subscriber(sink: Arc<dyn LogSink>, filter: &str) -> impl Subscriber + Send + Sync {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(filter))
        .with_writer(HostWriter::new(sink))
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .finish()
}

/// Install the subscriber process-wide.
///
/// Returns `false` when a global subscriber is already set, which happens
/// when the server loads the plugin a second time.
pub fn install(sink: Arc<dyn LogSink>, filter: &str) -> bool {
    tracing::subscriber::set_global_default(subscriber(sink, filter)).is_ok()
}
