//! Progress sinks for connection and migration messages.
//!
//! A [`LogSink`] receives plain, human-readable lines when the database file
//! is opened and while migrations run. Query operations never write to it.

use log::{info, warn};

/// Prefix used for statement failures, so sinks can tell them apart.
pub const ERROR_PREFIX: &str = "[DB ERROR]";

/// Receiver for progress and error messages.
pub trait LogSink: Send + Sync {
    fn log(&self, message: &str);
}

impl<F> LogSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn log(&self, message: &str) {
        self(message)
    }
}

/// Writes every message to standard output. The default sink.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn log(&self, message: &str) {
        println!("{message}");
    }
}

/// Forwards messages to the `log` facade.
///
/// Statement failures are logged at `warn`, everything else at `info`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogCrateSink;

impl LogSink for LogCrateSink {
    fn log(&self, message: &str) {
        if message.starts_with(ERROR_PREFIX) {
            warn!("{message}");
        } else {
            info!("{message}");
        }
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl LogSink for NullSink {
    fn log(&self, _message: &str) {}
}
