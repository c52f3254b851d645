//! Appender trait for log output destinations

use super::{error::Result, log_record::LogRecord};

/// A sink receiving already-formatted records
///
/// `formatted` is the handler's rendering of `record`, without a trailing
/// newline. Each appender is owned by exactly one handler.
pub trait Appender: Send {
    fn append(&mut self, record: &LogRecord, formatted: &str) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
