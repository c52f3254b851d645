//! Console appender implementation

use crate::core::{Appender, LogRecord, Result};
#[cfg(feature = "console")]
use colored::Colorize;
use std::io::Write;

/// Stream a [`ConsoleAppender`] writes to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConsoleTarget {
    #[default]
    Stderr,
    Stdout,
}

/// Writes one line per record to stderr (default) or stdout
pub struct ConsoleAppender {
    target: ConsoleTarget,
    use_colors: bool,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self {
            target: ConsoleTarget::Stderr,
            use_colors: false,
        }
    }

    pub fn stdout() -> Self {
        Self {
            target: ConsoleTarget::Stdout,
            use_colors: false,
        }
    }

    /// Colour each line by its record's level
    #[cfg(feature = "console")]
    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    pub fn target(&self) -> ConsoleTarget {
        self.target
    }

    #[cfg(feature = "console")]
    fn paint(&self, record: &LogRecord, formatted: &str) -> String {
        if self.use_colors {
            formatted.color(record.level.color_code()).to_string()
        } else {
            formatted.to_string()
        }
    }

    #[cfg(not(feature = "console"))]
    fn paint(&self, _record: &LogRecord, formatted: &str) -> String {
        formatted.to_string()
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, record: &LogRecord, formatted: &str) -> Result<()> {
        let line = self.paint(record, formatted);
        match self.target {
            ConsoleTarget::Stderr => writeln!(std::io::stderr().lock(), "{}", line)?,
            ConsoleTarget::Stdout => writeln!(std::io::stdout().lock(), "{}", line)?,
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        match self.target {
            ConsoleTarget::Stderr => std::io::stderr().flush()?,
            ConsoleTarget::Stdout => std::io::stdout().flush()?,
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;

    #[test]
    fn test_console_defaults_to_stderr() {
        assert_eq!(ConsoleAppender::new().target(), ConsoleTarget::Stderr);
        assert_eq!(ConsoleAppender::stdout().target(), ConsoleTarget::Stdout);
    }

    #[test]
    fn test_console_append() {
        let mut appender = ConsoleAppender::new();
        let record = LogRecord::new(LogLevel::INFO, "main", "hello");
        assert!(appender.append(&record, "hello").is_ok());
        assert!(appender.flush().is_ok());
    }
}
