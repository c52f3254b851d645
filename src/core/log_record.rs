//! Log record structure
//!
//! A [`LogRecord`] is an immutable snapshot of one emission call. It is built
//! once by the logger and then only read by filters, formatters and sinks.

use super::log_context::LogContext;
use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::error::Error;
use std::fmt;

// Thread-local caches for thread information to avoid repeated allocations
thread_local! {
    static THREAD_ID_CACHE: RefCell<Option<String>> = const { RefCell::new(None) };
    static THREAD_NAME_CACHE: RefCell<Option<Option<String>>> = const { RefCell::new(None) };
}

/// Get cached thread ID, computing and caching it on first access
fn get_thread_id() -> String {
    THREAD_ID_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| format!("{:?}", std::thread::current().id()))
            .clone()
    })
}

/// Get cached thread name, computing and caching it on first access
fn get_thread_name() -> Option<String> {
    THREAD_NAME_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| std::thread::current().name().map(String::from))
            .clone()
    })
}

/// Source location of an emission call, captured by the logging macros
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub file: &'static str,
    pub line: u32,
    pub module: &'static str,
    pub function: &'static str,
}

impl Location {
    pub const fn new(
        file: &'static str,
        line: u32,
        module: &'static str,
        function: &'static str,
    ) -> Self {
        Self {
            file,
            line,
            module,
            function,
        }
    }
}

/// Rendered error information attached to a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionInfo {
    pub message: String,
    /// Messages of the `source()` chain, outermost first
    pub causes: Vec<String>,
}

impl ExceptionInfo {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            causes: Vec::new(),
        }
    }

    /// Capture an error and its whole source chain
    pub fn from_error(err: &dyn Error) -> Self {
        let mut causes = Vec::new();
        let mut current = err.source();
        while let Some(cause) = current {
            causes.push(cause.to_string());
            current = cause.source();
        }

        Self {
            message: err.to_string(),
            causes,
        }
    }

    /// Render as a multi-line report
    pub fn render(&self) -> String {
        let mut out = format!("Error: {}", self.message);
        if !self.causes.is_empty() {
            out.push_str("\n\nCaused by:");
            for (idx, cause) in self.causes.iter().enumerate() {
                out.push_str(&format!("\n    {}: {}", idx, cause));
            }
        }
        out
    }
}

impl fmt::Display for ExceptionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[derive(Debug, Clone)]
pub struct LogRecord {
    pub level: LogLevel,
    pub logger_name: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub location: Option<Location>,
    pub thread_id: String,
    pub thread_name: Option<String>,
    pub exception: Option<ExceptionInfo>,
    pub context: Option<LogContext>,
}

impl LogRecord {
    /// The message is stored verbatim
    pub fn new(level: LogLevel, logger_name: impl Into<String>, message: impl AsRef<str>) -> Self {
        Self {
            level,
            logger_name: logger_name.into(),
            message: message.as_ref().to_string(),
            timestamp: Utc::now(),
            location: None,
            thread_id: get_thread_id(),
            thread_name: get_thread_name(),
            exception: None,
            context: None,
        }
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_context(mut self, context: LogContext) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_exception(mut self, exception: ExceptionInfo) -> Self {
        self.exception = Some(exception);
        self
    }

    pub fn with_error(self, err: &dyn Error) -> Self {
        self.with_exception(ExceptionInfo::from_error(err))
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn file(&self) -> &str {
        self.location.map_or("", |l| l.file)
    }

    pub fn line(&self) -> u32 {
        self.location.map_or(0, |l| l.line)
    }

    pub fn function(&self) -> &str {
        self.location.map_or("", |l| l.function)
    }

    pub fn module(&self) -> &str {
        self.location.map_or("", |l| l.module)
    }

    pub fn thread(&self) -> &str {
        self.thread_name.as_deref().unwrap_or(&self.thread_id)
    }
}
