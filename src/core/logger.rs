//! Main logger implementation
//!
//! A [`Logger`] owns a threshold and an ordered list of [`Handler`]s.
//! Emission is synchronous: the record is checked against the effective
//! threshold once, then offered to this logger's handlers and, while
//! propagation is enabled, to every ancestor's handlers.
//!
//! Handlers should be attached at startup, before other threads start
//! logging through the same logger.

use super::{
    error::{LoggerError, Result},
    handler::{Disposition, Handler},
    log_context::LogContext,
    log_level::{self, LogLevel},
    log_record::{ExceptionInfo, Location, LogRecord},
    metrics::LoggerMetrics,
};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::error::Error;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Header written before the parameter block
pub const PARAMETER_BANNER: &str = "Program Arguments:";

const RULE_WIDTH: usize = 30;

pub struct Logger {
    name: String,
    /// Explicit threshold; `NOTSET` defers to the parent
    level: RwLock<LogLevel>,
    parent: Option<Arc<Logger>>,
    handlers: RwLock<Vec<Mutex<Handler>>>,
    propagate: AtomicBool,
    metrics: LoggerMetrics,
}

impl Logger {
    /// Create a standalone logger with no parent and no threshold
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_parent(name, None)
    }

    pub(crate) fn with_parent(name: impl Into<String>, parent: Option<Arc<Logger>>) -> Self {
        log_level::register_verbose();
        Self {
            name: name.into(),
            level: RwLock::new(LogLevel::NOTSET),
            parent,
            handlers: RwLock::new(Vec::new()),
            propagate: AtomicBool::new(true),
            metrics: LoggerMetrics::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&Arc<Logger>> {
        self.parent.as_ref()
    }

    pub fn set_level(&self, level: LogLevel) {
        *self.level.write() = level;
    }

    /// The explicitly set threshold (`NOTSET` if none)
    pub fn level(&self) -> LogLevel {
        *self.level.read()
    }

    /// First set threshold walking up the hierarchy, `NOTSET` if none is set
    pub fn effective_level(&self) -> LogLevel {
        let mut current = Some(self);
        while let Some(logger) = current {
            let level = logger.level();
            if level != LogLevel::NOTSET {
                return level;
            }
            current = logger.parent.as_deref();
        }
        LogLevel::NOTSET
    }

    #[inline]
    pub fn is_enabled_for(&self, level: LogLevel) -> bool {
        level >= self.effective_level()
    }

    /// Whether records are also offered to ancestor handlers
    pub fn set_propagate(&self, propagate: bool) {
        self.propagate.store(propagate, Ordering::Relaxed);
    }

    pub fn propagates(&self) -> bool {
        self.propagate.load(Ordering::Relaxed)
    }

    /// Attach a handler. Handlers are additive; attaching the same
    /// destination twice writes every record twice.
    pub fn add_handler(&self, handler: Handler) {
        self.handlers.write().push(Mutex::new(handler));
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.read().len()
    }

    /// Detach and drop every handler, flushing their sinks
    pub fn clear_handlers(&self) {
        let removed: Vec<_> = self.handlers.write().drain(..).collect();
        for handler in removed {
            if let Err(e) = handler.into_inner().flush() {
                eprintln!("[LOGGER ERROR] Failed to flush removed handler: {}", e);
            }
        }
    }

    /// Emission counters for records that originated at this logger
    ///
    /// # Example
    ///
    /// ```
    /// use verbose_logger_system::Logger;
    ///
    /// let logger = Logger::new("app");
    /// logger.info("no handlers yet").unwrap();
    ///
    /// let metrics = logger.metrics();
    /// assert_eq!(metrics.emitted(), 1);
    /// assert_eq!(metrics.written(), 0);
    /// ```
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Flush this logger's handlers (ancestors are not flushed)
    pub fn flush(&self) -> Result<()> {
        let handlers = self.handlers.read();
        let mut first_error = None;
        for handler in handlers.iter() {
            if let Err(e) = handler.lock().flush() {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Emit a pre-built record
    ///
    /// The record is dropped silently if its level is below the effective
    /// threshold. Otherwise every reachable handler is attempted; the first
    /// handler error is returned after all of them ran.
    pub fn log_record(&self, record: LogRecord) -> Result<()> {
        if !self.is_enabled_for(record.level) {
            self.metrics.record_below_threshold();
            return Ok(());
        }

        self.metrics.record_emitted();
        self.call_handlers(&record)
    }

    fn call_handlers(&self, record: &LogRecord) -> Result<()> {
        let mut first_error = None;
        let mut current = Some(self);

        while let Some(logger) = current {
            let handlers = logger.handlers.read();
            for handler in handlers.iter() {
                let mut handler = handler.lock();
                let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                    handler.handle(record)
                }))
                .unwrap_or_else(|panic_info| {
                    let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                        s.to_string()
                    } else if let Some(s) = panic_info.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "Unknown panic".to_string()
                    };
                    Err(LoggerError::writer(format!("handler panicked: {}", panic_msg)))
                });

                match outcome {
                    Ok(Disposition::Written) => {
                        self.metrics.record_written();
                    }
                    Ok(Disposition::Filtered) => {
                        self.metrics.record_filtered();
                    }
                    Ok(Disposition::BelowThreshold) => {}
                    Err(e) => {
                        self.metrics.record_write_failure();
                        eprintln!(
                            "[LOGGER ERROR] Handler '{}' on logger '{}' failed: {}",
                            handler.name(),
                            logger.name,
                            e
                        );
                        first_error.get_or_insert(e);
                    }
                }
            }

            current = if logger.propagates() {
                logger.parent.as_deref()
            } else {
                None
            };
        }

        first_error.map_or(Ok(()), Err)
    }

    fn record(&self, level: LogLevel, message: impl AsRef<str>) -> LogRecord {
        LogRecord::new(level, self.name.as_str(), message)
    }

    pub fn log(&self, level: LogLevel, message: impl AsRef<str>) -> Result<()> {
        if !self.is_enabled_for(level) {
            self.metrics.record_below_threshold();
            return Ok(());
        }
        self.log_record(self.record(level, message))
    }

    /// Log with the caller's source location; used by the logging macros
    pub fn log_at(&self, level: LogLevel, location: Location, message: impl AsRef<str>) -> Result<()> {
        if !self.is_enabled_for(level) {
            self.metrics.record_below_threshold();
            return Ok(());
        }
        self.log_record(self.record(level, message).with_location(location))
    }

    /// Log with structured context fields
    pub fn log_with_context(
        &self,
        level: LogLevel,
        message: impl AsRef<str>,
        context: LogContext,
    ) -> Result<()> {
        if !self.is_enabled_for(level) {
            self.metrics.record_below_threshold();
            return Ok(());
        }
        self.log_record(self.record(level, message).with_context(context))
    }

    #[inline]
    pub fn debug(&self, message: impl AsRef<str>) -> Result<()> {
        self.log(LogLevel::DEBUG, message)
    }

    /// Log at VERBOSE; a no-op unless VERBOSE is enabled
    #[inline]
    pub fn verbose(&self, message: impl AsRef<str>) -> Result<()> {
        self.log(LogLevel::VERBOSE, message)
    }

    #[inline]
    pub fn info(&self, message: impl AsRef<str>) -> Result<()> {
        self.log(LogLevel::INFO, message)
    }

    #[inline]
    pub fn warn(&self, message: impl AsRef<str>) -> Result<()> {
        self.log(LogLevel::WARN, message)
    }

    #[inline]
    pub fn error(&self, message: impl AsRef<str>) -> Result<()> {
        self.log(LogLevel::ERROR, message)
    }

    #[inline]
    pub fn fatal(&self, message: impl AsRef<str>) -> Result<()> {
        self.log(LogLevel::FATAL, message)
    }

    /// Log at ERROR with `err` and its source chain attached
    pub fn exception(&self, message: impl AsRef<str>, err: &dyn Error) -> Result<()> {
        if !self.is_enabled_for(LogLevel::ERROR) {
            self.metrics.record_below_threshold();
            return Ok(());
        }
        self.log_record(
            self.record(LogLevel::ERROR, message)
                .with_exception(ExceptionInfo::from_error(err)),
        )
    }

    /// Set the threshold to `level` until the returned guard is dropped
    ///
    /// The previous explicit level, including "unset", is restored on every
    /// exit path.
    ///
    /// Elevations must not overlap across threads: two guards dropped out of
    /// order leave the logger at the inner level. Record startup parameters
    /// from one thread, as with attaching handlers.
    pub fn elevate(&self, level: LogLevel) -> ThresholdGuard<'_> {
        let previous = std::mem::replace(&mut *self.level.write(), level);
        ThresholdGuard {
            logger: self,
            previous,
        }
    }

    /// Log each `key: value` pair at INFO regardless of the configured threshold
    pub fn record_inputs<I, K, V>(&self, inputs: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: fmt::Display,
        V: fmt::Display,
    {
        let lines = inputs
            .into_iter()
            .map(|(key, value)| format!("{}: {}", key, value));
        self.info_lines(lines)
    }

    /// Emit every line at INFO under an elevated threshold
    ///
    /// A failing handler does not cut the block short; the first error is
    /// returned once all lines have been offered.
    fn info_lines(&self, lines: impl IntoIterator<Item = String>) -> Result<()> {
        let _guard = self.elevate(LogLevel::INFO);
        let mut first_error = None;
        for line in lines {
            if let Err(e) = self.info(line) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Like [`record_inputs`](Self::record_inputs), framed by a banner
    ///
    /// ```text
    /// Program Arguments:
    /// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
    /// input: data.vcf
    /// min_cm: 3
    /// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
    /// ```
    ///
    /// followed by an empty line.
    pub fn record_startup_parameters<I, K, V>(&self, parameters: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: fmt::Display,
        V: fmt::Display,
    {
        let rule = "~".repeat(RULE_WIDTH);
        let pairs = parameters
            .into_iter()
            .map(|(key, value)| format!("{}: {}", key, value));

        let lines = [PARAMETER_BANNER.to_string(), rule.clone()]
            .into_iter()
            .chain(pairs)
            .chain([rule, String::new()]);
        self.info_lines(lines)
    }

    /// Record the fields of any serializable struct (e.g. parsed CLI
    /// arguments) as startup parameters
    ///
    /// Fields are written in key order. String values are written without
    /// quotes; other values as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::InvalidConfiguration`] if `arguments` does not
    /// serialize to a map.
    pub fn record_namespace<T: Serialize + ?Sized>(&self, arguments: &T) -> Result<()> {
        let value = serde_json::to_value(arguments)?;
        let serde_json::Value::Object(fields) = value else {
            return Err(LoggerError::config(
                "record_namespace",
                "arguments must serialize to a map of named fields",
            ));
        };

        let pairs = fields.into_iter().map(|(key, value)| {
            let rendered = match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            (key, rendered)
        });
        self.record_startup_parameters(pairs)
    }

    /// Adapter that attaches `context` to every record it emits
    pub fn with_context(&self, context: LogContext) -> ContextLogger<'_> {
        ContextLogger {
            logger: self,
            context,
        }
    }

    /// Create a builder for a standalone Logger
    ///
    /// # Example
    /// ```
    /// use verbose_logger_system::prelude::*;
    ///
    /// let logger = Logger::builder("app")
    ///     .level(LogLevel::VERBOSE)
    ///     .handler(Handler::new(ConsoleAppender::new(), TextFormatter::bare_message()))
    ///     .build();
    /// assert!(logger.is_enabled_for(LogLevel::VERBOSE));
    /// ```
    #[must_use]
    pub fn builder(name: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder::new(name)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.level())
            .field("parent", &self.parent.as_ref().map(|p| p.name()))
            .field("handlers", &self.handler_count())
            .field("propagate", &self.propagates())
            .finish()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush logger '{}': {}", self.name, e);
        }

        let failures = self.metrics.write_failures();
        if failures > 0 {
            eprintln!(
                "[LOGGER WARNING] Logger '{}' dropped with {} failed writes (failure rate: {:.2}%)",
                self.name,
                failures,
                self.metrics.failure_rate()
            );
        }
    }
}

/// Restores a logger's previous threshold when dropped
#[must_use = "the threshold is restored as soon as the guard is dropped"]
pub struct ThresholdGuard<'a> {
    logger: &'a Logger,
    previous: LogLevel,
}

impl ThresholdGuard<'_> {
    /// The level that will be restored
    pub fn previous(&self) -> LogLevel {
        self.previous
    }
}

impl Drop for ThresholdGuard<'_> {
    fn drop(&mut self) {
        self.logger.set_level(self.previous);
    }
}

/// A logger view that merges fixed context fields into every record
///
/// Fields passed to [`log_with_context`](Self::log_with_context) win over the
/// adapter's own fields.
pub struct ContextLogger<'a> {
    logger: &'a Logger,
    context: LogContext,
}

impl ContextLogger<'_> {
    pub fn context(&self) -> &LogContext {
        &self.context
    }

    pub fn logger(&self) -> &Logger {
        self.logger
    }

    fn emit(&self, mut record: LogRecord) -> Result<()> {
        let mut context = record.context.take().unwrap_or_default();
        context.merge_defaults(&self.context);
        self.logger.log_record(record.with_context(context))
    }

    pub fn log(&self, level: LogLevel, message: impl AsRef<str>) -> Result<()> {
        if !self.logger.is_enabled_for(level) {
            self.logger.metrics.record_below_threshold();
            return Ok(());
        }
        self.emit(self.logger.record(level, message))
    }

    pub fn log_at(&self, level: LogLevel, location: Location, message: impl AsRef<str>) -> Result<()> {
        if !self.logger.is_enabled_for(level) {
            self.logger.metrics.record_below_threshold();
            return Ok(());
        }
        self.emit(self.logger.record(level, message).with_location(location))
    }

    pub fn log_with_context(
        &self,
        level: LogLevel,
        message: impl AsRef<str>,
        context: LogContext,
    ) -> Result<()> {
        if !self.logger.is_enabled_for(level) {
            self.logger.metrics.record_below_threshold();
            return Ok(());
        }
        self.emit(self.logger.record(level, message).with_context(context))
    }

    pub fn debug(&self, message: impl AsRef<str>) -> Result<()> {
        self.log(LogLevel::DEBUG, message)
    }

    pub fn verbose(&self, message: impl AsRef<str>) -> Result<()> {
        self.log(LogLevel::VERBOSE, message)
    }

    pub fn info(&self, message: impl AsRef<str>) -> Result<()> {
        self.log(LogLevel::INFO, message)
    }

    pub fn warn(&self, message: impl AsRef<str>) -> Result<()> {
        self.log(LogLevel::WARN, message)
    }

    pub fn error(&self, message: impl AsRef<str>) -> Result<()> {
        self.log(LogLevel::ERROR, message)
    }

    pub fn fatal(&self, message: impl AsRef<str>) -> Result<()> {
        self.log(LogLevel::FATAL, message)
    }
}

/// Builder for constructing a standalone Logger with a fluent API
pub struct LoggerBuilder {
    name: String,
    level: LogLevel,
    handlers: Vec<Handler>,
    propagate: bool,
}

impl LoggerBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: LogLevel::NOTSET,
            handlers: Vec::new(),
            propagate: true,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn handler(mut self, handler: Handler) -> Self {
        self.handlers.push(handler);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn propagate(mut self, propagate: bool) -> Self {
        self.propagate = propagate;
        self
    }

    pub fn build(self) -> Logger {
        let logger = Logger::new(self.name);
        logger.set_level(self.level);
        logger.set_propagate(self.propagate);
        for handler in self.handlers {
            logger.add_handler(handler);
        }
        logger
    }
}
