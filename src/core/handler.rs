//! Handlers: one sink with its own formatter, threshold and optional filter

use super::appender::Appender;
use super::error::Result;
use super::filter::{SampleFilter, SamplerMetrics};
use super::formatter::RecordFormatter;
use super::log_level::LogLevel;
use super::log_record::LogRecord;

/// What happened to a record offered to a handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Written,
    BelowThreshold,
    Filtered,
}

pub struct Handler {
    appender: Box<dyn Appender>,
    formatter: RecordFormatter,
    level: LogLevel,
    filter: Option<Box<dyn SampleFilter>>,
    metrics: SamplerMetrics,
}

impl Handler {
    /// Wrap `appender`; the handler accepts every level until told otherwise
    pub fn new(appender: impl Appender + 'static, formatter: impl Into<RecordFormatter>) -> Self {
        Self::boxed(Box::new(appender), formatter.into())
    }

    pub fn boxed(appender: Box<dyn Appender>, formatter: RecordFormatter) -> Self {
        Self {
            appender,
            formatter,
            level: LogLevel::NOTSET,
            filter: None,
            metrics: SamplerMetrics::new(),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_filter(mut self, filter: impl SampleFilter + 'static) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn formatter(&self) -> &RecordFormatter {
        &self.formatter
    }

    pub fn name(&self) -> &str {
        self.appender.name()
    }

    pub fn has_filter(&self) -> bool {
        self.filter.is_some()
    }

    /// Keep/drop counts of this handler's filter
    pub fn metrics(&self) -> &SamplerMetrics {
        &self.metrics
    }

    /// Threshold check, then filter, then format and write
    pub fn handle(&mut self, record: &LogRecord) -> Result<Disposition> {
        if record.level < self.level {
            return Ok(Disposition::BelowThreshold);
        }

        if let Some(ref filter) = self.filter {
            if !filter.should_keep(record) {
                self.metrics.record_dropped();
                return Ok(Disposition::Filtered);
            }
            self.metrics.record_sampled();
        }

        let formatted = self.formatter.format(record);
        self.appender.append(record, &formatted)?;
        Ok(Disposition::Written)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.appender.flush()
    }
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handler")
            .field("appender", &self.appender.name())
            .field("formatter", &self.formatter)
            .field("level", &self.level)
            .field("filtered", &self.filter.is_some())
            .finish()
    }
}
