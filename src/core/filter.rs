//! Record filters applied per handler
//!
//! A handler may carry one [`SampleFilter`]. The built-in
//! [`RandomPropFilter`] keeps a random proportion of records, optionally only
//! sampling records at or below a severity ceiling so that rare, severe
//! events are never dropped.
//!
//! # Example
//!
//! ```
//! use verbose_logger_system::{LogLevel, RandomPropFilter};
//!
//! // Keep ~10% of DEBUG and VERBOSE records, every INFO and above
//! let filter = RandomPropFilter::with_ceiling(0.1, LogLevel::VERBOSE).unwrap();
//! assert_eq!(filter.proportion(), 0.1);
//! ```

use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use super::log_record::LogRecord;
use rand::distributions::OpenClosed01;
use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};

/// Decides whether a record is passed on to a handler's sink
pub trait SampleFilter: Send + Sync {
    fn should_keep(&self, record: &LogRecord) -> bool;
}

impl<F> SampleFilter for F
where
    F: Fn(&LogRecord) -> bool + Send + Sync,
{
    fn should_keep(&self, record: &LogRecord) -> bool {
        self(record)
    }
}

/// Keep a random proportion of records
///
/// Immutable after construction; each call draws independently.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomPropFilter {
    proportion: f64,
    ceiling: Option<LogLevel>,
}

impl RandomPropFilter {
    /// Sample every record with probability `proportion`
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::InvalidProportion`] unless `0 <= proportion <= 1`.
    pub fn new(proportion: f64) -> Result<Self> {
        Self::build(proportion, None)
    }

    /// Sample only records at or below `ceiling`; more severe records are
    /// always kept.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::InvalidProportion`] for a proportion outside
    /// [0, 1] and [`LoggerError::InvalidLevel`] for a ceiling with no
    /// registered level name.
    pub fn with_ceiling(proportion: f64, ceiling: LogLevel) -> Result<Self> {
        Self::build(proportion, Some(ceiling))
    }

    fn build(proportion: f64, ceiling: Option<LogLevel>) -> Result<Self> {
        // NaN fails the range check too
        if !(0.0..=1.0).contains(&proportion) {
            return Err(LoggerError::invalid_proportion(proportion));
        }

        if let Some(level) = ceiling {
            if !level.is_registered() {
                return Err(LoggerError::invalid_level(level.value()));
            }
        }

        Ok(Self {
            proportion,
            ceiling,
        })
    }

    pub fn proportion(&self) -> f64 {
        self.proportion
    }

    pub fn ceiling(&self) -> Option<LogLevel> {
        self.ceiling
    }

    /// Keep/drop decision for `level`, drawing from `draw` only when needed
    fn decide(&self, level: LogLevel, draw: impl FnOnce() -> f64) -> bool {
        if self.proportion == 1.0 {
            return true;
        }

        match self.ceiling {
            Some(ceiling) if level > ceiling => true,
            _ => draw() <= self.proportion,
        }
    }
}

impl SampleFilter for RandomPropFilter {
    fn should_keep(&self, record: &LogRecord) -> bool {
        // Draws lie in (0, 1], so a proportion of 0 never keeps
        self.decide(record.level, || rand::thread_rng().sample(OpenClosed01))
    }
}

/// Metrics for sampling observability
///
/// Tracks how many records a handler's filter kept versus dropped.
///
/// # Example
///
/// ```
/// use verbose_logger_system::SamplerMetrics;
///
/// let metrics = SamplerMetrics::new();
/// assert_eq!(metrics.sampled_count(), 0);
/// assert_eq!(metrics.dropped_count(), 0);
/// ```
#[derive(Debug)]
pub struct SamplerMetrics {
    sampled_count: AtomicU64,
    dropped_count: AtomicU64,
    total_count: AtomicU64,
}

impl SamplerMetrics {
    /// Create new metrics with all counters at zero
    pub const fn new() -> Self {
        Self {
            sampled_count: AtomicU64::new(0),
            dropped_count: AtomicU64::new(0),
            total_count: AtomicU64::new(0),
        }
    }

    /// Get the number of kept records
    #[inline]
    pub fn sampled_count(&self) -> u64 {
        self.sampled_count.load(Ordering::Relaxed)
    }

    /// Get the number of records dropped by the filter
    #[inline]
    pub fn dropped_count(&self) -> u64 {
        self.dropped_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn total_count(&self) -> u64 {
        self.total_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn record_sampled(&self) {
        self.sampled_count.fetch_add(1, Ordering::Relaxed);
        self.total_count.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_dropped(&self) {
        self.dropped_count.fetch_add(1, Ordering::Relaxed);
        self.total_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Observed keep rate; 1.0 if nothing has been filtered yet
    pub fn effective_sample_rate(&self) -> f64 {
        let total = self.total_count();
        if total == 0 {
            1.0
        } else {
            self.sampled_count() as f64 / total as f64
        }
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.sampled_count.store(0, Ordering::Relaxed);
        self.dropped_count.store(0, Ordering::Relaxed);
        self.total_count.store(0, Ordering::Relaxed);
    }
}

impl Default for SamplerMetrics {
    fn default() -> Self {
        Self::new()
    }
}
