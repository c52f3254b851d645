//! # Verbose Logger System
//!
//! A synchronous logging facility with a `VERBOSE` level between `DEBUG` and
//! `INFO`, per-handler random sampling, text and JSON formatters, and
//! configuration-driven routing to a log file and the console.
//!
//! ## Features
//!
//! - **Level registry**: integer-ordered levels, custom names registered once per process
//! - **Sampling**: drop a proportion of low-severity records, never the rare severe ones
//! - **Formatters**: `{field}` templates, minimal or full JSON lines
//! - **Routing**: truncating or size-rotating file sinks plus a console sink
//! - **Startup records**: log program parameters at INFO whatever the threshold
//!
//! ## Example
//!
//! ```no_run
//! use verbose_logger_system::prelude::*;
//!
//! let logger = create_logger("__main__");
//! configure(
//!     &logger,
//!     &HandlerOpts::new().with_output_dir("./out"),
//!     &FormatterOpts::new(),
//!     &LoggerOpts::new().with_verbosity(1).with_console(true),
//! )?;
//!
//! logger.record_startup_parameters([("input", "data.vcf"), ("min_cm", "3")])?;
//! logger.verbose("shown with -v")?;
//! # Ok::<(), LoggerError>(())
//! ```

pub mod appenders;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, FileAppender, RotatingFileAppender, RotationPolicy};
    pub use crate::core::{
        configure, configure_from, create_logger, get_logger, resolve, resolve_child_name,
        resolve_name, Appender, ContextLogger, FieldValue, FormatSpec, FormatterOpts, Handler,
        HandlerKind, HandlerOpts, JsonDetail, JsonFormatter, LevelPolicy, LogContext, LogLevel,
        LogRecord, Logger, LoggerConfig, LoggerError, LoggerOpts, LoggerRegistry,
        RandomPropFilter, Result, SampleFilter, TextFormatter, TimestampFormat,
    };
}

pub use appenders::{
    ConsoleAppender, ConsoleTarget, FileAppender, FileMode, RotatingFileAppender, RotationPolicy,
};
pub use core::{
    configure, configure_from, create_logger, get_logger, register_level, register_verbose,
    resolve, resolve_child_name, resolve_name, Appender, ContextLogger, Disposition,
    ExceptionInfo, FieldValue, FormatSpec, FormatterOpts, Handler, HandlerKind, HandlerOpts,
    JsonDetail, JsonFormatter, LevelPolicy, Location, LogContext, LogLevel, LogRecord, Logger,
    LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, LoggerOpts, LoggerRegistry,
    RandomPropFilter, RecordFormatter, Result, SampleFilter, SamplerMetrics, TextFormatter,
    ThresholdGuard, TimestampFormat, BARE_MESSAGE_TEMPLATE, DEFAULT_FILE_TEMPLATE,
};
