//! Core logger types and traits

pub mod appender;
pub mod config;
pub mod error;
pub mod filter;
pub mod formatter;
pub mod handler;
pub mod log_context;
pub mod log_level;
pub mod log_record;
pub mod logger;
pub mod metrics;
pub mod registry;
pub mod router;
pub mod timestamp;

pub use appender::Appender;
pub use config::{
    FormatSpec, FormatterOpts, HandlerKind, HandlerOpts, LevelPolicy, LoggerConfig, LoggerOpts,
};
pub use error::{LoggerError, Result};
pub use filter::{RandomPropFilter, SampleFilter, SamplerMetrics};
pub use formatter::{
    JsonDetail, JsonFormatter, RecordFormatter, TextFormatter, BARE_MESSAGE_TEMPLATE,
    DEFAULT_FILE_TEMPLATE,
};
pub use handler::{Disposition, Handler};
pub use log_context::{FieldValue, LogContext};
pub use log_level::{register_level, register_verbose, resolve, resolve_name, LogLevel};
pub use log_record::{ExceptionInfo, Location, LogRecord};
pub use logger::{ContextLogger, Logger, LoggerBuilder, ThresholdGuard};
pub use metrics::LoggerMetrics;
pub use registry::{create_logger, get_logger, resolve_child_name, LoggerRegistry};
pub use router::{configure, configure_from};
pub use timestamp::TimestampFormat;
