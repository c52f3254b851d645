//! Attaches file and console handlers to a logger from configuration

use super::config::{FormatterOpts, HandlerKind, HandlerOpts, LoggerConfig, LoggerOpts};
use super::error::Result;
use super::handler::Handler;
use super::logger::Logger;
use crate::appenders::{
    Appender, ConsoleAppender, FileAppender, RotatingFileAppender, RotationPolicy,
};

/// Configure `logger` from the three option groups
///
/// - With a filename: a file handler on `output_dir/filename`, truncated on
///   open, or a size-rotating handler (also truncated) when
///   `rotate_handle` is set. Formatted with the `file` format, or
///   `{timestamp} - {name} - {level} - {message}` if none is registered.
/// - With `to_console`, or without a filename: a stderr handler printing the
///   bare message (or the registered `stream` format).
/// - The logger threshold is set from `logger_opts`.
///
/// Handlers are added to whatever the logger already has; configuring twice
/// duplicates output.
///
/// # Errors
///
/// Fails before anything is opened or attached if the output directory does
/// not exist, a template does not parse, or the options are otherwise
/// invalid. Failing to open the log file also attaches nothing.
pub fn configure(
    logger: &Logger,
    handler_opts: &HandlerOpts,
    formatter_opts: &FormatterOpts,
    logger_opts: &LoggerOpts,
) -> Result<()> {
    handler_opts.validate()?;

    let log_path = handler_opts.log_path();
    let to_console = logger_opts.to_console || log_path.is_none();

    let file_formatter = match log_path {
        Some(_) => Some(formatter_opts.formatter_for(HandlerKind::File)?),
        None => None,
    };
    let stream_formatter = if to_console {
        Some(formatter_opts.formatter_for(HandlerKind::Stream)?)
    } else {
        None
    };

    let mut handlers = Vec::with_capacity(2);

    if let (Some(path), Some(formatter)) = (log_path, file_formatter) {
        let appender: Box<dyn Appender> = if handler_opts.rotate_handle {
            let policy = RotationPolicy::new()
                .with_max_size(handler_opts.max_size)
                .with_max_backups(handler_opts.backup_filecount)
                .with_compression(handler_opts.compress_backups);
            Box::new(RotatingFileAppender::with_policy(&path, policy)?)
        } else {
            Box::new(FileAppender::new(&path)?)
        };
        handlers.push(Handler::boxed(appender, formatter));
    }

    if let Some(formatter) = stream_formatter {
        handlers.push(Handler::new(ConsoleAppender::new(), formatter));
    }

    logger.set_level(logger_opts.threshold());
    for handler in handlers {
        logger.add_handler(handler);
    }

    Ok(())
}

/// Configure `logger` from a flat [`LoggerConfig`]
pub fn configure_from(logger: &Logger, config: &LoggerConfig) -> Result<()> {
    configure(
        logger,
        &config.handler_opts(),
        &config.formatter_opts(),
        &config.logger_opts(),
    )
}

impl Logger {
    /// See [`configure`]
    pub fn configure(
        &self,
        handler_opts: &HandlerOpts,
        formatter_opts: &FormatterOpts,
        logger_opts: &LoggerOpts,
    ) -> Result<()> {
        configure(self, handler_opts, formatter_opts, logger_opts)
    }
}
