//! Logging macros for ergonomic log message formatting.
//!
//! These macros format like `format!` and capture the caller's file, line,
//! module and enclosing function. They work with a [`Logger`](crate::Logger)
//! and with a [`ContextLogger`](crate::ContextLogger), and evaluate to the
//! emission's `Result<()>`.
//!
//! # Examples
//!
//! ```
//! use verbose_logger_system::prelude::*;
//! use verbose_logger_system::{info, verbose};
//!
//! let logger = Logger::builder("__main__").level(LogLevel::VERBOSE).build();
//!
//! info!(logger, "Server started").unwrap();
//!
//! let segments = 12;
//! verbose!(logger, "Loaded {} segments", segments).unwrap();
//! ```

/// Path of the enclosing function, e.g. `my_crate::io::load`
#[macro_export]
macro_rules! function_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        let name = name.strip_suffix("::f").unwrap_or(name);
        name.trim_end_matches("::{{closure}}")
    }};
}

/// [`Location`](crate::Location) of the macro call site
#[macro_export]
macro_rules! location {
    () => {
        $crate::Location::new(
            ::std::file!(),
            ::std::line!(),
            ::std::module_path!(),
            $crate::function_name!(),
        )
    };
}

/// Log a message at an explicit level.
///
/// # Examples
///
/// ```
/// # use verbose_logger_system::prelude::*;
/// # let logger = Logger::new("app");
/// use verbose_logger_system::log;
/// log!(logger, LogLevel::INFO, "Simple message").unwrap();
/// log!(logger, LogLevel::ERROR, "Error code: {}", 500).unwrap();
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log_at($level, $crate::location!(), ::std::format!($($arg)+))
    };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::DEBUG, $($arg)+)
    };
}

/// Log a verbose-level message.
///
/// Shown when the threshold is VERBOSE (`-v`) or lower.
///
/// ```
/// # use verbose_logger_system::prelude::*;
/// # let logger = Logger::new("app");
/// use verbose_logger_system::verbose;
/// verbose!(logger, "Window {} of {}", 3, 10).unwrap();
/// ```
#[macro_export]
macro_rules! verbose {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::VERBOSE, $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::INFO, $($arg)+)
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::WARN, $($arg)+)
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::ERROR, $($arg)+)
    };
}

#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::FATAL, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::formatter::TextFormatter;
    use crate::core::handler::tests::MemoryAppender;
    use crate::core::{Handler, LogContext, LogLevel, Logger};

    fn capture(template: &str) -> (Logger, MemoryAppender) {
        let sink = MemoryAppender::default();
        let logger = Logger::builder("__main__")
            .level(LogLevel::DEBUG)
            .handler(Handler::new(sink.clone(), TextFormatter::new(template).unwrap()))
            .build();
        (logger, sink)
    }

    #[test]
    fn test_function_name() {
        let name = function_name!();
        assert!(name.ends_with("macros::tests::test_function_name"), "{}", name);
    }

    #[test]
    fn test_location_capture() {
        let (logger, sink) = capture("{module}|{function}|{file}|{message}");
        info!(logger, "Items: {}", 100).unwrap();

        let line = &sink.lines()[0];
        let parts: Vec<&str> = line.split('|').collect();
        assert_eq!(parts[0], module_path!());
        assert!(parts[1].ends_with("test_location_capture"));
        assert!(parts[2].ends_with("macros.rs"));
        assert_eq!(parts[3], "Items: 100");
    }

    #[test]
    fn test_line_number_recorded() {
        let (logger, sink) = capture("{line}");
        let expected = line!() + 1;
        warn!(logger, "here").unwrap();
        assert_eq!(sink.lines()[0], expected.to_string());
    }

    #[test]
    fn test_level_macros() {
        let (logger, sink) = capture("{level}");
        debug!(logger, "d").unwrap();
        verbose!(logger, "v").unwrap();
        info!(logger, "i").unwrap();
        warn!(logger, "w").unwrap();
        error!(logger, "e").unwrap();
        fatal!(logger, "f").unwrap();
        log!(logger, LogLevel::new(35), "custom").unwrap();

        assert_eq!(
            sink.lines(),
            vec!["DEBUG", "VERBOSE", "INFO", "WARNING", "ERROR", "FATAL", "Level 35"]
        );
    }

    #[test]
    fn test_macros_with_context_logger() {
        let (logger, sink) = capture("{message} {context}");
        let adapter = logger.with_context(LogContext::new().with_field("user", "alice"));
        info!(adapter, "login").unwrap();
        assert_eq!(sink.lines(), vec!["login user=alice"]);
    }
}
