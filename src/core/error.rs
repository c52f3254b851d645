//! Error types for configuration, emission and sinks

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Sampling proportion outside of [0, 1]
    #[error(
        "Expected the proportion of log records to keep to be between (inclusively) 0 and 1, got {value}"
    )]
    InvalidProportion { value: f64 },

    /// Severity value with no registered level name
    #[error("Expected a registered log level (DEBUG, VERBOSE, INFO, WARNING, ERROR, FATAL), got {value}")]
    InvalidLevel { value: u8 },

    /// Level registration that collides with an existing entry
    #[error("Cannot register level '{requested}' at {value}: slot already holds '{existing}'")]
    LevelConflict {
        value: u8,
        existing: String,
        requested: String,
    },

    /// Output directory does not exist
    #[error("The directory {path} was not found")]
    MissingOutputDir { path: String },

    /// Formatter registered for a handler kind other than file/stream
    #[error("Unrecognized handler name: {name}. Allowed values are 'file' or 'stream'")]
    UnknownHandler { name: String },

    /// Text template that cannot be parsed
    #[error("Invalid format template '{template}': {message}")]
    InvalidTemplate { template: String, message: String },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Arguments that could not be serialized for the startup banner
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// File appender error with path
    #[error("File appender error for '{path}': {message}")]
    FileAppenderError { path: String, message: String },

    /// File rotation error
    #[error("File rotation failed for '{path}': {message}")]
    FileRotationError { path: String, message: String },

    /// Sink in an unusable state, e.g. closed after a failed rotation
    #[error("Writer error: {0}")]
    WriterError(String),
}

impl LoggerError {
    /// Create an invalid sampling proportion error
    pub fn invalid_proportion(value: f64) -> Self {
        LoggerError::InvalidProportion { value }
    }

    /// Create an unknown level error
    pub fn invalid_level(value: u8) -> Self {
        LoggerError::InvalidLevel { value }
    }

    pub fn level_conflict(
        value: u8,
        existing: impl Into<String>,
        requested: impl Into<String>,
    ) -> Self {
        LoggerError::LevelConflict {
            value,
            existing: existing.into(),
            requested: requested.into(),
        }
    }

    /// Create a missing output directory error
    pub fn missing_output_dir(path: impl Into<String>) -> Self {
        LoggerError::MissingOutputDir { path: path.into() }
    }

    pub fn unknown_handler(name: impl Into<String>) -> Self {
        LoggerError::UnknownHandler { name: name.into() }
    }

    pub fn invalid_template(template: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidTemplate {
            template: template.into(),
            message: message.into(),
        }
    }

    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a file appender error
    pub fn file_appender(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileAppenderError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a file rotation error
    pub fn file_rotation(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileRotationError {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }

    /// Whether this error is a configuration-time validation failure
    ///
    /// Validation errors abort configuration; everything else is an I/O
    /// or runtime failure surfaced from emission.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            LoggerError::InvalidProportion { .. }
                | LoggerError::InvalidLevel { .. }
                | LoggerError::LevelConflict { .. }
                | LoggerError::MissingOutputDir { .. }
                | LoggerError::UnknownHandler { .. }
                | LoggerError::InvalidTemplate { .. }
                | LoggerError::InvalidConfiguration { .. }
        )
    }
}
