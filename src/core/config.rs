//! Logger configuration
//!
//! Three independent option groups feed [`configure`](crate::core::router::configure):
//!
//! - [`HandlerOpts`]: where the file sink goes and how it rotates
//! - [`LoggerOpts`]: console echo and threshold selection
//! - [`FormatterOpts`]: per-sink format (template or JSON)
//!
//! [`LoggerConfig`] is the flat, serde-loadable form of all three.

use super::error::{LoggerError, Result};
use super::formatter::{JsonDetail, JsonFormatter, RecordFormatter, TextFormatter};
use super::log_level::{self, LogLevel};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Log file name used when none is configured
pub const DEFAULT_FILENAME: &str = "IBDCluster.log";
pub const DEFAULT_MAX_SIZE: u64 = 1024;
pub const DEFAULT_BACKUP_COUNT: usize = 5;

/// The two sink kinds a format can be registered for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandlerKind {
    File,
    Stream,
}

impl HandlerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HandlerKind::File => "file",
            HandlerKind::Stream => "stream",
        }
    }
}

impl fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HandlerKind {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "file" => Ok(HandlerKind::File),
            "stream" => Ok(HandlerKind::Stream),
            other => Err(LoggerError::unknown_handler(other)),
        }
    }
}

/// A configured output format: a text template or one of the JSON shapes
///
/// Parsed from a string: `"json"` selects the full JSON object,
/// `"json-minimal"` the three-field one, anything else is a text template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FormatSpec {
    Template(String),
    Json(JsonDetail),
}

impl FormatSpec {
    pub fn parse(spec: &str) -> Self {
        match spec.trim() {
            "json" => FormatSpec::Json(JsonDetail::Full),
            "json-minimal" => FormatSpec::Json(JsonDetail::Minimal),
            _ => FormatSpec::Template(spec.to_string()),
        }
    }

    /// Build the formatter this spec describes
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::InvalidTemplate`] if a text template does not parse.
    pub fn build(&self) -> Result<RecordFormatter> {
        match self {
            FormatSpec::Template(template) => Ok(TextFormatter::new(template.as_str())?.into()),
            FormatSpec::Json(detail) => Ok(JsonFormatter::new(*detail).into()),
        }
    }
}

impl From<String> for FormatSpec {
    fn from(spec: String) -> Self {
        FormatSpec::parse(&spec)
    }
}

impl From<&str> for FormatSpec {
    fn from(spec: &str) -> Self {
        FormatSpec::parse(spec)
    }
}

impl From<FormatSpec> for String {
    fn from(spec: FormatSpec) -> Self {
        match spec {
            FormatSpec::Template(template) => template,
            FormatSpec::Json(JsonDetail::Full) => "json".to_string(),
            FormatSpec::Json(JsonDetail::Minimal) => "json-minimal".to_string(),
        }
    }
}

/// File sink options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlerOpts {
    /// File name inside `output_dir`; `None` means console only
    pub filename: Option<String>,
    /// Must already exist, it is never created
    pub output_dir: PathBuf,
    pub rotate_handle: bool,
    /// Rollover size in bytes
    pub max_size: u64,
    pub backup_filecount: usize,
    /// Gzip rolled-over files
    pub compress_backups: bool,
}

impl Default for HandlerOpts {
    fn default() -> Self {
        Self {
            filename: Some(DEFAULT_FILENAME.to_string()),
            output_dir: PathBuf::from("./"),
            rotate_handle: false,
            max_size: DEFAULT_MAX_SIZE,
            backup_filecount: DEFAULT_BACKUP_COUNT,
            compress_backups: false,
        }
    }
}

impl HandlerOpts {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Disable the file sink; records go to the console instead
    #[must_use = "builder methods return a new value"]
    pub fn without_file(mut self) -> Self {
        self.filename = None;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Roll over at `max_size` bytes, keeping `backup_filecount` old files
    #[must_use = "builder methods return a new value"]
    pub fn with_rotation(mut self, max_size: u64, backup_filecount: usize) -> Self {
        self.rotate_handle = true;
        self.max_size = max_size;
        self.backup_filecount = backup_filecount;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_compressed_backups(mut self, enabled: bool) -> Self {
        self.compress_backups = enabled;
        self
    }

    /// Full path of the log file, if one is configured
    pub fn log_path(&self) -> Option<PathBuf> {
        self.filename.as_ref().map(|name| self.output_dir.join(name))
    }

    /// Check the options without touching the file system beyond a stat
    ///
    /// # Errors
    ///
    /// - [`LoggerError::MissingOutputDir`] if `output_dir` is not an existing directory
    /// - [`LoggerError::InvalidConfiguration`] for an empty file name or a
    ///   zero rotation size
    pub fn validate(&self) -> Result<()> {
        if !self.output_dir.is_dir() {
            return Err(LoggerError::missing_output_dir(
                self.output_dir.display().to_string(),
            ));
        }

        if let Some(ref name) = self.filename {
            if name.trim().is_empty() {
                return Err(LoggerError::config("HandlerOpts", "filename must not be empty"));
            }
        }

        if self.rotate_handle && self.max_size == 0 {
            return Err(LoggerError::config(
                "HandlerOpts",
                "max_size must be greater than 0 when rotate_handle is set",
            ));
        }

        Ok(())
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

/// How the logger threshold is derived
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelPolicy {
    /// `-v` count: 0 → INFO, 1 → VERBOSE, 2+ → DEBUG, unknown → INFO
    Verbosity(i64),
    /// Level name such as `"warning"`; unknown → WARNING
    Named(String),
}

impl LevelPolicy {
    pub fn threshold(&self) -> LogLevel {
        match self {
            LevelPolicy::Verbosity(verbosity) => log_level::resolve(*verbosity),
            LevelPolicy::Named(name) => log_level::resolve_name(name),
        }
    }
}

impl Default for LevelPolicy {
    fn default() -> Self {
        LevelPolicy::Verbosity(0)
    }
}

/// Console echo and threshold options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerOpts {
    pub to_console: bool,
    pub verbosity: i64,
    /// Named level; takes precedence over `verbosity` when set
    pub level: Option<String>,
}

impl LoggerOpts {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_console(mut self, to_console: bool) -> Self {
        self.to_console = to_console;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_verbosity(mut self, verbosity: i64) -> Self {
        self.verbosity = verbosity;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_level_name(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    pub fn policy(&self) -> LevelPolicy {
        match self.level {
            Some(ref name) => LevelPolicy::Named(name.clone()),
            None => LevelPolicy::Verbosity(self.verbosity),
        }
    }

    pub fn threshold(&self) -> LogLevel {
        self.policy().threshold()
    }
}

/// Formats registered per sink kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterOpts {
    pub file_format: Option<FormatSpec>,
    pub stream_format: Option<FormatSpec>,
}

impl FormatterOpts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `format_str` for the sink named `handler_name`
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::UnknownHandler`] unless `handler_name` is
    /// `"file"` or `"stream"`.
    pub fn add_format(&mut self, format_str: &str, handler_name: &str) -> Result<()> {
        let kind: HandlerKind = handler_name.parse()?;
        self.set(kind, FormatSpec::parse(format_str));
        Ok(())
    }

    pub fn set(&mut self, kind: HandlerKind, spec: FormatSpec) {
        match kind {
            HandlerKind::File => self.file_format = Some(spec),
            HandlerKind::Stream => self.stream_format = Some(spec),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_format(mut self, kind: HandlerKind, spec: impl Into<FormatSpec>) -> Self {
        self.set(kind, spec.into());
        self
    }

    pub fn get(&self, kind: HandlerKind) -> Option<&FormatSpec> {
        match kind {
            HandlerKind::File => self.file_format.as_ref(),
            HandlerKind::Stream => self.stream_format.as_ref(),
        }
    }

    /// Formatter for `kind`, falling back to the default file template or
    /// the bare message for the console
    pub fn formatter_for(&self, kind: HandlerKind) -> Result<RecordFormatter> {
        match (self.get(kind), kind) {
            (Some(spec), _) => spec.build(),
            (None, HandlerKind::File) => Ok(TextFormatter::default_file().into()),
            (None, HandlerKind::Stream) => Ok(TextFormatter::bare_message().into()),
        }
    }
}

/// All recognized options in one flat document
///
/// ```
/// use verbose_logger_system::core::config::LoggerConfig;
///
/// let config = LoggerConfig::from_json_str(
///     r#"{"filename": "run.log", "verbosity": 1, "file_format": "json"}"#,
/// ).unwrap();
/// assert_eq!(config.filename.as_deref(), Some("run.log"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggerConfig {
    pub filename: Option<String>,
    pub output_dir: PathBuf,
    pub rotate_handle: bool,
    pub max_size: u64,
    pub backup_filecount: usize,
    pub compress_backups: bool,
    pub to_console: bool,
    pub verbosity: i64,
    pub level: Option<String>,
    pub file_format: Option<FormatSpec>,
    pub stream_format: Option<FormatSpec>,
    /// Write the file sink as full JSON when no `file_format` is given
    pub json: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::from_parts(HandlerOpts::default(), LoggerOpts::default(), FormatterOpts::default())
    }
}

impl LoggerConfig {
    pub fn from_parts(handler: HandlerOpts, logger: LoggerOpts, formatter: FormatterOpts) -> Self {
        Self {
            filename: handler.filename,
            output_dir: handler.output_dir,
            rotate_handle: handler.rotate_handle,
            max_size: handler.max_size,
            backup_filecount: handler.backup_filecount,
            compress_backups: handler.compress_backups,
            to_console: logger.to_console,
            verbosity: logger.verbosity,
            level: logger.level,
            file_format: formatter.file_format,
            stream_format: formatter.stream_format,
            json: false,
        }
    }

    /// Parse a JSON configuration document
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::InvalidConfiguration`] for malformed JSON,
    /// unknown keys or mistyped values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| LoggerError::config("LoggerConfig", e.to_string()))
    }

    pub fn handler_opts(&self) -> HandlerOpts {
        HandlerOpts {
            filename: self.filename.clone(),
            output_dir: self.output_dir.clone(),
            rotate_handle: self.rotate_handle,
            max_size: self.max_size,
            backup_filecount: self.backup_filecount,
            compress_backups: self.compress_backups,
        }
    }

    pub fn logger_opts(&self) -> LoggerOpts {
        LoggerOpts {
            to_console: self.to_console,
            verbosity: self.verbosity,
            level: self.level.clone(),
        }
    }

    pub fn formatter_opts(&self) -> FormatterOpts {
        let file_format = match (&self.file_format, self.json) {
            (Some(spec), _) => Some(spec.clone()),
            (None, true) => Some(FormatSpec::Json(JsonDetail::Full)),
            (None, false) => None,
        };
        FormatterOpts {
            file_format,
            stream_format: self.stream_format.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_handler_kind_parsing() {
        assert_eq!("file".parse::<HandlerKind>().unwrap(), HandlerKind::File);
        assert_eq!("stream".parse::<HandlerKind>().unwrap(), HandlerKind::Stream);

        let err = "socket".parse::<HandlerKind>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unrecognized handler name: socket. Allowed values are 'file' or 'stream'"
        );
    }

    #[test]
    fn test_add_format_routes_by_kind() {
        let mut opts = FormatterOpts::new();
        opts.add_format("{level}: {message}", "file").unwrap();
        opts.add_format("json-minimal", "stream").unwrap();

        assert_eq!(
            opts.get(HandlerKind::File),
            Some(&FormatSpec::Template("{level}: {message}".to_string()))
        );
        assert_eq!(
            opts.get(HandlerKind::Stream),
            Some(&FormatSpec::Json(JsonDetail::Minimal))
        );
        assert!(opts.add_format("{message}", "syslog").is_err());
    }

    #[test]
    fn test_formatter_defaults() {
        let opts = FormatterOpts::new();
        assert_eq!(
            opts.formatter_for(HandlerKind::File).unwrap(),
            RecordFormatter::Text(TextFormatter::default_file())
        );
        assert_eq!(
            opts.formatter_for(HandlerKind::Stream).unwrap(),
            RecordFormatter::Text(TextFormatter::bare_message())
        );
    }

    #[test]
    fn test_bad_template_surfaces_when_built() {
        let opts = FormatterOpts::new().with_format(HandlerKind::File, "{bogus}");
        assert!(matches!(
            opts.formatter_for(HandlerKind::File),
            Err(LoggerError::InvalidTemplate { .. })
        ));
    }

    #[test]
    fn test_handler_opts_validation() {
        let dir = tempdir().unwrap();
        assert!(HandlerOpts::new().with_output_dir(dir.path()).validate().is_ok());

        let missing = dir.path().join("nope");
        let err = HandlerOpts::new().with_output_dir(&missing).validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("The directory {} was not found", missing.display())
        );

        let zero = HandlerOpts::new()
            .with_output_dir(dir.path())
            .with_rotation(0, 3);
        assert!(matches!(
            zero.validate(),
            Err(LoggerError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_log_path() {
        let opts = HandlerOpts::new().with_output_dir("/var/log/app");
        assert_eq!(
            opts.log_path(),
            Some(PathBuf::from("/var/log/app").join(DEFAULT_FILENAME))
        );
        assert_eq!(opts.without_file().log_path(), None);
    }

    #[test]
    fn test_level_policies() {
        assert_eq!(LoggerOpts::new().threshold(), LogLevel::INFO);
        assert_eq!(LoggerOpts::new().with_verbosity(1).threshold(), LogLevel::VERBOSE);
        assert_eq!(LoggerOpts::new().with_verbosity(2).threshold(), LogLevel::DEBUG);
        assert_eq!(LoggerOpts::new().with_verbosity(999).threshold(), LogLevel::INFO);

        let named = LoggerOpts::new().with_verbosity(2).with_level_name("error");
        assert_eq!(named.policy(), LevelPolicy::Named("error".to_string()));
        assert_eq!(named.threshold(), LogLevel::ERROR);
        assert_eq!(
            LoggerOpts::new().with_level_name("chatty").threshold(),
            LogLevel::WARN
        );
    }

    #[test]
    fn test_config_from_json() {
        let config = LoggerConfig::from_json_str(
            r#"{
                "filename": "cluster.log",
                "output_dir": "/tmp",
                "rotate_handle": true,
                "max_size": 2048,
                "backup_filecount": 3,
                "to_console": true,
                "verbosity": 1,
                "file_format": "json-minimal",
                "stream_format": "{level} {message}"
            }"#,
        )
        .unwrap();

        let handler = config.handler_opts();
        assert_eq!(handler.log_path(), Some(PathBuf::from("/tmp/cluster.log")));
        assert!(handler.rotate_handle);
        assert_eq!(handler.max_size, 2048);
        assert_eq!(handler.backup_filecount, 3);
        assert_eq!(config.logger_opts().threshold(), LogLevel::VERBOSE);
        assert_eq!(
            config.formatter_opts().get(HandlerKind::File),
            Some(&FormatSpec::Json(JsonDetail::Minimal))
        );
    }

    #[test]
    fn test_config_defaults_and_json_flag() {
        let config = LoggerConfig::from_json_str(r#"{"json": true}"#).unwrap();
        assert_eq!(config.filename.as_deref(), Some(DEFAULT_FILENAME));
        assert_eq!(config.max_size, DEFAULT_MAX_SIZE);
        assert_eq!(config.backup_filecount, DEFAULT_BACKUP_COUNT);
        assert_eq!(
            config.formatter_opts().get(HandlerKind::File),
            Some(&FormatSpec::Json(JsonDetail::Full))
        );
    }

    #[test]
    fn test_config_rejects_unknown_keys() {
        let err = LoggerConfig::from_json_str(r#"{"rotate": true}"#).unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_format_spec_string_roundtrip() {
        for raw in ["json", "json-minimal", "{timestamp} {message}"] {
            let spec = FormatSpec::parse(raw);
            assert_eq!(String::from(spec), raw);
        }
    }
}
